use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge directory {0}: {1}")]
    Dir(PathBuf, std::io::Error),
    #[error("No .txt knowledge files found in {0}")]
    Empty(PathBuf),
}

/// The concatenated text of every knowledge file, loaded once at startup
/// and injected verbatim into every composed prompt afterwards.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    text: String,
    file_count: usize,
}

impl KnowledgeBase {
    /// Scans `dir` for files with a literal `.txt` extension (case-sensitive),
    /// reads each as UTF-8 and concatenates them separated by blank lines.
    ///
    /// Files are concatenated in lexicographic file-name order so the blob is
    /// stable across runs. Unreadable files are skipped with a warning; an
    /// empty result is fatal.
    pub fn load(dir: &Path) -> Result<Self, KnowledgeError> {
        let entries = fs::read_dir(dir).map_err(|e| KnowledgeError::Dir(dir.to_path_buf(), e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().map(|ext| ext == "txt").unwrap_or(false)
            })
            .collect();
        files.sort();

        let mut text = String::new();
        let mut file_count = 0;

        for path in &files {
            match fs::read_to_string(path) {
                Ok(content) => {
                    text.push_str(&content);
                    text.push_str("\n\n");
                    file_count += 1;
                }
                Err(e) => {
                    warn!("Skipping unreadable knowledge file {}: {}", path.display(), e);
                }
            }
        }

        if file_count == 0 {
            return Err(KnowledgeError::Empty(dir.to_path_buf()));
        }

        info!(
            "Loaded {} knowledge file(s) from {} ({} bytes)",
            file_count,
            dir.display(),
            text.len()
        );

        Ok(Self { text, file_count })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Builds a knowledge base from an in-memory blob. Tests use this;
    /// production always goes through `load`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            file_count: usize::from(!text.is_empty()),
            text,
        }
    }
}
