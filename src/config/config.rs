use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    /// Directory scanned at startup for `.txt` knowledge files.
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotaConfig {
    pub max_questions: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersonaConfig {
    /// Display name the assistant introduces itself with.
    pub assistant_name: String,
    pub institution: String,
    /// The programs the assistant is allowed to talk about. When two are
    /// configured, ambiguous questions get the clarification sentence.
    pub programs: Vec<String>,
    pub description: String,
    /// Seeded as the first assistant turn of every new session.
    pub greeting: String,
    /// Send the full instruction once over the channel before the first
    /// user question of a session.
    pub priming: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub api_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub knowledge: KnowledgeConfig,
    pub quota: QuotaConfig,
    pub gemini: GeminiConfig,
    pub persona: PersonaConfig,
    pub analytics: Option<SheetsConfig>,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("KIOSK").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        // Expand environment variables if present like ${GEMINI_API_KEY}
        app_config.knowledge.dir = expand_env(&app_config.knowledge.dir);
        app_config.gemini.api_key = expand_env(&app_config.gemini.api_key);
        if let Some(ref mut sheets) = app_config.analytics {
            sheets.api_token = expand_env(&sheets.api_token);
        }

        if app_config.gemini.api_key.is_empty() {
            return Err(config::ConfigError::Message(
                "gemini.api_key is not set (check GEMINI_API_KEY)".to_string(),
            ));
        }

        Ok(app_config)
    }
}

fn expand_env(val: &str) -> String {
    if val.starts_with("${") && val.ends_with('}') {
        let var_name = &val[2..val.len() - 1];
        std::env::var(var_name).unwrap_or_else(|_| "".to_string())
    } else {
        val.to_string()
    }
}
