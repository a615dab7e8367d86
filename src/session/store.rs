use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::llm::ChatChannel;
use crate::session::models::{Session, Turn};

/// A session plus its lazily-created AI channel. Locked as a unit so turns
/// within one session never overlap.
pub struct SessionState {
    pub session: Session,
    pub channel: Option<Box<dyn ChatChannel>>,
}

impl SessionState {
    /// Discards the transcript and the channel but keeps the quota counter.
    pub fn clear_conversation(&mut self, greeting: Option<&str>) {
        self.session.transcript.clear();
        self.session.primed = false;
        self.channel = None;
        if let Some(greeting) = greeting {
            self.session.transcript.push(Turn::assistant(greeting));
        }
    }
}

pub type SessionHandle = Arc<tokio::sync::Mutex<SessionState>>;

/// In-memory registry of live sessions. The outer lock guards only the map
/// and is never held across an await; per-session work locks the handle.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionHandle>>,
    max_questions: u32,
}

impl SessionStore {
    pub fn new(max_questions: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_questions,
        }
    }

    pub fn create(&self, greeting: Option<&str>) -> (Uuid, SessionHandle) {
        let mut session = Session::new(self.max_questions);
        if let Some(greeting) = greeting {
            session.transcript.push(Turn::assistant(greeting));
        }
        let id = session.id;

        let handle: SessionHandle = Arc::new(tokio::sync::Mutex::new(SessionState {
            session,
            channel: None,
        }));

        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(id, handle.clone());
        (id, handle)
    }

    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(&id).is_some()
    }
}
