use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::quota::QuotaGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a session transcript. The transcript is append-only and
/// lives only as long as the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub transcript: Vec<Turn>,
    pub quota: QuotaGate,
    /// Whether the one-time system priming message has been sent over this
    /// session's channel.
    pub primed: bool,
}

impl Session {
    pub fn new(max_questions: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Vec::new(),
            quota: QuotaGate::new(max_questions, today()),
            primed: false,
        }
    }
}

/// The wall-clock date used for quota resets.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
