use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{GateState, SessionState, Turn};

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub transcript: Vec<Turn>,
    pub daily_count: u32,
    pub remaining: u32,
    pub gate: GateState,
}

impl SessionResponse {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            id: state.session.id,
            transcript: state.session.transcript.clone(),
            daily_count: state.session.quota.daily_count(),
            remaining: state.session.quota.remaining(),
            gate: state.session.quota.state(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub reply: String,
    pub remaining: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
