pub mod sheets;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
}

/// One exchange, as appended to the analytics sheet.
#[derive(Debug, Clone)]
pub struct AnalyticsRecord {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub latency_seconds: f64,
    pub question_length: usize,
    pub answer_length: usize,
}

impl AnalyticsRecord {
    pub fn new(
        session_id: Uuid,
        question: &str,
        answer: &str,
        latency: std::time::Duration,
    ) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            question: question.to_string(),
            answer: answer.to_string(),
            latency_seconds: (latency.as_secs_f64() * 100.0).round() / 100.0,
            question_length: question.chars().count(),
            answer_length: answer.chars().count(),
        }
    }
}

/// Best-effort sink. A failed `record` is logged and swallowed by the
/// caller; it must never roll back the turn that produced it.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, record: &AnalyticsRecord) -> Result<(), AnalyticsError>;
}
