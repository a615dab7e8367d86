pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;
use gemini::GeminiProvider;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Rate Limited")]
    RateLimited,
    #[error("The assistant took too long to reply, please try again")]
    Timeout,
    #[error("Malformed response from the model backend")]
    InvalidResponse,
}

/// A stateful conversation with the remote generative-AI service, bound to
/// one model at creation. Each `send` appends to the server-visible
/// conversation context and returns the generated reply.
#[async_trait]
pub trait ChatChannel: Send {
    async fn send(&mut self, text: &str) -> Result<String, ChannelError>;
}

/// Opens fresh channels. One channel is created lazily per session and
/// reused for every turn in it; recreating it would lose conversation
/// continuity.
pub trait ChannelProvider: Send + Sync {
    fn name(&self) -> &str;

    fn open_channel(&self) -> Box<dyn ChatChannel>;
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_default(config: &AppConfig) -> Arc<dyn ChannelProvider> {
        Arc::new(GeminiProvider::new(config.gemini.clone()))
    }
}
