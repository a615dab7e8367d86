use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use crate::analytics::{AnalyticsRecord, AnalyticsSink};
use crate::llm::{ChannelError, ChannelProvider};
use crate::prompt::PromptComposer;
use crate::session::{today, GateState, SessionHandle, SessionState, Turn};

/// Informational message shown once the daily quota is exhausted.
pub const QUOTA_EXHAUSTED_MESSAGE: &str =
    "You've reached today's question limit. Please come back tomorrow!";

#[derive(Debug)]
pub enum TurnOutcome {
    /// Empty or whitespace-only input: no turn appended, no AI call made.
    Ignored,
    /// The quota gate is closed for today.
    QuotaExhausted,
    /// The assistant replied and the question was counted.
    Answered { reply: String, remaining: u32 },
}

/// Runs the per-turn cycle: quota check, optimistic user-turn append,
/// prompt composition, the channel call, then quota increment and the
/// best-effort analytics write.
pub struct TurnController {
    composer: PromptComposer,
    provider: Arc<dyn ChannelProvider>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    priming: bool,
}

impl TurnController {
    pub fn new(
        composer: PromptComposer,
        provider: Arc<dyn ChannelProvider>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
        priming: bool,
    ) -> Self {
        Self {
            composer,
            provider,
            analytics,
            priming,
        }
    }

    /// Processes one user submission against one session.
    ///
    /// On a `ChannelError` the user turn stays in the transcript, no
    /// assistant turn is appended and the quota is not consumed. Analytics
    /// failures are logged and swallowed; they never affect the turn.
    pub async fn run_turn(
        &self,
        handle: &SessionHandle,
        input: &str,
    ) -> Result<TurnOutcome, ChannelError> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let mut state = handle.lock().await;
        let SessionState { session, channel } = &mut *state;

        session.quota.touch(today());
        if session.quota.state() == GateState::Closed {
            return Ok(TurnOutcome::QuotaExhausted);
        }

        // Optimistic append: a failed AI call must still show what was asked.
        session.transcript.push(Turn::user(text));

        let channel = channel.get_or_insert_with(|| self.provider.open_channel());

        if self.priming && !session.primed {
            channel.send(&self.composer.priming_message()).await?;
            session.primed = true;
        }

        let prompt = self.composer.compose(text);
        let start = Instant::now();
        let reply = channel.send(&prompt).await?;
        let latency = start.elapsed();

        session.transcript.push(Turn::assistant(&reply));
        session.quota.record_success();
        let remaining = session.quota.remaining();
        let session_id = session.id;

        if let Some(sink) = &self.analytics {
            let record = AnalyticsRecord::new(session_id, text, &reply, latency);
            if let Err(e) = sink.record(&record).await {
                warn!("Analytics write failed for session {}: {}", session_id, e);
            }
        }

        Ok(TurnOutcome::Answered { reply, remaining })
    }
}
