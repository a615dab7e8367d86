use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    /// Accepting input.
    Open,
    /// Input refused until the date changes.
    Closed,
}

/// Daily question counter for one session.
///
/// `daily_count` only moves up within a calendar day, by exactly one per
/// successful reply. Touching the gate on a later date resets it to zero.
#[derive(Debug, Clone)]
pub struct QuotaGate {
    max_questions: u32,
    daily_count: u32,
    last_reset_date: NaiveDate,
}

impl QuotaGate {
    pub fn new(max_questions: u32, today: NaiveDate) -> Self {
        Self {
            max_questions,
            daily_count: 0,
            last_reset_date: today,
        }
    }

    /// Applies the date-change reset rule. Called whenever the session is
    /// looked at, before the state is read.
    pub fn touch(&mut self, today: NaiveDate) {
        if self.last_reset_date != today {
            self.daily_count = 0;
            self.last_reset_date = today;
        }
    }

    pub fn state(&self) -> GateState {
        if self.daily_count >= self.max_questions {
            GateState::Closed
        } else {
            GateState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == GateState::Open
    }

    /// Consumes one question. Called once per confirmed reply, before any
    /// analytics write.
    pub fn record_success(&mut self) {
        self.daily_count += 1;
    }

    pub fn daily_count(&self) -> u32 {
        self.daily_count
    }

    pub fn remaining(&self) -> u32 {
        self.max_questions.saturating_sub(self.daily_count)
    }
}
