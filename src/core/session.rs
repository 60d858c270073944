use crate::core::match_data::{FullScorecard, MatchHeader};

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

pub const RESET_AFTER_MINUTES: i64 = 60;

#[derive(Debug, Clone, Default)]
pub enum ScorecardState {
    #[default]
    NotFetched,
    Fetched(Arc<FullScorecard>),
    // Kept apart from NotFetched for logs, but a failed fetch is retried.
    FetchFailed,
}

/// The match the channel last asked for, plus its scorecard once the match is
/// over. Single slot: selecting another match drops everything about the
/// previous one.
#[derive(Debug, Default)]
pub struct MatchSession {
    current_match_id: Option<String>,
    scorecard: ScorecardState,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_match(&mut self, match_id: &str) {
        self.current_match_id = Some(match_id.to_string());
        self.scorecard = ScorecardState::NotFetched;
    }

    pub fn current(&self) -> Option<&str> {
        self.current_match_id.as_deref()
    }

    pub fn is_current(&self, match_id: &str) -> bool {
        self.current() == Some(match_id)
    }

    #[cfg(test)]
    pub fn scorecard_state(&self) -> &ScorecardState {
        &self.scorecard
    }

    pub fn scorecard(&self) -> Option<Arc<FullScorecard>> {
        match &self.scorecard {
            ScorecardState::Fetched(card) => Some(card.clone()),
            _ => None,
        }
    }

    /// Callers only fetch when this is true, so a scorecard is recorded at most
    /// once per selected match.
    pub fn needs_scorecard(&self) -> bool {
        !matches!(self.scorecard, ScorecardState::Fetched(_))
    }

    pub fn record_scorecard(&mut self, card: FullScorecard) -> Arc<FullScorecard> {
        let card = Arc::new(card);
        self.scorecard = ScorecardState::Fetched(card.clone());
        card
    }

    pub fn record_scorecard_failure(&mut self) {
        self.scorecard = ScorecardState::FetchFailed;
    }
}

#[derive(Clone, Default)]
pub struct SharedSession {
    data: Arc<Mutex<MatchSession>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the session half-written,
    // every mutation is a single assignment.
    pub fn lock(&self) -> MutexGuard<'_, MatchSession> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Whether a completed match has been over long enough that the bot should
/// stop showing it. Matches without a (readable) completion time never reset.
pub fn should_reset(header: &MatchHeader, now: DateTime<Utc>, reset_after: Duration) -> bool {
    header
        .completed_at()
        .map_or(false, |completed_at| now - completed_at > reset_after)
}
