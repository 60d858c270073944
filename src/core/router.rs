use crate::{
    core::{
        match_data::{FullScorecard, MatchSummary},
        session::{should_reset, SharedSession},
        views::{self, DisplayPayload, View, ViewRequest},
    },
    error::{BotError, BotResult},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Source of match data. Implemented by the Cricbuzz client.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn match_summary(&self, match_id: &str) -> BotResult<MatchSummary>;

    /// Only expected to succeed once the match is completed.
    async fn full_scorecard(&self, match_id: &str) -> BotResult<FullScorecard>;
}

/// Turns the externally triggered operations (match selection, view change,
/// refresh) into display payloads, keeping the current match in `session`.
pub struct Router<F: MatchFeed> {
    feed: F,
    session: SharedSession,
    reset_after: Duration,
}

impl<F: MatchFeed> Router<F> {
    pub fn new(feed: F, session: SharedSession, reset_after: Duration) -> Self {
        Self {
            feed,
            session,
            reset_after,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub async fn on_match_selected(&self, match_id: &str) -> BotResult<DisplayPayload> {
        info!("Match {match_id} selected");
        self.session.lock().select_match(match_id);
        self.render_view(ViewRequest {
            match_id: match_id.to_string(),
            view: View::Main,
        })
        .await
    }

    pub async fn on_show_current(&self) -> BotResult<DisplayPayload> {
        let match_id = self
            .session
            .lock()
            .current()
            .map(str::to_string)
            .ok_or(BotError::NoCurrentMatch)?;
        self.render_view(ViewRequest {
            match_id,
            view: View::Main,
        })
        .await
    }

    pub async fn on_view_requested(&self, match_id: &str, view: View) -> BotResult<DisplayPayload> {
        self.render_view(ViewRequest {
            match_id: match_id.to_string(),
            view,
        })
        .await
    }

    /// Live data only, the scorecard is left alone.
    pub async fn on_refresh_requested(&self, match_id: &str) -> BotResult<DisplayPayload> {
        let summary = self.feed.match_summary(match_id).await?;
        if should_reset(&summary.match_header, Utc::now(), self.reset_after) {
            return Ok(views::no_live_match());
        }
        views::main_view(match_id, &summary)
    }

    pub async fn render_view(&self, request: ViewRequest) -> BotResult<DisplayPayload> {
        let summary = self.feed.match_summary(&request.match_id).await?;
        let header = &summary.match_header;

        if should_reset(header, Utc::now(), self.reset_after) {
            info!("Match {} is over, nothing live to show", request.match_id);
            return Ok(views::no_live_match());
        }

        let scorecard = match header.is_completed() {
            true => self.scorecard_for(&request.match_id).await,
            false => None,
        };

        views::render(&request, &summary, scorecard.as_deref())
    }

    // Cached for the current match, fetched at most once there. Any other match
    // gets a one-off fetch, the slot stays with the current one.
    async fn scorecard_for(&self, match_id: &str) -> Option<Arc<FullScorecard>> {
        {
            let session = self.session.lock();
            if session.is_current(match_id) && !session.needs_scorecard() {
                return session.scorecard();
            }
        }

        match self.feed.full_scorecard(match_id).await {
            Ok(card) => {
                let mut session = self.session.lock();
                match session.is_current(match_id) {
                    true => Some(session.record_scorecard(card)),
                    false => Some(Arc::new(card)),
                }
            }
            Err(e) => {
                warn!("Could not fetch scorecard of match {match_id}. {e}");
                let mut session = self.session.lock();
                if session.is_current(match_id) {
                    session.record_scorecard_failure();
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        match_data::{
            BatTeam, BatterLine, BattingCard, CompletionTime, Innings, MatchHeader, MatchState,
            MiniScore, Team,
        },
        session::ScorecardState,
        views::Controls,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFeed {
        summary: Mutex<Option<MatchSummary>>,
        scorecard_fails: Mutex<bool>,
        summary_calls: AtomicUsize,
        scorecard_calls: AtomicUsize,
    }

    impl FakeFeed {
        fn with_summary(summary: MatchSummary) -> Self {
            let feed = FakeFeed::default();
            *feed.summary.lock().unwrap() = Some(summary);
            feed
        }
    }

    #[async_trait]
    impl MatchFeed for FakeFeed {
        async fn match_summary(&self, _match_id: &str) -> BotResult<MatchSummary> {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            self.summary
                .lock()
                .unwrap()
                .clone()
                .ok_or(BotError::Timeout("no answer after 15s".to_string()))
        }

        async fn full_scorecard(&self, _match_id: &str) -> BotResult<FullScorecard> {
            self.scorecard_calls.fetch_add(1, Ordering::SeqCst);
            if *self.scorecard_fails.lock().unwrap() {
                return Err(BotError::Http("404 Not Found".to_string()));
            }
            Ok(FullScorecard {
                innings: vec![Innings {
                    batting: BattingCard {
                        team: "IND".to_string(),
                        batters: vec![BatterLine {
                            name: "Kohli".to_string(),
                            runs: 76,
                            balls: 59,
                        }],
                    },
                    ..Default::default()
                }],
            })
        }
    }

    fn live() -> MatchSummary {
        MatchSummary {
            match_header: MatchHeader {
                state: MatchState::InProgress,
                status: Some("IND need 50 runs".to_string()),
                team1: Team {
                    short_name: "IND".to_string(),
                },
                team2: Team {
                    short_name: "AUS".to_string(),
                },
                ..Default::default()
            },
            miniscore: Some(MiniScore {
                bat_team: BatTeam {
                    team_name: "IND".to_string(),
                    team_score: 120,
                    team_wkts: 3,
                },
                overs: 15.2,
                ..Default::default()
            }),
        }
    }

    fn completed_ago(ago: Duration) -> MatchSummary {
        let completed_at = Utc::now() - ago;
        MatchSummary {
            match_header: MatchHeader {
                state: MatchState::Completed,
                status: Some("IND won by 5 runs".to_string()),
                match_complete_time_gmt: Some(CompletionTime::Millis(
                    completed_at.timestamp_millis(),
                )),
                ..Default::default()
            },
            miniscore: None,
        }
    }

    fn router(feed: FakeFeed) -> Router<FakeFeed> {
        Router::new(feed, SharedSession::new(), Duration::hours(1))
    }

    #[tokio::test]
    async fn selecting_a_live_match_renders_main_view() {
        let router = router(FakeFeed::with_summary(live()));
        let payload = router.on_match_selected("100").await.unwrap();

        assert!(payload.body.contains("IND 120/3"));
        assert_eq!(router.session().lock().current(), Some("100"));
        assert_eq!(router.feed.scorecard_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn show_current_needs_a_selection() {
        let router = router(FakeFeed::with_summary(live()));
        let error = router.on_show_current().await.unwrap_err();
        assert!(matches!(error, BotError::NoCurrentMatch));
        assert_eq!(router.feed.summary_calls.load(Ordering::SeqCst), 0);

        router.on_match_selected("100").await.unwrap();
        let payload = router.on_show_current().await.unwrap();
        assert_eq!(payload.title, "IND vs AUS");
    }

    #[tokio::test]
    async fn stale_completed_match_has_no_controls_whatever_the_view() {
        let router = router(FakeFeed::with_summary(completed_ago(Duration::hours(2))));

        let payload = router.on_match_selected("100").await.unwrap();
        assert_eq!(payload, views::no_live_match());

        for view in [View::Main, View::Batting, View::Bowling, View::Full] {
            let payload = router.on_view_requested("100", view).await.unwrap();
            assert_eq!(payload.controls, Controls::None);
        }
        let payload = router.on_refresh_requested("100").await.unwrap();
        assert_eq!(payload, views::no_live_match());
    }

    #[tokio::test]
    async fn scorecard_is_fetched_once_per_selected_match() {
        let router = router(FakeFeed::with_summary(completed_ago(Duration::minutes(10))));
        router.on_match_selected("100").await.unwrap();

        let batting = router
            .on_view_requested("100", View::Batting)
            .await
            .unwrap();
        assert!(batting.body.contains("Kohli – 76 (59)"));
        router.on_view_requested("100", View::Full).await.unwrap();
        router.on_refresh_requested("100").await.unwrap();
        assert_eq!(router.feed.scorecard_calls.load(Ordering::SeqCst), 1);

        // A new selection starts over.
        router.on_match_selected("100").await.unwrap();
        assert_eq!(router.feed.scorecard_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_scorecard_degrades_and_is_retried() {
        let feed = FakeFeed::with_summary(completed_ago(Duration::minutes(10)));
        *feed.scorecard_fails.lock().unwrap() = true;
        let router = router(feed);

        router.on_match_selected("100").await.unwrap();
        let full = router.on_view_requested("100", View::Full).await.unwrap();
        assert_eq!(full.body, "Unavailable");
        assert!(matches!(
            router.session().lock().scorecard_state(),
            ScorecardState::FetchFailed
        ));

        *router.feed.scorecard_fails.lock().unwrap() = false;
        let full = router.on_view_requested("100", View::Full).await.unwrap();
        assert!(full.body.contains("Kohli 76 (59)"));
        assert_eq!(router.feed.scorecard_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn other_match_scorecard_is_not_cached() {
        let router = router(FakeFeed::with_summary(completed_ago(Duration::minutes(10))));
        router.session().lock().select_match("100");

        router.on_view_requested("200", View::Full).await.unwrap();
        router.on_view_requested("200", View::Full).await.unwrap();
        assert_eq!(router.feed.scorecard_calls.load(Ordering::SeqCst), 2);
        assert!(router.session().lock().scorecard().is_none());
    }

    #[tokio::test]
    async fn live_data_failure_aborts_the_interaction() {
        let router = router(FakeFeed::default());
        let error = router.on_match_selected("100").await.unwrap_err();
        assert!(error.is_fetch_error());
        assert!(error.user_message().is_some());
    }
}
