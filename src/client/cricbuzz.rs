use crate::{
    config::Settings,
    core::{
        match_data::{FullScorecard, MatchSummary},
        router::MatchFeed,
    },
    error::{BotError, BotResult},
};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

// The match center API sits behind the website and expects browser-like headers.
const USER_AGENT: &str = "Mozilla/5.0";
const REFERER: &str = "https://www.cricbuzz.com";

enum Endpoint<'a> {
    Commentary(&'a str),
    Scorecard(&'a str),
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Commentary(match_id) => write!(f, "/api/mcenter/comm/{}", match_id),
            Endpoint::Scorecard(match_id) => write!(f, "/api/mcenter/scorecard/{}", match_id),
        }
    }
}

pub struct Cricbuzz {
    http_client: Client,
    base_url: String,
}

impl Cricbuzz {
    pub fn new(base_url: String, timeout: std::time::Duration) -> BotResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));

        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> BotResult<Self> {
        Cricbuzz::new(settings.cricbuzz_base_url.clone(), settings.api_timeout())
    }

    pub async fn commentary(&self, match_id: &str) -> BotResult<MatchSummary> {
        let response = self.get(&Endpoint::Commentary(match_id)).await?;
        Cricbuzz::parse(&response)
    }

    pub async fn scorecard(&self, match_id: &str) -> BotResult<FullScorecard> {
        let response = self.get(&Endpoint::Scorecard(match_id)).await?;
        Cricbuzz::parse(&response)
    }

    async fn get(&self, endpoint: &Endpoint<'_>) -> BotResult<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {url}");

        let response = self.http_client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            status => Err(BotError::Http(format!("{} for {}", status, url))),
        }
    }

    fn parse<T: DeserializeOwned>(body: &str) -> BotResult<T> {
        Ok(serde_json::from_str::<T>(body)?)
    }
}

#[async_trait]
impl MatchFeed for Cricbuzz {
    async fn match_summary(&self, match_id: &str) -> BotResult<MatchSummary> {
        self.commentary(match_id).await
    }

    async fn full_scorecard(&self, match_id: &str) -> BotResult<FullScorecard> {
        self.scorecard(match_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn endpoints_are_built_from_match_id() {
        assert_eq!(
            Endpoint::Commentary("87654").to_string(),
            "/api/mcenter/comm/87654"
        );
        assert_eq!(
            Endpoint::Scorecard("87654").to_string(),
            "/api/mcenter/scorecard/87654"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = Cricbuzz::new(
            "https://www.cricbuzz.com/".to_string(),
            Duration::from_secs(15),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://www.cricbuzz.com");
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let result = Cricbuzz::parse::<MatchSummary>("<html>blocked</html>");
        assert!(matches!(result, Err(BotError::Parse(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = Cricbuzz::new("http://127.0.0.1:9".to_string(), Duration::from_secs(2))
            .unwrap();
        let error = client.commentary("1").await.unwrap_err();
        assert!(error.is_fetch_error());
    }
}
