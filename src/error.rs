use std::error::Error;
use std::fmt;

/// Custom Error and Result types to unify errors from all sources.
pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug)]
pub enum BotError {
    Http(String),
    Timeout(String),
    Parse(String),
    Template(String),
    Config(String),
    Slack(String),
    NoCurrentMatch,
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BotError::Http(s) => write!(f, "HTTP Error: {}", s),
            BotError::Timeout(s) => write!(f, "Timeout Error: {}", s),
            BotError::Parse(s) => write!(f, "Parse Error: {}", s),
            BotError::Template(s) => write!(f, "Template Error: {}", s),
            BotError::Config(s) => write!(f, "Config Error: {}", s),
            BotError::Slack(s) => write!(f, "Slack Error: {}", s),
            BotError::NoCurrentMatch => write!(f, "No match selected"),
        }
    }
}

impl Error for BotError {}

impl BotError {
    /// Whether the error comes from one of the Cricbuzz endpoints.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            BotError::Http(_) | BotError::Timeout(_) | BotError::Parse(_)
        )
    }

    /// Text shown back to the user, if the error is worth showing at all.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            BotError::NoCurrentMatch => Some("❌ No active match. Use `/live` first."),
            e if e.is_fetch_error() => {
                Some("⚠️ Could not fetch match data, please try again later.")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        // Timeouts and other network failures are surfaced the same way upward,
        // the distinction only matters for logs.
        if error.is_timeout() {
            BotError::Timeout(error.to_string())
        } else {
            BotError::Http(error.to_string())
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(error: serde_json::Error) -> Self {
        BotError::Parse(error.to_string())
    }
}

impl From<minijinja::Error> for BotError {
    fn from(error: minijinja::Error) -> Self {
        BotError::Template(error.to_string())
    }
}

impl From<slack_morphism::errors::SlackClientError> for BotError {
    fn from(error: slack_morphism::errors::SlackClientError) -> Self {
        BotError::Slack(error.to_string())
    }
}

impl From<figment::Error> for BotError {
    fn from(error: figment::Error) -> Self {
        BotError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_share_a_generic_message() {
        let timeout = BotError::Timeout("15s".to_string());
        let http = BotError::Http("503".to_string());
        assert!(timeout.is_fetch_error());
        assert_eq!(timeout.user_message(), http.user_message());
    }

    #[test]
    fn no_current_match_points_to_live_command() {
        let message = BotError::NoCurrentMatch.user_message().unwrap();
        assert!(message.contains("/live"));
    }

    #[test]
    fn internal_errors_stay_silent() {
        assert!(BotError::Slack("socket closed".to_string())
            .user_message()
            .is_none());
        assert!(BotError::Template("oops".to_string())
            .user_message()
            .is_none());
    }
}
