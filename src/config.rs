use crate::cli::Cli;
use crate::core::session::RESET_AFTER_MINUTES;
use crate::error::BotResult;
use chrono::Duration;
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

const TRACE_LEVELS: [&'static str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const LOCAL_SETTINGS_YAML_FILE: &str = ".env.local.yaml";

// All settings may be configured via environment variables. Example:
// SLACK_APP_TOKEN="xapp-xxx" would set slack_app_token to the xapp-xxx value.
// Priority, from lowest to highest: local yaml file, environment, command line.
#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    trace_level: String,
    // App-level token used to open the Socket Mode connection
    pub slack_app_token: String,
    // Bot token used to post messages in channels
    pub slack_token: String,
    #[serde(default = "default_cricbuzz_base_url")]
    pub cricbuzz_base_url: String,
    #[serde(default = "default_cricbuzz_api_timeout_sec")]
    pub cricbuzz_api_timeout_sec: u64,
    #[serde(default = "default_reset_after_min")]
    pub reset_after_min: i64,
}

impl Settings {
    pub fn new() -> BotResult<Self> {
        let mut figment = Figment::new();
        if Path::new(LOCAL_SETTINGS_YAML_FILE).exists() {
            println!(
                "\n######################################\n\
                   ##   Found '.env.local.yaml' file,  ##\n\
                   ##   loading local configuration.   ##\n\
                   ######################################\n\
                "
            );
            figment = figment.merge(Yaml::file(LOCAL_SETTINGS_YAML_FILE));
        }

        let settings = figment
            .merge(Env::raw())
            .merge(Serialized::defaults(Cli::parse()))
            .extract()?;

        Ok(settings)
    }

    pub fn get_trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }

    pub fn api_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cricbuzz_api_timeout_sec)
    }

    pub fn reset_after(&self) -> Duration {
        Duration::minutes(self.reset_after_min)
    }
}

fn get_trace_level(level_str: &str) -> Level {
    match level_str.to_uppercase().as_str() {
        level if level == TRACE_LEVELS[0] => Level::TRACE,
        level if level == TRACE_LEVELS[1] => Level::DEBUG,
        level if level == TRACE_LEVELS[2] => Level::INFO,
        level if level == TRACE_LEVELS[3] => Level::WARN,
        level if level == TRACE_LEVELS[4] => Level::ERROR,
        // Default trace level
        _ => Level::INFO,
    }
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_cricbuzz_base_url() -> String {
    "https://www.cricbuzz.com".to_string()
}

fn default_cricbuzz_api_timeout_sec() -> u64 {
    15
}

fn default_reset_after_min() -> i64 {
    RESET_AFTER_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_level_is_case_insensitive() {
        assert_eq!(get_trace_level("debug"), Level::DEBUG);
        assert_eq!(get_trace_level("WARN"), Level::WARN);
        assert_eq!(get_trace_level("verbose"), Level::INFO);
    }

    #[test]
    fn defaults_apply_when_only_tokens_are_set() {
        let settings: Settings = Figment::new()
            .merge(Serialized::default("slack_app_token", "xapp-test"))
            .merge(Serialized::default("slack_token", "xoxb-test"))
            .extract()
            .unwrap();

        assert_eq!(settings.cricbuzz_base_url, "https://www.cricbuzz.com");
        assert_eq!(settings.api_timeout(), std::time::Duration::from_secs(15));
        assert_eq!(settings.reset_after(), Duration::hours(1));
        assert_eq!(settings.get_trace_level(), Level::INFO);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let result: Result<Settings, figment::Error> = Figment::new().extract();
        assert!(result.is_err());

        let result: Result<Settings, figment::Error> = Figment::new()
            .merge(Serialized::default("slack_app_token", "xapp-test"))
            .extract();
        assert!(result.is_err());
    }
}
