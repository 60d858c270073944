use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser, Serialize)]
#[command(about = "Live cricket scores on Slack")]
pub struct Cli {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_level: Option<String>,

    /// Timeout of the Cricbuzz API calls, in seconds
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cricbuzz_api_timeout_sec: Option<u64>,

    /// Minutes after completion before a match stops being shown
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_after_min: Option<i64>,
}
