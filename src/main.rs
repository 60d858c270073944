use howzat_bot::client::cricbuzz::Cricbuzz;
use howzat_bot::config::Settings;
use howzat_bot::core::{router::Router, session::SharedSession};
use howzat_bot::messaging::client::initialize_messaging;

use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Settings::new()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(settings.get_trace_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Using Cricbuzz at {} (timeout {}s).",
        settings.cricbuzz_base_url, settings.cricbuzz_api_timeout_sec
    );
    let cricbuzz = Cricbuzz::from_settings(&settings)?;

    // One session per process: the match the workspace is currently following.
    let router = Router::new(cricbuzz, SharedSession::new(), settings.reset_after());

    info!("Initializing messaging engine.");
    initialize_messaging(router, &settings.slack_app_token, &settings.slack_token).await?;

    Ok(())
}
