use crate::{
    client::cricbuzz::Cricbuzz,
    core::{
        commands::{Command, Interaction},
        router::Router,
        views::DisplayPayload,
    },
    error::{BotError, BotResult},
    messaging::blocks::{message_content, text_content},
};
use http::StatusCode;
use slack_morphism::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

pub type CricketRouter = Router<Cricbuzz>;

type CallbackResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Shared with every callback through the listener user state.
struct BotState {
    router: Arc<CricketRouter>,
    bot_token: SlackApiToken,
}

// Where a rendered payload goes.
enum Reply {
    // New message in the channel, for slash commands.
    Post(SlackChannelId),
    // Rewrite the message holding the clicked control.
    Replace(SlackResponseUrl),
}

// Who triggered the event. Errors are only shown to them.
struct Origin {
    channel: SlackChannelId,
    user: SlackUserId,
}

async fn state_from(states: &SlackClientEventsUserState) -> BotResult<Arc<BotState>> {
    let states = states.read().await;
    states
        .get_user_state::<Arc<BotState>>()
        .cloned()
        .ok_or_else(|| BotError::Slack("Bot state missing from listener state".to_string()))
}

fn ephemeral(text: &str) -> SlackCommandEventResponse {
    SlackCommandEventResponse::new(text_content(text))
        .with_response_type(SlackMessageResponseType::Ephemeral)
}

async fn deliver(
    client: &SlackHyperClient,
    bot_token: &SlackApiToken,
    payload: &DisplayPayload,
    reply: Reply,
) -> BotResult<()> {
    let content = message_content(payload);
    match reply {
        Reply::Post(channel) => {
            let session = client.open_session(bot_token);
            session
                .chat_post_message(&SlackApiChatPostMessageRequest::new(channel, content))
                .await?;
        }
        Reply::Replace(response_url) => {
            let request =
                SlackApiPostWebhookMessageRequest::new(content).with_replace_original(true);
            client.respond_to_event(&response_url, &request).await?;
        }
    }
    Ok(())
}

async fn notify(
    client: &SlackHyperClient,
    bot_token: &SlackApiToken,
    origin: Origin,
    text: &str,
) -> BotResult<()> {
    let session = client.open_session(bot_token);
    session
        .chat_post_ephemeral(&SlackApiChatPostEphemeralRequest::new(
            origin.channel,
            origin.user,
            text_content(text),
        ))
        .await?;
    Ok(())
}

async fn respond(
    client: &SlackHyperClient,
    bot_token: &SlackApiToken,
    result: BotResult<DisplayPayload>,
    reply: Reply,
    origin: Option<Origin>,
) {
    let outcome = match result {
        Ok(payload) => deliver(client, bot_token, &payload, reply).await,
        Err(e) => {
            let Some(text) = e.user_message() else {
                // Nothing sensible to tell the user, the interaction is left as is.
                error!("{e}");
                return;
            };
            match e {
                BotError::NoCurrentMatch => info!("{e}"),
                _ => error!("{e}"),
            }
            match origin {
                Some(origin) => notify(client, bot_token, origin, text).await,
                None => {
                    warn!("No channel to report the error to");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = outcome {
        error!("{e}");
    }
}

async fn command_events_socket_mode_function(
    event: SlackCommandEvent,
    client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> CallbackResult<SlackCommandEventResponse> {
    let name = event.command.0.as_str();
    info!("Received command {name} in channel {}", event.channel_id);

    // `None` means "show the current match".
    let match_id = match Command::build_from(name, event.text.as_deref()) {
        Some(Command::SelectMatch(match_id)) => Some(match_id),
        Some(Command::ShowCurrent) => None,
        Some(Command::Usage) | None => return Ok(ephemeral(Command::usage())),
    };

    let state = state_from(&states).await?;
    let origin = Origin {
        channel: event.channel_id.clone(),
        user: event.user_id.clone(),
    };

    // Slack wants an acknowledgement within 3 seconds, Cricbuzz may take 15.
    tokio::spawn(async move {
        let result = match match_id {
            Some(match_id) => state.router.on_match_selected(&match_id).await,
            None => state.router.on_show_current().await,
        };
        let reply = Reply::Post(origin.channel.clone());
        respond(&client, &state.bot_token, result, reply, Some(origin)).await;
    });

    Ok(ephemeral("⏳ Fetching match data..."))
}

async fn interaction_events_socket_mode_function(
    event: SlackInteractionEvent,
    client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> CallbackResult<()> {
    // Only block actions (selector, buttons) are bound to the bot.
    let SlackInteractionEvent::BlockActions(block_actions) = event else {
        return Ok(());
    };

    let Some(response_url) = block_actions.response_url else {
        warn!("Block action without response url, ignoring it");
        return Ok(());
    };

    let interactions = block_actions
        .actions
        .unwrap_or_default()
        .iter()
        .filter_map(|action| {
            let selected = action.selected_option.as_ref().map(|o| o.value.as_str());
            Interaction::parse(&action.action_id.0, selected)
        })
        .collect::<Vec<Interaction>>();

    if interactions.is_empty() {
        return Ok(());
    }

    let state = state_from(&states).await?;
    let channel = block_actions.channel.map(|c| c.id);
    let user = block_actions.user.map(|u| u.id);
    for interaction in interactions {
        info!("Received interaction {interaction:?}");
        let state = state.clone();
        let client = client.clone();
        let reply = Reply::Replace(response_url.clone());
        let origin = channel
            .clone()
            .zip(user.clone())
            .map(|(channel, user)| Origin { channel, user });

        tokio::spawn(async move {
            let router = &state.router;
            let result = match interaction {
                Interaction::ViewSelected { match_id, view } => {
                    router.on_view_requested(&match_id, view).await
                }
                Interaction::Refresh { match_id } => router.on_refresh_requested(&match_id).await,
            };
            respond(&client, &state.bot_token, result, reply, origin).await;
        });
    }

    Ok(())
}

fn error_handler(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> StatusCode {
    let error = BotError::Slack(err.to_string());
    error!("{error}");

    // This return value should be OK if we want to return successful ack to the Slack server using Web-sockets
    // https://api.slack.com/apis/connections/socket-implement#acknowledge
    // so that Slack knows whether to retry
    StatusCode::OK
}

pub async fn initialize_messaging(
    router: CricketRouter,
    app_token: &str,
    bot_token: &str,
) -> BotResult<()> {
    let client = Arc::new(SlackClient::new(SlackClientHyperConnector::new()));

    let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
        .with_command_events(command_events_socket_mode_function)
        .with_interaction_events(interaction_events_socket_mode_function);

    let listener_environment = Arc::new(
        SlackClientEventsListenerEnvironment::new(client.clone())
            .with_error_handler(error_handler)
            .with_user_state(Arc::new(BotState {
                router: Arc::new(router),
                bot_token: SlackApiToken::new(bot_token.to_string().into()),
            })),
    );

    let socket_mode_listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_environment.clone(),
        socket_mode_callbacks,
    );

    let app_token_value: SlackApiTokenValue = app_token.to_string().into();
    let app_token: SlackApiToken = SlackApiToken::new(app_token_value);

    info!("Connecting to Slack in socket mode.");
    socket_mode_listener
        .listen_for(&app_token)
        .await
        .map_err(|e| BotError::Slack(e.to_string()))?;

    socket_mode_listener.serve().await;

    Ok(())
}
