use crate::core::{
    commands::Interaction,
    views::{Controls, DisplayPayload, View},
};

use slack_morphism::prelude::*;

// Blocks cannot carry a colour, only legacy attachments can. The card itself
// is an attachment and the controls stay a regular actions block, which Slack
// shows above the attachments.
pub fn message_content(payload: &DisplayPayload) -> SlackMessageContent {
    let card = SlackMessageAttachment::new()
        .with_color(format!("#{:06x}", payload.color))
        .with_title(payload.title.clone())
        .with_text(payload.body.clone())
        .with_fallback(payload.title.clone())
        .with_mrkdwn_in(vec!["text".to_string()]);

    let content = SlackMessageContent::new()
        .with_text(payload.title.clone())
        .with_attachments(vec![card]);

    match &payload.controls {
        Controls::Interactive { match_id, options } => {
            content.with_blocks(vec![controls_block(match_id, options).into()])
        }
        Controls::None => content,
    }
}

pub fn text_content(text: &str) -> SlackMessageContent {
    SlackMessageContent::new().with_text(text.to_string())
}

fn controls_block(match_id: &str, options: &[View]) -> SlackActionsBlock {
    let selector = SlackBlockStaticSelectElement::new(SlackActionId(
        Interaction::view_action_id(match_id),
    ))
    .with_placeholder(pt!("Choose view"))
    .with_options(
        options
            .iter()
            .map(|view| SlackBlockChoiceItem::new(pt!("{}", view.label()), view.to_string()))
            .collect(),
    );

    let refresh = SlackBlockButtonElement::new(
        SlackActionId(Interaction::refresh_action_id(match_id)),
        pt!("🔄 Refresh"),
    )
    .with_style("primary".to_string());

    SlackActionsBlock::new(vec![selector.into(), refresh.into()])
}
