use crate::core::views::View;

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

pub const COMMANDS: [&'static str; 2] = ["/live", "/current"];
pub const VIEW_ACTION_PREFIX: &str = "view";
pub const REFRESH_ACTION_PREFIX: &str = "refresh";

// First word of the command text
static REGEX_FIRST_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());
// "<prefix>_<match id>"
static REGEX_ACTION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<prefix>[a-z]+)_(?P<match_id>.+)$").unwrap());

/// Slash commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectMatch(String),
    ShowCurrent,
    // `/live` without a match id
    Usage,
}

impl Command {
    pub fn build_from(name: &str, text: Option<&str>) -> Option<Command> {
        match name {
            cmd if cmd == COMMANDS[0] => Some(
                text.and_then(|t| REGEX_FIRST_WORD.find(t))
                    .map_or(Command::Usage, |m| Command::SelectMatch(m.as_str().to_string())),
            ),
            cmd if cmd == COMMANDS[1] => Some(Command::ShowCurrent),
            _ => None,
        }
    }

    pub fn usage() -> &'static str {
        "Usage: `/live <cricbuzz match id>` to follow a match, `/current` to show it again."
    }
}

/// Component interactions (selector and refresh button).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    ViewSelected { match_id: String, view: View },
    Refresh { match_id: String },
}

impl Interaction {
    pub fn view_action_id(match_id: &str) -> String {
        format!("{VIEW_ACTION_PREFIX}_{match_id}")
    }

    pub fn refresh_action_id(match_id: &str) -> String {
        format!("{REFRESH_ACTION_PREFIX}_{match_id}")
    }

    /// `selected` is the option value of a selector, unused for buttons.
    pub fn parse(action_id: &str, selected: Option<&str>) -> Option<Interaction> {
        let captures = REGEX_ACTION_ID.captures(action_id)?;
        let match_id = captures["match_id"].to_string();
        match &captures["prefix"] {
            VIEW_ACTION_PREFIX => {
                let view = View::from_str(selected?).ok()?;
                Some(Interaction::ViewSelected { match_id, view })
            }
            REFRESH_ACTION_PREFIX => Some(Interaction::Refresh { match_id }),
            _ => None,
        }
    }
}
