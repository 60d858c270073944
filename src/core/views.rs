use crate::{
    core::{
        match_data::{FullScorecard, MatchHeader, MatchSummary},
        stats::{best_batter, best_bowler},
        templates::MessageTemplate,
    },
    error::BotResult,
};

use itertools::Itertools;
use minijinja::context;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub const COLOR_NO_LIVE: u32 = 0x9e9e9e;
pub const COLOR_RESULT: u32 = 0xffc107;
pub const COLOR_LIVE: u32 = 0x4caf50;
pub const COLOR_FULL_SCORECARD: u32 = 0x009688;
pub const COLOR_BATTING: u32 = 0x2196f3;
pub const COLOR_BOWLING: u32 = 0xff5722;

const UNAVAILABLE: &str = "Unavailable";

/// Views offered by the selector. The string form is the option value sent
/// back by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum View {
    #[strum(serialize = "scorecard")]
    Main,
    #[strum(serialize = "batting")]
    Batting,
    #[strum(serialize = "bowling")]
    Bowling,
    #[strum(serialize = "full")]
    Full,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Main => "🏏 Scorecard",
            View::Batting => "🏃 Batting",
            View::Bowling => "🎯 Bowling",
            View::Full => "📊 Full Scorecard",
        }
    }

    /// The full scorecard only exists once the match is over.
    pub fn available(completed: bool) -> Vec<View> {
        View::iter()
            .filter(|view| completed || *view != View::Full)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub match_id: String,
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controls {
    None,
    // View selector plus a refresh button, both bound to the match.
    Interactive { match_id: String, options: Vec<View> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPayload {
    pub title: String,
    pub body: String,
    pub color: u32,
    pub controls: Controls,
}

impl DisplayPayload {
    fn new(title: impl Into<String>, body: String, color: u32, controls: Controls) -> Self {
        Self {
            title: title.into(),
            body,
            color,
            controls,
        }
    }
}

fn controls_for(match_id: &str, header: &MatchHeader) -> Controls {
    Controls::Interactive {
        match_id: match_id.to_string(),
        options: View::available(header.is_completed()),
    }
}

fn or_unavailable(body: String, placeholder: &str) -> String {
    match body.trim().is_empty() {
        true => placeholder.to_string(),
        false => body,
    }
}

// Overs come as 15.2 or 20.0; show them the way the site does (15.2, 20).
fn format_overs(overs: f64) -> String {
    format!("{}", overs)
}

/// Terminal view once a match is over for good. No controls.
pub fn no_live_match() -> DisplayPayload {
    DisplayPayload::new(
        "🏏 Live Cricket",
        "⌛ No live match is streaming right now.".to_string(),
        COLOR_NO_LIVE,
        Controls::None,
    )
}

pub fn render(
    request: &ViewRequest,
    summary: &MatchSummary,
    scorecard: Option<&FullScorecard>,
) -> BotResult<DisplayPayload> {
    match request.view {
        View::Main => main_view(&request.match_id, summary),
        View::Full if summary.match_header.is_completed() => {
            full_scorecard_view(&request.match_id, &summary.match_header, scorecard)
        }
        // Selector from before the match ended.
        View::Full => main_view(&request.match_id, summary),
        View::Batting => batting_view(&request.match_id, summary, scorecard),
        View::Bowling => bowling_view(&request.match_id, summary, scorecard),
    }
}

pub fn main_view(match_id: &str, summary: &MatchSummary) -> BotResult<DisplayPayload> {
    let header = &summary.match_header;
    let controls = controls_for(match_id, header);

    if header.is_completed() {
        let innings = summary
            .miniscore
            .as_ref()
            .map(|m| m.innings())
            .unwrap_or_default()
            .iter()
            .map(|i| {
                context! {
                    team => i.bat_team_name,
                    score => i.score,
                    wickets => i.wickets,
                    overs => format_overs(i.overs),
                }
            })
            .collect::<Vec<_>>();

        let body = MessageTemplate::MatchResult.render(context! {
            innings => innings,
            result => header.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("Result unavailable"),
            player => header.player_of_the_match().unwrap_or("Not announced"),
        })?;
        return Ok(DisplayPayload::new("🏁 Match Result", body, COLOR_RESULT, controls));
    }

    let title = format!("{} vs {}", header.team1.short_name, header.team2.short_name);
    let body = match &summary.miniscore {
        Some(mini) => MessageTemplate::LiveScore.render(context! {
            team => mini.bat_team.team_name,
            score => mini.bat_team.team_score,
            wickets => mini.bat_team.team_wkts,
            overs => format_overs(mini.overs),
            status => header.status.as_deref().unwrap_or_default(),
        })?,
        None => format!(
            "Live score unavailable\n\n{}",
            header.status.as_deref().unwrap_or_default()
        ),
    };
    Ok(DisplayPayload::new(title, body, COLOR_LIVE, controls))
}

pub fn full_scorecard_view(
    match_id: &str,
    header: &MatchHeader,
    scorecard: Option<&FullScorecard>,
) -> BotResult<DisplayPayload> {
    let body = match scorecard {
        Some(card) => {
            let innings = card
                .innings
                .iter()
                .map(|inn| {
                    context! {
                        team => inn.batting.team,
                        batters => inn.batting.batters.iter().map(|b| context! {
                            name => b.name,
                            runs => b.runs,
                            balls => b.balls,
                        }).collect::<Vec<_>>(),
                    }
                })
                .collect::<Vec<_>>();
            or_unavailable(
                MessageTemplate::FullScorecard.render(context! { innings => innings })?,
                UNAVAILABLE,
            )
        }
        None => UNAVAILABLE.to_string(),
    };

    Ok(DisplayPayload::new(
        "📊 Full Scorecard",
        body,
        COLOR_FULL_SCORECARD,
        controls_for(match_id, header),
    ))
}

pub fn batting_view(
    match_id: &str,
    summary: &MatchSummary,
    scorecard: Option<&FullScorecard>,
) -> BotResult<DisplayPayload> {
    let header = &summary.match_header;
    let controls = controls_for(match_id, header);

    if header.is_completed() {
        let best = header
            .winning_team()
            .and_then(|team| Some((team, best_batter(scorecard?, team)?)));
        let body = match best {
            Some((team, batter)) => MessageTemplate::BestBatter.render(context! {
                team => team,
                name => batter.name,
                runs => batter.runs,
                balls => batter.balls,
            })?,
            None => UNAVAILABLE.to_string(),
        };
        return Ok(DisplayPayload::new(
            "🏏 Batting Highlights",
            body,
            COLOR_BATTING,
            controls,
        ));
    }

    let batters = summary
        .miniscore
        .iter()
        .flat_map(|m| [m.batsman_striker.as_ref(), m.batsman_non_striker.as_ref()])
        .flatten()
        .map(|b| {
            context! {
                name => b.name.as_deref().unwrap_or("?"),
                runs => b.runs,
                balls => b.balls,
            }
        })
        .collect_vec();
    let body = or_unavailable(
        MessageTemplate::LiveBatting.render(context! { batters => batters })?,
        "Batting data unavailable",
    );
    Ok(DisplayPayload::new(
        "🏏 Batting",
        body.trim_end().to_string(),
        COLOR_BATTING,
        controls,
    ))
}

pub fn bowling_view(
    match_id: &str,
    summary: &MatchSummary,
    scorecard: Option<&FullScorecard>,
) -> BotResult<DisplayPayload> {
    let header = &summary.match_header;
    let controls = controls_for(match_id, header);

    if header.is_completed() {
        let best = header
            .winning_team()
            .and_then(|team| Some((team, best_bowler(scorecard?, team)?)));
        let body = match best {
            Some((team, bowler)) => MessageTemplate::BestBowler.render(context! {
                team => team,
                name => bowler.name,
                wickets => bowler.wickets,
                runs => bowler.runs,
                overs => format_overs(bowler.overs),
            })?,
            None => UNAVAILABLE.to_string(),
        };
        return Ok(DisplayPayload::new(
            "🎯 Bowling Highlights",
            body,
            COLOR_BOWLING,
            controls,
        ));
    }

    let bowler = summary
        .miniscore
        .as_ref()
        .and_then(|m| m.bowler_striker.clone())
        .unwrap_or_default();
    let body = MessageTemplate::LiveBowling.render(context! {
        name => bowler.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("?"),
        overs => format_overs(bowler.overs),
        runs => bowler.runs,
        wickets => bowler.wickets,
    })?;
    Ok(DisplayPayload::new("🎯 Bowling", body, COLOR_BOWLING, controls))
}
