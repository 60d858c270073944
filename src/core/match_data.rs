use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{Deserializer, Error, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

// Response payloads of the Cricbuzz match center. Fields the bot does not use
// are left out, and every field is optional or defaulted: a partial payload
// renders with placeholders instead of failing the interaction.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MatchState {
    #[serde(rename = "Complete")]
    Completed,
    // "In Progress", "Innings Break", "Stumps", "Preview" ...
    #[default]
    #[serde(other)]
    InProgress,
}

/// Payload of the live commentary endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_header: MatchHeader,
    #[serde(default)]
    pub miniscore: Option<MiniScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHeader {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: MatchState,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team1: Team,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team2: Team,
    #[serde(default, rename = "matchCompleteTimeGMT")]
    pub match_complete_time_gmt: Option<CompletionTime>,
    #[serde(default)]
    pub match_complete_timestamp: Option<CompletionTime>,
    #[serde(default)]
    pub result: Option<MatchResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players_of_the_match: Vec<Player>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(default)]
    pub winning_team: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub name: Option<String>,
}

/// Completion time as sent by the API: either epoch milliseconds or a date string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompletionTime {
    Millis(i64),
    Text(String),
    Unknown(IgnoredAny),
}

impl CompletionTime {
    /// `None` when the value cannot be read as a point in time.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CompletionTime::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            CompletionTime::Text(text) => {
                let text = text.trim();
                if let Ok(ms) = text.parse::<i64>() {
                    return Utc.timestamp_millis_opt(ms).single();
                }
                DateTime::parse_from_rfc3339(text)
                    .map(|d| d.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        // Naive date strings are GMT.
                        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                            .iter()
                            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                            .map(|naive| Utc.from_utc_datetime(&naive))
                    })
            }
            CompletionTime::Unknown(_) => None,
        }
    }
}

impl MatchHeader {
    pub fn is_completed(&self) -> bool {
        self.state == MatchState::Completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.match_complete_time_gmt
            .as_ref()
            .and_then(CompletionTime::to_datetime)
            .or_else(|| {
                self.match_complete_timestamp
                    .as_ref()
                    .and_then(CompletionTime::to_datetime)
            })
    }

    pub fn player_of_the_match(&self) -> Option<&str> {
        self.players_of_the_match
            .first()
            .and_then(|p| p.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Best-effort winner of a completed match: the structured field when the
    /// API provides it, otherwise whatever precedes " won" in the status line
    /// ("IND won by 5 runs" -> "IND").
    pub fn winning_team(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.winning_team.as_deref())
            .filter(|team| !team.is_empty())
            .or_else(|| {
                self.status
                    .as_deref()
                    .and_then(|status| status.split(" won").next())
                    .filter(|team| !team.is_empty())
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bat_team: BatTeam,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overs: f64,
    #[serde(default)]
    pub batsman_striker: Option<BatsmanFigures>,
    #[serde(default)]
    pub batsman_non_striker: Option<BatsmanFigures>,
    #[serde(default)]
    pub bowler_striker: Option<BowlerFigures>,
    #[serde(default)]
    pub match_score_details: Option<MatchScoreDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatTeam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_wkts: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatsmanFigures {
    #[serde(default, alias = "batName")]
    pub name: Option<String>,
    #[serde(default, alias = "batRuns", deserialize_with = "null_as_default")]
    pub runs: u32,
    #[serde(default, alias = "batBalls", deserialize_with = "null_as_default")]
    pub balls: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BowlerFigures {
    #[serde(default, alias = "bowlName")]
    pub name: Option<String>,
    #[serde(default, alias = "bowlOvs", deserialize_with = "null_as_default")]
    pub overs: f64,
    #[serde(default, alias = "bowlRuns", deserialize_with = "null_as_default")]
    pub runs: u32,
    #[serde(default, alias = "bowlWkts", deserialize_with = "null_as_default")]
    pub wickets: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoreDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub innings_score_list: Vec<InningsScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bat_team_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wickets: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overs: f64,
}

impl MiniScore {
    pub fn innings(&self) -> &[InningsScore] {
        self.match_score_details
            .as_ref()
            .map(|d| d.innings_score_list.as_slice())
            .unwrap_or_default()
    }
}

/// Payload of the scorecard endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullScorecard {
    #[serde(default, rename = "scoreCard", deserialize_with = "null_as_default")]
    pub innings: Vec<Innings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Innings {
    #[serde(default, rename = "batTeamDetails", deserialize_with = "null_as_default")]
    pub batting: BattingCard,
    #[serde(default, rename = "bowlTeamDetails", deserialize_with = "null_as_default")]
    pub bowling: BowlingCard,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BattingCard {
    #[serde(default, rename = "batTeamName", deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, rename = "batsmenData", deserialize_with = "map_values_in_order")]
    pub batters: Vec<BatterLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BowlingCard {
    #[serde(default, rename = "bowlTeamName", deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, rename = "bowlersData", deserialize_with = "map_values_in_order")]
    pub bowlers: Vec<BowlerLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatterLine {
    #[serde(default, rename = "batName", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runs: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub balls: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BowlerLine {
    #[serde(default, rename = "bowlName", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wickets: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runs: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overs: f64,
}

// `default` only covers a missing key, Cricbuzz also sends explicit nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Players come keyed by "bat_1", "bat_2", ... Keep the values in document
// order so that "first encountered" means the same thing as on the site.
fn map_values_in_order<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct ValuesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for ValuesVisitor<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a map of player entries or null")
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut values = Vec::with_capacity(map.size_hint().unwrap_or_default());
            while let Some((_key, value)) = map.next_entry::<IgnoredAny, T>()? {
                values.push(value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_any(ValuesVisitor(PhantomData))
}
