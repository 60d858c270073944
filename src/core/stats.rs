use crate::core::match_data::{BatterLine, BowlerLine, FullScorecard};

use std::iter::Iterator;

/// Top scorer of `team` over all of its batting innings. Equal runs go to the
/// batter who faced fewer balls.
pub fn best_batter<'a>(scorecard: &'a FullScorecard, team: &str) -> Option<&'a BatterLine> {
    scorecard
        .innings
        .iter()
        .filter(|innings| innings.batting.team == team)
        .flat_map(|innings| innings.batting.batters.iter())
        .fold(None, |best: Option<&BatterLine>, batter| match best {
            Some(b) if batter.runs < b.runs => Some(b),
            Some(b) if batter.runs == b.runs && batter.balls >= b.balls => Some(b),
            _ => Some(batter),
        })
}

/// Bowler of `team` with the most wickets. Ties keep the first one listed.
pub fn best_bowler<'a>(scorecard: &'a FullScorecard, team: &str) -> Option<&'a BowlerLine> {
    scorecard
        .innings
        .iter()
        .filter(|innings| innings.bowling.team == team)
        .flat_map(|innings| innings.bowling.bowlers.iter())
        .fold(None, |best: Option<&BowlerLine>, bowler| match best {
            Some(b) if bowler.wickets <= b.wickets => Some(b),
            _ => Some(bowler),
        })
}
