use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::stats::DetailedStats;

/// One fixture from a date-grouped listing block.
///
/// Goals are absent for unplayed fixtures (postponed, abandoned); in that
/// case `winner`/`loser` are absent too. When both goal counts are present
/// the outcome is a pure function of their numeric comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    /// Winning team name, or `"draw"` on equal scores. Absent if unplayed.
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub venue: String,
    pub competition_id: String,
    pub season_label: String,
    pub date: NaiveDate,
    /// Opaque match token, used to reach the detail page. Not every listing
    /// variant carries one.
    pub match_id: Option<String>,
    /// Filled in by the enrichment pass, keyed back via `match_id`.
    pub details: Option<DetailedStats>,
}

impl MatchRecord {
    /// Build a record from raw listing fields. `score_text` is the text of
    /// the score span; anything that does not split into two integers
    /// yields an unplayed record.
    #[allow(clippy::too_many_arguments)]
    pub fn from_listing(
        home_team: String,
        away_team: String,
        venue: String,
        score_text: &str,
        competition_id: String,
        season_label: String,
        date: NaiveDate,
        match_id: Option<String>,
    ) -> Self {
        let goals = parse_score(score_text);
        let (winner, loser) = match goals {
            Some((h, a)) => {
                let (w, l) = decide_outcome(&home_team, &away_team, h, a);
                (Some(w), Some(l))
            }
            None => (None, None),
        };
        Self {
            home_team,
            away_team,
            home_goals: goals.map(|(h, _)| h),
            away_goals: goals.map(|(_, a)| a),
            winner,
            loser,
            venue,
            competition_id,
            season_label,
            date,
            match_id,
            details: None,
        }
    }

    /// True when the fixture has a final score.
    pub fn is_played(&self) -> bool {
        self.home_goals.is_some() && self.away_goals.is_some()
    }

    /// Merge detailed statistics onto this record. The only permitted
    /// post-creation mutation.
    pub fn attach_details(&mut self, details: DetailedStats) {
        self.details = Some(details);
    }
}

/// Split a score like `"2-1"` into numeric goal counts.
///
/// Returns `None` for anything that is not exactly two integer tokens
/// (e.g. a postponed fixture showing "POSTPONED" or a kickoff time).
pub fn parse_score(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.trim().splitn(2, '-');
    let home = parts.next()?.trim().parse().ok()?;
    let away = parts.next()?.trim().parse().ok()?;
    Some((home, away))
}

/// Decide winner and loser from numeric goal counts.
///
/// The comparison must stay numeric: comparing the textual digits would
/// rank "10" below "9" and misclassify multi-digit scorelines.
pub fn decide_outcome(home: &str, away: &str, home_goals: u32, away_goals: u32) -> (String, String) {
    match home_goals.cmp(&away_goals) {
        Ordering::Greater => (home.to_string(), away.to_string()),
        Ordering::Less => (away.to_string(), home.to_string()),
        Ordering::Equal => ("draw".to_string(), "draw".to_string()),
    }
}
