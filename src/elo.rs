//! Elo rating post-processor.
//!
//! Pure arithmetic over an already-extracted dataset; it never touches the
//! acquisition pipeline. Matches are rated oldest first; draws apply half
//! the k-factor; unplayed fixtures leave ratings untouched.

use std::collections::HashMap;

use tracing::debug;

use crate::model::MatchRecord;

/// Rating parameters.
#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub initial: f64,
    pub k_factor: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            initial: 1000.0,
            k_factor: 120.0,
        }
    }
}

/// Per-match rating snapshot, aligned with the input record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRatings {
    pub home_start: f64,
    pub away_start: f64,
    pub home_end: f64,
    pub away_end: f64,
}

/// Final rating tables of a run.
#[derive(Debug, Default)]
pub struct RatingTable {
    current: HashMap<String, f64>,
    peak: HashMap<String, f64>,
}

impl RatingTable {
    pub fn current(&self, team: &str) -> Option<f64> {
        self.current.get(team).copied()
    }

    pub fn peak(&self, team: &str) -> Option<f64> {
        self.peak.get(team).copied()
    }

    /// Current ratings, best first.
    pub fn current_ranking(&self) -> Vec<(String, f64)> {
        ranked(&self.current)
    }

    /// Peak ratings, best first.
    pub fn peak_ranking(&self) -> Vec<(String, f64)> {
        ranked(&self.peak)
    }
}

fn ranked(ratings: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = ratings
        .iter()
        .map(|(team, elo)| (team.clone(), *elo))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Rate every played match, oldest first.
///
/// Returns one rating snapshot per input record (aligned by index, `None`
/// for unplayed fixtures) plus the final tables.
pub fn calculate(records: &[MatchRecord], config: EloConfig) -> (Vec<Option<MatchRatings>>, RatingTable) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| records[i].date);

    let mut table = RatingTable::default();
    let mut per_match: Vec<Option<MatchRatings>> = vec![None; records.len()];

    for index in order {
        let record = &records[index];
        let Some(winner) = record.winner.as_deref() else {
            debug!(
                "skipping unplayed fixture {} v {} on {}",
                record.home_team, record.away_team, record.date
            );
            continue;
        };

        let home_start = *table
            .current
            .entry(record.home_team.clone())
            .or_insert(config.initial);
        let away_start = *table
            .current
            .entry(record.away_team.clone())
            .or_insert(config.initial);

        let (home_end, away_end) = if winner == record.home_team {
            update(home_start, away_start, config.k_factor)
        } else if winner == record.away_team {
            let (w, l) = update(away_start, home_start, config.k_factor);
            (l, w)
        } else {
            // Draw: both sides move half as far.
            update(home_start, away_start, config.k_factor / 2.0)
        };

        table.current.insert(record.home_team.clone(), home_end);
        table.current.insert(record.away_team.clone(), away_end);
        bump_peak(&mut table.peak, &record.home_team, home_end, config.initial);
        bump_peak(&mut table.peak, &record.away_team, away_end, config.initial);

        per_match[index] = Some(MatchRatings {
            home_start,
            away_start,
            home_end,
            away_end,
        });
    }

    (per_match, table)
}

/// Expected score of `a` against `b`.
pub fn expected_score(elo_a: f64, elo_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((elo_b - elo_a) / 400.0))
}

/// New (winner, loser) ratings, rounded to two decimals.
fn update(winner_elo: f64, loser_elo: f64, k_factor: f64) -> (f64, f64) {
    let expected_win = expected_score(winner_elo, loser_elo);
    let new_winner = winner_elo + k_factor * (1.0 - expected_win);
    let new_loser = loser_elo - k_factor * (1.0 - expected_win);
    (round2(new_winner), round2(new_loser))
}

fn bump_peak(peak: &mut HashMap<String, f64>, team: &str, elo: f64, initial: f64) {
    let entry = peak.entry(team.to_string()).or_insert(initial);
    if elo > *entry {
        *entry = elo;
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn record(home: &str, away: &str, score: &str, day: u32) -> MatchRecord {
        MatchRecord::from_listing(
            home.into(),
            away.into(),
            "Somewhere".into(),
            score,
            "1".into(),
            "2021/2022".into(),
            NaiveDate::from_ymd_opt(2022, 1, day).unwrap(),
            None,
        )
    }

    #[test]
    fn expected_score_is_even_for_equal_ratings() {
        assert!((expected_score(1000.0, 1000.0) - 0.5).abs() < 1e-9);
        assert!(expected_score(1200.0, 1000.0) > 0.5);
    }

    #[test]
    fn winner_gains_what_the_loser_sheds() {
        let records = vec![record("A", "B", "2-0", 1)];
        let (per_match, table) = calculate(&records, EloConfig::default());

        let ratings = per_match[0].unwrap();
        assert_eq!(ratings.home_start, 1000.0);
        assert_eq!(ratings.home_end, 1060.0);
        assert_eq!(ratings.away_end, 940.0);
        assert_eq!(table.current("A"), Some(1060.0));
        assert_eq!(table.current("B"), Some(940.0));
    }

    #[test]
    fn draws_move_ratings_by_half_k() {
        // Equal ratings draw: expected 0.5, delta = (k/2) * 0.5 = 30.
        let records = vec![record("A", "B", "1-1", 1)];
        let (per_match, _) = calculate(&records, EloConfig::default());
        let ratings = per_match[0].unwrap();
        assert_eq!(ratings.home_end, 1030.0);
        assert_eq!(ratings.away_end, 970.0);
    }

    #[test]
    fn matches_rate_oldest_first_regardless_of_input_order() {
        // Day 2 listed before day 1; day 1 must be rated first.
        let records = vec![record("A", "B", "1-0", 2), record("A", "B", "0-1", 1)];
        let (per_match, table) = calculate(&records, EloConfig::default());

        let first_played = per_match[1].unwrap();
        assert_eq!(first_played.home_start, 1000.0);
        let second_played = per_match[0].unwrap();
        assert_eq!(second_played.home_start, 940.0);
        assert_eq!(second_played.away_start, 1060.0);

        // A lost then beat a now-stronger B.
        assert!(table.current("A").unwrap() > 1000.0 - 60.0);
        assert_eq!(table.peak("B"), Some(1060.0));
    }

    #[test]
    fn unplayed_fixtures_are_skipped() {
        let records = vec![record("A", "B", "POSTPONED", 1)];
        let (per_match, table) = calculate(&records, EloConfig::default());
        assert_eq!(per_match[0], None);
        assert_eq!(table.current("A"), None);
    }
}
