//! CSV output.
//!
//! The sink is a consumer of the core's record types, not part of the
//! acquisition pipeline itself. Quoting is RFC-style and hand-rolled;
//! unplayed fixtures leave their goal and outcome cells empty.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::elo::MatchRatings;
use crate::model::MatchRecord;

/// Header of the match results file.
const MATCH_COLUMNS: [&str; 11] = [
    "home_team",
    "away_team",
    "home_team_goals",
    "away_team_goals",
    "winner",
    "loser",
    "venue",
    "league",
    "year",
    "date",
    "match_id",
];

/// Header of the long-format detailed statistics file.
const STAT_COLUMNS: [&str; 6] = ["match_id", "attendance", "referee", "category", "home", "away"];

/// Rating columns appended to the match header in the per-match Elo file.
const ELO_COLUMNS: [&str; 4] = [
    "home_team_elo_start",
    "away_team_elo_start",
    "home_team_elo_end",
    "away_team_elo_end",
];

/// Write all match records to `path`.
pub fn write_matches_csv(records: &[MatchRecord], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    write_row(&mut out, &MATCH_COLUMNS.map(str::to_string))?;
    for record in records {
        write_row(&mut out, &match_cells(record))?;
    }
    out.flush()?;

    info!("💾 wrote {} matches to {}", records.len(), path.display());
    Ok(())
}

/// Write every match with its start/end Elo ratings alongside, `ratings`
/// aligned by index (`None` for unplayed fixtures, whose rating cells stay
/// empty).
pub fn write_matches_with_elo_csv(
    records: &[MatchRecord],
    ratings: &[Option<MatchRatings>],
    path: impl AsRef<Path>,
) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    let mut header = MATCH_COLUMNS.map(str::to_string).to_vec();
    header.extend(ELO_COLUMNS.map(str::to_string));
    write_row(&mut out, &header)?;

    for (record, rating) in records.iter().zip(ratings) {
        let mut row = match_cells(record).to_vec();
        match rating {
            Some(r) => row.extend([
                format!("{:.2}", r.home_start),
                format!("{:.2}", r.away_start),
                format!("{:.2}", r.home_end),
                format!("{:.2}", r.away_end),
            ]),
            None => row.extend([String::new(), String::new(), String::new(), String::new()]),
        }
        write_row(&mut out, &row)?;
    }
    out.flush()?;

    info!("💾 wrote {} rated matches to {}", records.len(), path.display());
    Ok(())
}

fn match_cells(record: &MatchRecord) -> [String; 11] {
    [
        record.home_team.clone(),
        record.away_team.clone(),
        opt_number(record.home_goals),
        opt_number(record.away_goals),
        record.winner.clone().unwrap_or_default(),
        record.loser.clone().unwrap_or_default(),
        record.venue.clone(),
        record.competition_id.clone(),
        record.season_label.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        record.match_id.clone().unwrap_or_default(),
    ]
}

/// Write the detailed statistics of enriched records to `path`, one row per
/// (match, category).
pub fn write_stats_csv(records: &[MatchRecord], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    write_row(&mut out, &STAT_COLUMNS.map(str::to_string))?;
    let mut rows = 0usize;
    for record in records {
        let (Some(match_id), Some(details)) = (&record.match_id, &record.details) else {
            continue;
        };
        for (category, pair) in &details.categories {
            let row = [
                match_id.clone(),
                details.attendance.clone(),
                details.referee.clone(),
                category.clone(),
                pair.home.clone(),
                pair.away.clone(),
            ];
            write_row(&mut out, &row)?;
            rows += 1;
        }
    }
    out.flush()?;

    info!("💾 wrote {} stat rows to {}", rows, path.display());
    Ok(())
}

/// Write a ranked Elo table (`team,elo_rating`) to `path`.
pub fn write_ratings_csv(ranking: &[(String, f64)], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    write_row(&mut out, &["team".to_string(), "elo_rating".to_string()])?;
    for (team, elo) in ranking {
        write_row(&mut out, &[team.clone(), format!("{:.2}", elo)])?;
    }
    out.flush()?;

    info!("💾 wrote {} ratings to {}", ranking.len(), path.display());
    Ok(())
}

/// Write one CSV row, quoting only fields that need it.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn opt_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
