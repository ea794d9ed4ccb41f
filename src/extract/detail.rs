//! Match detail statistics.
//!
//! The detail page is heavier than the listing (tab controls, a consent
//! gate on first visit, stats mounted only after tab activation), which is
//! why this extractor lives in a separate, deliberately slower enrichment
//! pass and never runs inside the high-throughput listing workers.

use std::time::Duration;

use scraper::Html;
use tracing::{debug, warn};

use crate::browser::Session;
use crate::error::Result;
use crate::extract::selector;
use crate::model::stats::{normalize_category, DetailedStats, StatPair};

/// Tab controls of the match centre; their presence means the page shell
/// has rendered.
const TAB_CONTROLS: &str = "div.mcTabs";
/// One-time consent prompt. Absence is the normal case after the first
/// match of a session.
const CONSENT_ACCEPT: &str = "#onetrust-accept-btn-handler";
/// Tab that swaps the statistics panel in.
const STATS_TAB: &str = r#"div.mcTabs li[data-tab-index="2"]"#;
/// Marker that the statistics panel has mounted.
const STATS_READY: &str = "div.matchCentreStatsContainer";
/// Summary entries above the stats table (kickoff, venue, attendance,
/// referee — in that order).
const SUMMARY_ENTRY: &str = "div.mc-summary__info";
/// One statistics row: home value, category label, away value.
const STAT_ROW: &str = "div.matchCentreStatsContainer tbody tr";

/// Attendance sits at this position in the summary block, the referee one
/// after. The site offers no stable labels to match on, so position it is.
const ATTENDANCE_INDEX: usize = 2;
const SUMMARY_LEN: usize = 4;

/// Navigates to match detail pages and extracts in-depth statistics.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    match_base_url: String,
    element_wait: Duration,
}

impl DetailExtractor {
    pub fn new(match_base_url: impl Into<String>, element_wait: Duration) -> Self {
        Self {
            match_base_url: match_base_url.into(),
            element_wait,
        }
    }

    /// Fetch detailed statistics for one match.
    ///
    /// `consent_handled` is the only state carried across matches within a
    /// session: the consent prompt shows once per browser, and clicking a
    /// prompt that is not there is a harmless no-op anyway.
    ///
    /// A bounded-wait timeout aborts this match only; the caller is
    /// expected to discard the session afterwards (a half-rendered match
    /// centre leaves it in an inconsistent visual state).
    pub async fn extract<S: Session + ?Sized>(
        &self,
        session: &mut S,
        match_id: &str,
        consent_handled: bool,
    ) -> Result<DetailedStats> {
        let url = format!("{}/{}", self.match_base_url, match_id);
        debug!("loading match centre {}", url);
        session.navigate(&url).await?;
        session.wait_for_element(TAB_CONTROLS, self.element_wait).await?;

        if !consent_handled {
            let dismissed = session.click(CONSENT_ACCEPT).await?;
            if dismissed {
                debug!("consent prompt dismissed");
            }
        }

        if !session.click(STATS_TAB).await? {
            return Err(crate::error::ScrapeError::Structure(format!(
                "stats tab missing on match {}",
                match_id
            )));
        }
        let html = session.wait_for_element(STATS_READY, self.element_wait).await?;

        parse_detail(&html)
    }
}

/// Parse the statistics panel out of a materialized detail document.
pub fn parse_detail(html: &str) -> Result<DetailedStats> {
    let document = Html::parse_document(html);
    let summary_entry = selector(SUMMARY_ENTRY)?;
    let stat_row = selector(STAT_ROW)?;

    let summary: Vec<String> = document
        .select(&summary_entry)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    // Short summary block: default both fields rather than failing the match.
    let (attendance, referee) = if summary.len() < SUMMARY_LEN {
        ("N/A".to_string(), "N/A".to_string())
    } else {
        (
            strip_label(&summary[ATTENDANCE_INDEX], "Att:"),
            strip_label(&summary[ATTENDANCE_INDEX + 1], "Referee:"),
        )
    };

    let mut stats = DetailedStats {
        attendance,
        referee,
        ..DetailedStats::default()
    };

    for row in document.select(&stat_row) {
        let cells: Vec<String> = row
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if cells.len() != 3 {
            warn!("stat row with {} cells instead of 3, skipped", cells.len());
            continue;
        }
        stats.categories.insert(
            normalize_category(&cells[1]),
            StatPair {
                home: cells[0].clone(),
                away: cells[2].clone(),
            },
        );
    }

    Ok(stats)
}

fn strip_label(text: &str, label: &str) -> String {
    text.trim()
        .strip_prefix(label)
        .unwrap_or(text)
        .trim()
        .to_string()
}
