//! Match-list extraction.
//!
//! Pure parse over an already-settled listing document: date-grouped
//! blocks in document order, each holding the day's fixtures. Anything
//! malformed inside a single fixture degrades that record (unplayed) or
//! skips it with a warning; it never aborts the task.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use tracing::warn;

use crate::error::{Result, ScrapeError};
use crate::extract::selector;
use crate::model::MatchRecord;

/// One day's worth of fixtures.
const DATE_CONTAINER: &str = "div.fixtures__date-container";
/// Long-form date heading inside a container, e.g. "Saturday 14 May 2022".
const DATE_LABEL: &str = "time.fixtures__date--long";
/// A single fixture row.
const FIXTURE: &str = "li.match-fixture";
/// Final score text, e.g. "2-1".
const SCORE: &str = "span.match-fixture__score";

/// Date format used by the listing headings.
const DATE_FORMAT: &str = "%A %d %B %Y";

/// Extract every fixture from a materialized listing document.
///
/// An empty result is legitimate (a club filter can leave a season with no
/// listed matches); only selector breakage is an error.
pub fn extract_matches(
    html: &str,
    competition_id: &str,
    season_label: &str,
) -> Result<Vec<MatchRecord>> {
    let document = Html::parse_document(html);
    let date_container = selector(DATE_CONTAINER)?;
    let date_label = selector(DATE_LABEL)?;
    let fixture = selector(FIXTURE)?;
    let score = selector(SCORE)?;

    let mut records = Vec::new();

    for day in document.select(&date_container) {
        let Some(date_text) = day
            .select(&date_label)
            .next()
            .map(|el| el.text().collect::<String>())
        else {
            warn!("fixture block without a date heading, skipping block");
            continue;
        };

        let date = match NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                let anomaly = ScrapeError::MalformedRecord(format!(
                    "fixture date `{}`: {}",
                    date_text.trim(),
                    e
                ));
                warn!("{}, skipping block", anomaly);
                continue;
            }
        };

        for entry in day.select(&fixture) {
            let Some((home, away, venue)) = fixture_teams(entry) else {
                warn!("fixture on {} without team attributes, skipped", date);
                continue;
            };

            // No score span at all (upcoming kickoff) parses the same as a
            // non-numeric score: the record is emitted as unplayed.
            let score_text = entry
                .select(&score)
                .next()
                .map(|el| el.text().collect::<String>())
                .unwrap_or_default();

            let match_id = entry
                .value()
                .attr("data-comp-match-item")
                .map(str::to_string);

            records.push(MatchRecord::from_listing(
                home,
                away,
                venue,
                &score_text,
                competition_id.to_string(),
                season_label.to_string(),
                date,
                match_id,
            ));
        }
    }

    Ok(records)
}

/// Team names and venue come from data attributes on the fixture row.
fn fixture_teams(entry: ElementRef<'_>) -> Option<(String, String, String)> {
    let value = entry.value();
    let home = value.attr("data-home")?.to_string();
    let away = value.attr("data-away")?.to_string();
    let venue = value.attr("data-venue").unwrap_or_default().to_string();
    Some((home, away, venue))
}
