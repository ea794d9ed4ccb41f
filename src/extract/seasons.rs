//! Season discovery.
//!
//! Reads the competition's season dropdown once per run. The widget is
//! rendered client-side, so discovery navigates, waits (bounded) for the
//! dropdown and parses the options in source order. A missing widget means
//! the site changed shape: fatal for this competition, harmless for
//! siblings.

use std::time::Duration;

use scraper::Html;
use tracing::{debug, info};

use crate::browser::Session;
use crate::error::{Result, ScrapeError};
use crate::extract::selector;
use crate::model::Season;

/// Active season dropdown on the results page.
const SEASON_DROPDOWN: &str = r#"div[data-dropdown-block="compSeasons"].dropDown.active"#;
/// One season option inside the dropdown; the URL token lives in
/// `data-option-id`, the label ("2021/2022") in the text.
const SEASON_OPTION: &str = "li[data-option-id]";

/// Discover all seasons of a competition, in the order the site lists them.
///
/// Single navigation, single bounded wait; a wait timeout is reported as a
/// structural error, not retried.
pub async fn discover<S: Session + ?Sized>(
    session: &mut S,
    base_url: &str,
    competition_id: &str,
    wait: Duration,
) -> Result<Vec<Season>> {
    let url = format!("{}{}", base_url, competition_id);
    debug!("discovering seasons at {}", url);
    session.navigate(&url).await?;

    let html = session
        .wait_for_element(SEASON_DROPDOWN, wait)
        .await
        .map_err(|e| match e {
            ScrapeError::ElementWait { .. } => ScrapeError::Structure(format!(
                "season dropdown never appeared for competition {}",
                competition_id
            )),
            other => other,
        })?;

    let seasons = parse_seasons(&html, competition_id)?;
    info!(
        "✓ competition {}: {} seasons discovered",
        competition_id,
        seasons.len()
    );
    Ok(seasons)
}

/// Parse the season dropdown out of a materialized document.
pub fn parse_seasons(html: &str, competition_id: &str) -> Result<Vec<Season>> {
    let document = Html::parse_document(html);
    let dropdown = selector(SEASON_DROPDOWN)?;
    let option = selector(SEASON_OPTION)?;

    let widget = document.select(&dropdown).next().ok_or_else(|| {
        ScrapeError::Structure(format!(
            "season dropdown missing for competition {}",
            competition_id
        ))
    })?;

    let mut seasons = Vec::new();
    for entry in widget.select(&option) {
        let id = entry.value().attr("data-option-id").ok_or_else(|| {
            ScrapeError::Structure("season option without data-option-id".to_string())
        })?;
        let label = entry.text().collect::<String>().trim().to_string();
        seasons.push(Season::new(id, label, competition_id));
    }

    if seasons.is_empty() {
        return Err(ScrapeError::Structure(format!(
            "season dropdown empty for competition {}",
            competition_id
        )));
    }
    Ok(seasons)
}
