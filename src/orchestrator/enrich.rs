//! Detail enrichment pass.
//!
//! Runs after the listing acquisition, sequentially, over one reused
//! session. The match centre is slow and rate sensitive, so this pass
//! trades throughput for reliability. The only state carried between
//! matches is whether the current session has seen the consent prompt.

use tracing::{info, warn};

use crate::browser::SessionFactory;
use crate::extract::DetailExtractor;
use crate::model::MatchRecord;
use crate::orchestrator::discard_session;

/// Attach detailed statistics to every record that carries a match id.
///
/// A failed match (wait timeout, wedged page) is skipped and its session
/// discarded; the next match starts on a fresh session with the consent
/// prompt expected again. Returns the number of records enriched.
pub async fn enrich_records<F: SessionFactory>(
    factory: &F,
    extractor: &DetailExtractor,
    records: &mut [MatchRecord],
) -> usize {
    let candidates = records.iter().filter(|r| r.match_id.is_some()).count();
    info!("enrichment pass: {} matches with detail pages", candidates);

    let mut session: Option<F::Session> = None;
    let mut consent_handled = false;
    let mut enriched = 0;

    for record in records.iter_mut() {
        let Some(match_id) = record.match_id.clone() else {
            continue;
        };

        if session.is_none() {
            match factory.create().await {
                Ok(s) => {
                    consent_handled = false;
                    session = Some(s);
                }
                Err(e) => {
                    warn!("enrichment aborted, no session available: {}", e);
                    break;
                }
            }
        }
        let Some(current) = session.as_mut() else {
            break;
        };

        match extractor.extract(current, &match_id, consent_handled).await {
            Ok(stats) => {
                consent_handled = true;
                record.attach_details(stats);
                enriched += 1;
            }
            Err(e) => {
                warn!(
                    "⚠️ match {}: detail extraction failed ({}), discarding session",
                    match_id, e
                );
                if let Some(dead) = session.take() {
                    discard_session(dead);
                }
            }
        }
    }

    if let Some(remaining) = session.take() {
        discard_session(remaining);
    }

    info!("✓ enrichment pass done: {}/{} matches", enriched, candidates);
    enriched
}
