//! Structured extraction from site markup.
//!
//! The site's schema (season dropdown, date-grouped fixture containers,
//! score separator, match-centre tabs) is treated as a fixed external
//! contract. When it is violated the extractors raise
//! [`ScrapeError::Structure`](crate::error::ScrapeError) instead of
//! guessing. Parsing is pure: sessions only appear where a page has to be
//! driven (season discovery, the detail pass).

pub mod detail;
pub mod fixtures;
pub mod seasons;

pub use detail::DetailExtractor;

use scraper::Selector;

use crate::error::{Result, ScrapeError};

/// Compile a CSS selector, surfacing a broken selector constant as a
/// structural error instead of panicking inside a worker.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::Structure(format!("invalid selector `{}`: {}", css, e)))
}
