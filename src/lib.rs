//! # football_scrape
//!
//! Acquires structured football match records from a paginated,
//! dynamically-loaded results listing, with an optional per-match
//! statistics enrichment pass.
//!
//! Layers, each reaching only downward:
//!
//! - `browser/`: headless Chromium sessions behind the [`browser::Session`]
//!   trait seam.
//! - `extract/` + `pagination`: season discovery, the settle loop, the
//!   listing and match-centre parsers. Parsing is pure.
//! - `model/`: plain owned records handed across layer boundaries.
//! - `orchestrator/` + `app`: bounded worker pool, per-task failure
//!   isolation, the sequential enrichment pass.
//! - `sink` + `elo`: CSV output and the Elo post-processor. Consumers of
//!   the records, not part of acquisition.
//!
//! The remote source silently drops data under aggressive parallelism, so
//! the default pool is small and every blocking wait is bounded.

pub mod app;
pub mod browser;
pub mod config;
pub mod elo;
pub mod error;
pub mod extract;
pub mod logger;
pub mod model;
pub mod orchestrator;
pub mod pagination;
pub mod sink;

pub use app::App;
pub use browser::{Session, SessionFactory};
pub use config::Config;
pub use error::{FailureKind, Result, ScrapeError};
pub use extract::DetailExtractor;
pub use model::{AcquisitionTask, DetailedStats, MatchRecord, Season, TaskFailure};
pub use orchestrator::TaskOrchestrator;
pub use pagination::{PaginationConfig, PaginationLoader};
