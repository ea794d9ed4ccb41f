//! Error taxonomy for the acquisition pipeline.
//!
//! Every error here is scoped to a single task. The orchestrator converts
//! them into [`TaskFailure`](crate::model::TaskFailure) values at the task
//! boundary; nothing propagates across sibling tasks.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while acquiring data from the results site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// An expected element or attribute is missing. The site's markup no
    /// longer matches our assumptions. Fatal for the current task.
    #[error("structural parse error: {0}")]
    Structure(String),

    /// The pagination settle loop exceeded its poll bound.
    #[error("pagination did not settle within {polls} polls")]
    PaginationTimeout { polls: u32 },

    /// A single fixture's score or date could not be parsed. The enclosing
    /// task keeps going; this only surfaces in logs.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The browser session became unusable (launch, navigation or CDP
    /// failure). The task is retried once with a fresh session.
    #[error("browser session failed: {0}")]
    Session(String),

    /// A bounded element wait expired.
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    ElementWait { selector: String, timeout: Duration },

    /// The whole task (navigation + pagination + extraction) exceeded its
    /// wall-clock budget. The session is discarded.
    #[error("task exceeded its overall budget of {0:?}")]
    Budget(Duration),
}

/// Coarse failure classification used in the end-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Structure,
    Pagination,
    Session,
    Budget,
    Other,
}

impl FailureKind {
    pub fn of(err: &ScrapeError) -> Self {
        match err {
            ScrapeError::Structure(_) => FailureKind::Structure,
            ScrapeError::PaginationTimeout { .. } => FailureKind::Pagination,
            ScrapeError::Session(_) | ScrapeError::ElementWait { .. } => FailureKind::Session,
            ScrapeError::Budget(_) => FailureKind::Budget,
            ScrapeError::MalformedRecord(_) => FailureKind::Other,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Structure => "structure",
            FailureKind::Pagination => "pagination",
            FailureKind::Session => "session",
            FailureKind::Budget => "budget",
            FailureKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ScrapeError>;
