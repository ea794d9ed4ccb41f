use serde::Serialize;

use crate::error::{FailureKind, ScrapeError};
use crate::model::season::Season;

/// One (season, club) acquisition unit. Stateless and re-executable; each
/// task is processed in isolation by a single worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionTask {
    pub season: Season,
    /// Club token from the site, `"-1"` meaning all clubs.
    pub club: String,
}

impl AcquisitionTask {
    pub fn new(season: Season, club: impl Into<String>) -> Self {
        Self {
            season,
            club: club.into(),
        }
    }

    /// Full results-listing URL for this task.
    ///
    /// `base_url` ends at the competition query parameter, e.g.
    /// `https://www.premierleague.com/results?co=`.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}{}&se={}&cl={}",
            base_url, self.season.competition_id, self.season.id, self.club
        )
    }
}

/// A task that did not produce records, kept for the end-of-run report.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: AcquisitionTask,
    pub kind: FailureKind,
    pub message: String,
}

impl TaskFailure {
    pub fn new(task: AcquisitionTask, err: &ScrapeError) -> Self {
        Self {
            task,
            kind: FailureKind::of(err),
            message: err.to_string(),
        }
    }
}
