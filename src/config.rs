use std::time::Duration;

use crate::pagination::PaginationConfig;

/// Runtime configuration, environment-backed with conservative defaults.
#[derive(Clone, Debug)]
pub struct Config {
    /// Results listing base URL, ending at the competition parameter.
    pub base_url: String,
    /// Match detail page base URL.
    pub match_base_url: String,
    /// Competition tokens to scrape ("1" = Premier League).
    pub competitions: Vec<String>,
    /// Club tokens; "-1" means all clubs.
    pub clubs: Vec<String>,
    /// Worker pool size. The source silently drops data under load, so
    /// keep this small; raising it is an operator decision.
    pub concurrency: usize,
    /// Wait after the first pagination reveal.
    pub initial_wait_secs: u64,
    /// Wait between pagination polls.
    pub settle_quantum_secs: u64,
    /// Pagination poll bound.
    pub max_pagination_polls: u32,
    /// Bound for element waits (season dropdown, match centre markers).
    pub element_wait_secs: u64,
    /// Overall per-task budget (navigation + pagination + extraction).
    pub task_budget_secs: u64,
    /// Run the slow detail enrichment pass after the listing acquisition.
    pub with_details: bool,
    /// Compute Elo ratings over the acquired matches.
    pub with_elo: bool,
    pub output_file: String,
    pub stats_output_file: String,
    pub matches_elo_file: String,
    pub current_elo_file: String,
    pub peak_elo_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.premierleague.com/results?co=".to_string(),
            match_base_url: "https://www.premierleague.com/match".to_string(),
            competitions: vec!["1".to_string()],
            clubs: vec!["-1".to_string()],
            concurrency: 2,
            initial_wait_secs: 10,
            settle_quantum_secs: 4,
            max_pagination_polls: 45,
            element_wait_secs: 10,
            task_budget_secs: 420,
            with_details: false,
            with_elo: false,
            output_file: "football_matches.csv".to_string(),
            stats_output_file: "match_stats.csv".to_string(),
            matches_elo_file: "all_matches_with_elo.csv".to_string(),
            current_elo_file: "teams_current_elo.csv".to_string(),
            peak_elo_file: "teams_peak_elo.csv".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("RESULTS_BASE_URL").unwrap_or(default.base_url),
            match_base_url: std::env::var("MATCH_BASE_URL").unwrap_or(default.match_base_url),
            competitions: env_list("COMPETITIONS").unwrap_or(default.competitions),
            clubs: env_list("CLUBS").unwrap_or(default.clubs),
            concurrency: env_parse("CONCURRENCY").unwrap_or(default.concurrency),
            initial_wait_secs: env_parse("INITIAL_WAIT_SECS").unwrap_or(default.initial_wait_secs),
            settle_quantum_secs: env_parse("SETTLE_QUANTUM_SECS").unwrap_or(default.settle_quantum_secs),
            max_pagination_polls: env_parse("MAX_PAGINATION_POLLS").unwrap_or(default.max_pagination_polls),
            element_wait_secs: env_parse("ELEMENT_WAIT_SECS").unwrap_or(default.element_wait_secs),
            task_budget_secs: env_parse("TASK_BUDGET_SECS").unwrap_or(default.task_budget_secs),
            with_details: env_parse("WITH_DETAILS").unwrap_or(default.with_details),
            with_elo: env_parse("WITH_ELO").unwrap_or(default.with_elo),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            stats_output_file: std::env::var("STATS_OUTPUT_FILE").unwrap_or(default.stats_output_file),
            matches_elo_file: std::env::var("MATCHES_ELO_FILE").unwrap_or(default.matches_elo_file),
            current_elo_file: std::env::var("CURRENT_ELO_FILE").unwrap_or(default.current_elo_file),
            peak_elo_file: std::env::var("PEAK_ELO_FILE").unwrap_or(default.peak_elo_file),
        }
    }

    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            initial_wait: Duration::from_secs(self.initial_wait_secs),
            settle_quantum: Duration::from_secs(self.settle_quantum_secs),
            max_polls: self.max_pagination_polls,
        }
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn task_budget(&self) -> Duration {
        Duration::from_secs(self.task_budget_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_list(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
