//! Application top level.
//!
//! Wires the pieces together: discover seasons per competition, fan the
//! (season, club) tasks out through the orchestrator, optionally run the
//! detail enrichment pass, then hand everything to the CSV sink. The run
//! always ends with a partial-success report; a competition or task that
//! fails never aborts the whole run.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::browser::{HeadlessFactory, Session, SessionFactory};
use crate::config::Config;
use crate::elo::{self, EloConfig};
use crate::extract::{seasons, DetailExtractor};
use crate::model::{AcquisitionTask, MatchRecord, TaskFailure};
use crate::orchestrator::{enrich_records, TaskOrchestrator};
use crate::sink;

pub struct App {
    config: Config,
    factory: Arc<HeadlessFactory>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factory: Arc::new(HeadlessFactory),
        }
    }

    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config);

        let tasks = self.build_tasks().await;
        if tasks.is_empty() {
            warn!("⚠️ no acquisition tasks could be built, nothing to do");
            return Ok(());
        }

        let orchestrator = TaskOrchestrator::new(
            Arc::clone(&self.factory),
            self.config.base_url.clone(),
            self.config.pagination(),
            self.config.task_budget(),
        );
        let total = tasks.len();
        let (mut records, failures) = orchestrator.run(tasks, self.config.concurrency).await;

        if self.config.with_details {
            let extractor = DetailExtractor::new(
                self.config.match_base_url.clone(),
                self.config.element_wait(),
            );
            enrich_records(self.factory.as_ref(), &extractor, &mut records).await;
            sink::write_stats_csv(&records, &self.config.stats_output_file)?;
        }

        sink::write_matches_csv(&records, &self.config.output_file)?;

        if self.config.with_elo {
            self.write_elo(&records)?;
        }

        log_final_report(total, &records, &failures);
        Ok(())
    }

    /// Discover seasons for every configured competition and cross them
    /// with the configured clubs. A competition whose season widget is
    /// gone is skipped with an error; its siblings proceed.
    async fn build_tasks(&self) -> Vec<AcquisitionTask> {
        let mut tasks = Vec::new();

        for competition in &self.config.competitions {
            let seasons = match self.discover_seasons(competition).await {
                Ok(seasons) => seasons,
                Err(e) => {
                    error!("❌ competition {}: season discovery failed: {}", competition, e);
                    continue;
                }
            };
            for season in seasons {
                info!("{} {}", season.label, season.id);
                for club in &self.config.clubs {
                    tasks.push(AcquisitionTask::new(season.clone(), club.clone()));
                }
            }
        }

        tasks
    }

    async fn discover_seasons(
        &self,
        competition: &str,
    ) -> crate::error::Result<Vec<crate::model::Season>> {
        let mut session = self.factory.create().await?;
        let result = seasons::discover(
            &mut session,
            &self.config.base_url,
            competition,
            self.config.element_wait(),
        )
        .await;
        Box::new(session).close().await;
        result
    }

    fn write_elo(&self, records: &[MatchRecord]) -> Result<()> {
        let (per_match, table) = elo::calculate(records, EloConfig::default());
        sink::write_matches_with_elo_csv(records, &per_match, &self.config.matches_elo_file)?;
        sink::write_ratings_csv(&table.current_ranking(), &self.config.current_elo_file)?;
        sink::write_ratings_csv(&table.peak_ranking(), &self.config.peak_elo_file)?;
        Ok(())
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 football results acquisition starting");
    info!(
        "📊 competitions: {:?}, clubs: {:?}, workers: {}",
        config.competitions, config.clubs, config.concurrency
    );
    info!("{}", "=".repeat(60));
}

fn log_final_report(total_tasks: usize, records: &[MatchRecord], failures: &[TaskFailure]) {
    info!("{}", "=".repeat(60));
    info!(
        "✅ {} of {} tasks succeeded, {} match records acquired",
        total_tasks - failures.len(),
        total_tasks,
        records.len()
    );
    for failure in failures {
        warn!(
            "❌ season {} club {} [{}]: {}",
            failure.task.season.label, failure.task.club, failure.kind, failure.message
        );
    }
    info!("{}", "=".repeat(60));
}
