//! Bounded-parallel task runner.
//!
//! One task = one (season, club) listing. Each worker owns its session
//! exclusively: create, navigate, settle the pagination, extract, close.
//! Every task-internal error is caught at the task boundary and turned
//! into a [`TaskFailure`]; a failing task never cancels or rolls back its
//! siblings, and the merged output is order-independent and lossless.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::browser::session::Session;
use crate::browser::SessionFactory;
use crate::error::{Result, ScrapeError};
use crate::extract::fixtures::extract_matches;
use crate::model::{AcquisitionTask, MatchRecord, TaskFailure};
use crate::orchestrator::discard_session;
use crate::pagination::{PaginationConfig, PaginationLoader};

/// Fans acquisition tasks out across a fixed-size worker pool.
pub struct TaskOrchestrator<F> {
    factory: Arc<F>,
    base_url: String,
    pagination: PaginationConfig,
    /// Overall budget per task (navigation + pagination + extraction), so
    /// one stuck session cannot hold a worker slot indefinitely.
    task_budget: Duration,
}

impl<F> TaskOrchestrator<F>
where
    F: SessionFactory + 'static,
{
    pub fn new(
        factory: Arc<F>,
        base_url: impl Into<String>,
        pagination: PaginationConfig,
        task_budget: Duration,
    ) -> Self {
        Self {
            factory,
            base_url: base_url.into(),
            pagination,
            task_budget,
        }
    }

    /// Run every task and aggregate. Successful batches are merged (order
    /// between tasks unspecified); failures are collected for the report.
    pub async fn run(
        &self,
        tasks: Vec<AcquisitionTask>,
        concurrency: usize,
    ) -> (Vec<MatchRecord>, Vec<TaskFailure>) {
        let total = tasks.len();
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        info!("dispatching {} tasks across {} workers", total, concurrency.max(1));

        let mut handles = Vec::with_capacity(total);
        for task in tasks {
            let semaphore = Arc::clone(&semaphore);
            let factory = Arc::clone(&self.factory);
            let base_url = self.base_url.clone();
            let pagination = self.pagination;
            let budget = self.task_budget;
            let worker_task = task.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ScrapeError::Session("worker pool closed".to_string()))?;
                run_task(factory.as_ref(), &worker_task, &base_url, pagination, budget).await
            });
            handles.push((task, handle));
        }

        let mut records = Vec::new();
        let mut failures = Vec::new();

        for (task, handle) in handles {
            match handle.await {
                Ok(Ok(batch)) => {
                    info!(
                        "✓ season {} club {}: {} matches",
                        task.season.label,
                        task.club,
                        batch.len()
                    );
                    records.extend(batch);
                }
                Ok(Err(e)) => {
                    error!("❌ season {} club {}: {}", task.season.label, task.club, e);
                    failures.push(TaskFailure::new(task, &e));
                }
                Err(e) => {
                    let err = ScrapeError::Session(format!("worker panicked: {}", e));
                    error!("❌ season {} club {}: {}", task.season.label, task.club, err);
                    failures.push(TaskFailure::new(task, &err));
                }
            }
        }

        info!(
            "📊 {} of {} tasks succeeded, {} records",
            total - failures.len(),
            total,
            records.len()
        );
        (records, failures)
    }
}

/// One task, with a single retry on session failure: a fresh session fixes
/// a crashed or wedged browser, nothing else.
async fn run_task<F: SessionFactory>(
    factory: &F,
    task: &AcquisitionTask,
    base_url: &str,
    pagination: PaginationConfig,
    budget: Duration,
) -> Result<Vec<MatchRecord>> {
    match attempt(factory, task, base_url, pagination, budget).await {
        Err(ScrapeError::Session(msg)) => {
            warn!(
                "season {} club {}: session failed ({}), retrying once with a fresh session",
                task.season.label, task.club, msg
            );
            attempt(factory, task, base_url, pagination, budget).await
        }
        other => other,
    }
}

async fn attempt<F: SessionFactory>(
    factory: &F,
    task: &AcquisitionTask,
    base_url: &str,
    pagination: PaginationConfig,
    budget: Duration,
) -> Result<Vec<MatchRecord>> {
    let mut session = factory.create().await?;
    let loader = PaginationLoader::new(pagination);
    let url = task.url(base_url);

    let work = async {
        session.navigate(&url).await?;
        let html = loader.settle(&mut session).await?;
        extract_matches(&html, &task.season.competition_id, &task.season.label)
    };

    let outcome = match timeout(budget, work).await {
        Ok(result) => result,
        // The stuck session is discarded below either way.
        Err(_) => Err(ScrapeError::Budget(budget)),
    };

    // Teardown must not hold the worker slot: a wedged browser can stall
    // its own close handshake too.
    discard_session(session);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::browser::Session;
    use crate::error::FailureKind;
    use crate::model::Season;

    const LISTING: &str = r#"
        <div class="fixtures__date-container">
          <time class="fixtures__date--long">Saturday 14 May 2022</time>
          <li class="match-fixture" data-home="Liverpool" data-away="Chelsea" data-venue="Anfield">
            <span class="match-fixture__score">2-1</span>
          </li>
          <li class="match-fixture" data-home="Leeds" data-away="Brighton" data-venue="Elland Road">
            <span class="match-fixture__score">1-1</span>
          </li>
        </div>"#;

    const LOADING: &str = r#"<div class="loader"></div>"#;

    /// Listing session: settles immediately unless the URL points at the
    /// "stuck" season, whose loader never clears.
    struct FakeSession {
        url: String,
        fail_navigation: bool,
    }

    #[async_trait]
    impl Session for FakeSession {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            if self.fail_navigation {
                return Err(ScrapeError::Session("browser crashed".to_string()));
            }
            self.url = url.to_string();
            Ok(())
        }

        async fn content(&self) -> Result<String> {
            if self.url.contains("se=stuck") {
                Ok(LOADING.to_string())
            } else {
                Ok(LISTING.to_string())
            }
        }

        async fn trigger_reveal(&mut self) -> Result<()> {
            Ok(())
        }

        async fn wait_for_element(&self, _selector: &str, _timeout: Duration) -> Result<String> {
            self.content().await
        }

        async fn click(&mut self, _selector: &str) -> Result<bool> {
            Ok(false)
        }

        async fn close(self: Box<Self>) {
            // A wedged browser never finishes its close handshake either.
            if self.url.contains("se=stuck") {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Fails the first `failures` sessions at navigation time.
    struct FakeFactory {
        created: AtomicUsize,
        failures: usize,
    }

    impl FakeFactory {
        fn reliable() -> Self {
            Self {
                created: AtomicUsize::new(0),
                failures: 0,
            }
        }

        fn failing_first(failures: usize) -> Self {
            Self {
                created: AtomicUsize::new(0),
                failures,
            }
        }
    }

    #[async_trait]
    impl SessionFactory for FakeFactory {
        type Session = FakeSession;

        async fn create(&self) -> Result<FakeSession> {
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                url: String::new(),
                fail_navigation: n < self.failures,
            })
        }
    }

    fn fast_pagination() -> PaginationConfig {
        PaginationConfig {
            initial_wait: Duration::ZERO,
            settle_quantum: Duration::ZERO,
            max_polls: 4,
        }
    }

    fn orchestrator(factory: FakeFactory) -> TaskOrchestrator<FakeFactory> {
        TaskOrchestrator::new(
            Arc::new(factory),
            "https://example.test/results?co=",
            fast_pagination(),
            Duration::from_secs(5),
        )
    }

    fn tasks(season_ids: &[&str]) -> Vec<AcquisitionTask> {
        season_ids
            .iter()
            .map(|id| AcquisitionTask::new(Season::new(*id, format!("20{id}"), "1"), "-1"))
            .collect()
    }

    #[tokio::test]
    async fn record_count_is_invariant_to_pool_size() {
        let fixed = tasks(&["1", "2", "3", "4", "5", "6"]);

        let (serial, failures) = orchestrator(FakeFactory::reliable())
            .run(fixed.clone(), 1)
            .await;
        assert!(failures.is_empty());

        let (parallel, failures) = orchestrator(FakeFactory::reliable()).run(fixed, 4).await;
        assert!(failures.is_empty());

        // 6 tasks x 2 fixtures each, regardless of worker count.
        assert_eq!(serial.len(), 12);
        assert_eq!(parallel.len(), 12);
    }

    #[tokio::test]
    async fn failing_task_does_not_disturb_siblings() {
        let mixed = tasks(&["1", "stuck", "3"]);
        let (records, failures) = orchestrator(FakeFactory::reliable()).run(mixed, 2).await;

        assert_eq!(records.len(), 4);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Pagination);
        assert_eq!(failures[0].task.season.id, "stuck");
    }

    #[tokio::test]
    async fn session_failure_is_retried_once_with_a_fresh_session() {
        let factory = FakeFactory::failing_first(1);
        let (records, failures) = orchestrator(factory).run(tasks(&["1"]), 1).await;

        assert!(failures.is_empty());
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn second_session_failure_marks_the_task_failed() {
        let factory = FakeFactory::failing_first(2);
        let (records, failures) = orchestrator(factory).run(tasks(&["1"]), 1).await;

        assert!(records.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Session);
    }

    #[tokio::test]
    async fn stalled_session_close_does_not_hold_a_worker_slot() {
        // Single worker: if teardown of the wedged task kept the permit,
        // the second task could never start and the run would hang.
        let mixed = tasks(&["stuck", "2"]);
        let (records, failures) = orchestrator(FakeFactory::reliable()).run(mixed, 1).await;

        assert_eq!(records.len(), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].task.season.id, "stuck");
    }

    #[tokio::test]
    async fn stuck_task_trips_the_overall_budget() {
        let orchestrator = TaskOrchestrator::new(
            Arc::new(FakeFactory::reliable()),
            "https://example.test/results?co=",
            PaginationConfig {
                initial_wait: Duration::from_millis(5),
                settle_quantum: Duration::from_millis(5),
                max_polls: u32::MAX,
            },
            Duration::from_millis(40),
        );
        let (records, failures) = orchestrator.run(tasks(&["stuck"]), 1).await;

        assert!(records.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Budget);
    }
}
