//! Live smoke tests against the real site.
//!
//! Ignored by default; they need a local Chromium and network access:
//! `cargo test -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use football_scrape::browser::{HeadlessFactory, Session, SessionFactory};
use football_scrape::extract::{seasons, DetailExtractor};
use football_scrape::model::AcquisitionTask;
use football_scrape::{logger, Config, TaskOrchestrator};

#[tokio::test]
#[ignore]
async fn discovers_premier_league_seasons() {
    logger::init();
    let config = Config::from_env();

    let factory = HeadlessFactory;
    let mut session = factory.create().await.expect("browser launch");

    let seasons = seasons::discover(&mut session, &config.base_url, "1", config.element_wait())
        .await
        .expect("season discovery");
    Box::new(session).close().await;

    assert!(!seasons.is_empty());
    // Labels look like "2021/2022".
    assert!(seasons[0].label.contains('/'));
}

#[tokio::test]
#[ignore]
async fn acquires_one_season_of_matches() {
    logger::init();
    let config = Config::from_env();

    let factory = Arc::new(HeadlessFactory);
    let mut session = factory.create().await.expect("browser launch");
    let seasons = seasons::discover(&mut session, &config.base_url, "1", config.element_wait())
        .await
        .expect("season discovery");
    Box::new(session).close().await;

    let newest = seasons.into_iter().next().expect("at least one season");
    let tasks = vec![AcquisitionTask::new(newest, "-1")];

    let orchestrator = TaskOrchestrator::new(
        factory,
        config.base_url.clone(),
        config.pagination(),
        config.task_budget(),
    );
    let (records, failures) = orchestrator.run(tasks, 1).await;

    assert!(failures.is_empty(), "failures: {:?}", failures);
    // A completed Premier League season lists 380 fixtures.
    assert!(records.len() > 300, "only {} records", records.len());
    assert!(records.iter().all(|r| !r.home_team.is_empty()));
}

#[tokio::test]
#[ignore]
async fn extracts_detail_stats_for_one_match() {
    logger::init();
    let config = Config::from_env();

    let factory = HeadlessFactory;
    let mut session = factory.create().await.expect("browser launch");

    let extractor = DetailExtractor::new(
        config.match_base_url.clone(),
        Duration::from_secs(config.element_wait_secs),
    );
    // Any recent finished match id works here; override via MATCH_ID.
    let match_id = std::env::var("MATCH_ID").unwrap_or_else(|_| "93321".to_string());

    let stats = extractor
        .extract(&mut session, &match_id, false)
        .await
        .expect("detail extraction");
    Box::new(session).close().await;

    assert!(!stats.categories.is_empty());
}
