//! Pagination settle loop.
//!
//! Scrolling to the bottom of the listing mounts another slice of fixtures;
//! a transient loader element is the only signal that more is coming. The
//! loop runs trigger, wait, check until the indicator stays gone.
//!
//! In-flight states: `Idle -> Triggering -> AwaitingSettle`, looping back
//! to `Triggering` while the indicator shows. Terminal states are the
//! return value: `Ok(document)` once stable,
//! [`ScrapeError::PaginationTimeout`] past the poll bound.

use std::time::Duration;

use scraper::Html;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::browser::Session;
use crate::error::{Result, ScrapeError};
use crate::extract::selector;

/// Checking for the indicator once right after a trigger is unreliable:
/// it can flicker off before the new content mounts. Absence has to hold
/// across this many consecutive checks before the page counts as stable.
const DEBOUNCE_CHECKS: u32 = 2;

/// Loader visible while more listing content is still being fetched.
const LOADING_INDICATOR: &str = "div.loader";
/// Class that keeps a resolved loader in the DOM but hidden.
const HIDDEN_CLASS: &str = "u-hide";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoaderState {
    Idle,
    Triggering,
    AwaitingSettle,
}

/// Timing knobs for the settle loop.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    /// Wait after the very first reveal; a cold page needs longer.
    pub initial_wait: Duration,
    /// Wait between subsequent polls.
    pub settle_quantum: Duration,
    /// Maximum number of indicator checks before giving up.
    pub max_polls: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_secs(10),
            settle_quantum: Duration::from_secs(4),
            max_polls: 45,
        }
    }
}

/// Drives one session until the listing page is fully materialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationLoader {
    config: PaginationConfig,
}

impl PaginationLoader {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Run the settle loop against an already-navigated session and return
    /// the stable document.
    pub async fn settle<S: Session + ?Sized>(&self, session: &mut S) -> Result<String> {
        let mut state = LoaderState::Idle;
        let mut polls: u32 = 0;
        let mut clear_checks: u32 = 0;

        loop {
            match state {
                LoaderState::Idle | LoaderState::Triggering => {
                    session.trigger_reveal().await?;
                    state = LoaderState::AwaitingSettle;
                }
                LoaderState::AwaitingSettle => {
                    let quantum = if polls == 0 {
                        self.config.initial_wait
                    } else {
                        self.config.settle_quantum
                    };
                    sleep(quantum).await;

                    let html = session.content().await?;
                    polls += 1;

                    if has_loading_indicator(&html)? {
                        trace!("poll {}: loader still visible", polls);
                        clear_checks = 0;
                    } else {
                        clear_checks += 1;
                        trace!("poll {}: no loader ({}/{})", polls, clear_checks, DEBOUNCE_CHECKS);
                        if clear_checks >= DEBOUNCE_CHECKS {
                            debug!("listing settled after {} polls", polls);
                            return Ok(html);
                        }
                    }

                    if polls >= self.config.max_polls {
                        return Err(ScrapeError::PaginationTimeout { polls });
                    }
                    state = LoaderState::Triggering;
                }
            }
        }
    }
}

/// True when a visible loader element is present in the document.
pub fn has_loading_indicator(html: &str) -> Result<bool> {
    let document = Html::parse_document(html);
    let loader = selector(LOADING_INDICATOR)?;
    Ok(document
        .select(&loader)
        .any(|el| !el.value().classes().any(|c| c == HIDDEN_CLASS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    const LOADING: &str = r#"<html><body><div class="loader"></div></body></html>"#;
    const HIDDEN: &str = r#"<html><body><div class="loader u-hide"></div></body></html>"#;
    const SETTLED: &str = r#"<html><body><div class="fixtures"></div></body></html>"#;

    /// Serves a fixed sequence of documents, sticking on the last one.
    struct ScriptedSession {
        documents: Vec<&'static str>,
        served: usize,
        reveals: usize,
    }

    impl ScriptedSession {
        fn new(documents: Vec<&'static str>) -> Self {
            Self {
                documents,
                served: 0,
                reveals: 0,
            }
        }
    }

    #[async_trait]
    impl Session for ScriptedSession {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn content(&self) -> Result<String> {
            let idx = self.served.min(self.documents.len() - 1);
            Ok(self.documents[idx].to_string())
        }

        async fn trigger_reveal(&mut self) -> Result<()> {
            self.reveals += 1;
            // content() is &self; advance on the trigger instead.
            if self.reveals > 1 {
                self.served += 1;
            }
            Ok(())
        }

        async fn wait_for_element(&self, _selector: &str, _timeout: Duration) -> Result<String> {
            self.content().await
        }

        async fn click(&mut self, _selector: &str) -> Result<bool> {
            Ok(false)
        }

        async fn close(self: Box<Self>) {}
    }

    fn fast_loader(max_polls: u32) -> PaginationLoader {
        PaginationLoader::new(PaginationConfig {
            initial_wait: Duration::ZERO,
            settle_quantum: Duration::ZERO,
            max_polls,
        })
    }

    #[test]
    fn visible_loader_is_detected() {
        assert!(has_loading_indicator(LOADING).unwrap());
        assert!(!has_loading_indicator(HIDDEN).unwrap());
        assert!(!has_loading_indicator(SETTLED).unwrap());
    }

    #[test]
    fn settles_when_loader_absent_from_the_start() {
        tokio_test::block_on(async {
            let mut session = ScriptedSession::new(vec![SETTLED]);
            let html = fast_loader(10).settle(&mut session).await.unwrap();
            assert_eq!(html, SETTLED);
        });
    }

    #[test]
    fn settles_after_loader_clears_with_debounce() {
        tokio_test::block_on(async {
            let mut session =
                ScriptedSession::new(vec![LOADING, LOADING, LOADING, SETTLED, SETTLED]);
            let html = fast_loader(20).settle(&mut session).await.unwrap();
            assert_eq!(html, SETTLED);
        });
    }

    #[test]
    fn single_clear_check_is_not_enough() {
        tokio_test::block_on(async {
            // Loader flickers off once, then reappears, then clears for good.
            let docs = vec![LOADING, SETTLED, LOADING, SETTLED, SETTLED];
            let mut session = ScriptedSession::new(docs);
            let html = fast_loader(20).settle(&mut session).await.unwrap();
            assert_eq!(html, SETTLED);
            assert!(session.served >= 4, "must have polled past the flicker");
        });
    }

    #[test]
    fn times_out_when_loader_never_clears() {
        tokio_test::block_on(async {
            let mut session = ScriptedSession::new(vec![LOADING]);
            let err = fast_loader(5).settle(&mut session).await.unwrap_err();
            match err {
                ScrapeError::PaginationTimeout { polls } => assert_eq!(polls, 5),
                other => panic!("expected pagination timeout, got {other}"),
            }
        });
    }
}
