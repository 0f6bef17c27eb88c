use serde_json::Value;

use crate::archive::SearchSource;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::shows::{PageReport, Selector, ShowDatabase};

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub shows: usize,
    pub pages_processed: u32,
    pub last_page: u32,
}

enum Step {
    Exhausted,
    Merged(PageReport),
}

/// The fetch loop: pages through a search source, merging each page into
/// the show database and checkpointing it to disk.
pub struct App<S> {
    config: Config,
    source: S,
    selector: Selector,
}

impl<S: SearchSource> App<S> {
    pub fn new(config: Config, source: S) -> Self {
        let selector = Selector::from_config(&config);
        Self {
            config,
            source,
            selector,
        }
    }

    /// Runs from `db`'s last processed page until the search is exhausted.
    ///
    /// After `max_consecutive_errors` failures on one page the loop stops,
    /// writes a final checkpoint pointing at that page and returns
    /// `AppError::RetriesExhausted`.
    pub async fn run(&self, db: ShowDatabase) -> Result<RunSummary> {
        let mut page = db.last_processed_page();
        let mut db = db;
        let mut pages_processed = 0;
        let mut error_count = 0;
        let mut delay = self.config.base_delay;

        tracing::info!("Starting fetch at page {}", page);

        loop {
            tracing::info!("Fetching page {}...", page);
            let (next, step) = self.process_page(db, page).await;
            db = next;

            match step {
                Ok(Step::Exhausted) => {
                    tracing::info!("No more documents found, ending search");
                    break;
                }
                Ok(Step::Merged(report)) => {
                    tracing::info!(
                        "Added {} new shows on page {} ({} of {} documents usable, {} skipped)",
                        report.added(),
                        page,
                        report.candidates,
                        report.documents,
                        report.skipped
                    );
                    tracing::info!("Total unique shows so far: {}", db.len());

                    pages_processed += 1;
                    error_count = 0;
                    delay = self.config.base_delay;
                    page += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(AppError::Overloaded) => {
                    tracing::warn!(
                        "Search API overloaded on page {}, cooling down for {:?}",
                        page,
                        self.config.overload_cooldown
                    );
                    tokio::time::sleep(self.config.overload_cooldown).await;
                }
                Err(e) => {
                    error_count += 1;
                    tracing::error!("Error on page {}: {}", page, e);

                    if error_count >= self.config.max_consecutive_errors {
                        tracing::error!(
                            "Hit maximum retry attempts. Saving progress at page {}...",
                            page
                        );
                        db.with_last_processed_page(page).save(&self.config.db_path)?;
                        return Err(AppError::RetriesExhausted {
                            page,
                            attempts: error_count,
                        });
                    }

                    delay = self.config.next_backoff(delay);
                    tracing::warn!("Backing off for {:?} before retry...", delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let db = db.with_last_processed_page(page);
        db.save(&self.config.db_path)?;

        Ok(RunSummary {
            shows: db.len(),
            pages_processed,
            last_page: page,
        })
    }

    /// Fetches one page, merges it and checkpoints. The database comes back
    /// even when the step fails so the loop can keep going with it.
    async fn process_page(&self, db: ShowDatabase, page: u32) -> (ShowDatabase, Result<Step>) {
        let docs: Vec<Value> = match self.source.fetch_page(page).await {
            Ok(docs) => docs,
            Err(e) => return (db, Err(e)),
        };

        if docs.is_empty() {
            return (db, Ok(Step::Exhausted));
        }

        tracing::info!("Found {} documents on page {}", docs.len(), page);
        let (db, report) = db.merge_page(page, docs, &self.selector);

        match db.save(&self.config.db_path) {
            Ok(()) => (db, Ok(Step::Merged(report))),
            Err(e) => (db, Err(e)),
        }
    }
}
