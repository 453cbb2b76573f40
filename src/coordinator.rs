use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;

use crate::aggregator::CatalogAggregator;
use crate::models::{RunSummary, ShopCatalog};
use crate::storage::ResultStore;
use crate::utils::error::Result;

/// Source of "today" for the once-per-day guard.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct RunCoordinator {
    aggregator: CatalogAggregator,
    store: ResultStore,
    clock: Arc<dyn Clock>,
}

impl RunCoordinator {
    pub fn new(aggregator: CatalogAggregator, store: ResultStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            store,
            clock,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Aggregates every shop into today's result file, at most once per day.
    ///
    /// An existing file for today turns the run into a no-op. Any shop-level
    /// or persistence failure aborts the whole run and nothing is written.
    pub async fn run(&self, shops: &ShopCatalog) -> RunSummary {
        let today = self.clock.today();
        let path = self.store.path_for(today);

        if self.store.exists(today) {
            tracing::info!("Results for {} already exist at {}", today, path.display());
            return RunSummary::Skipped { path };
        }

        match self.aggregate(shops, today).await {
            Ok((items, path)) => {
                tracing::info!("Saved {} items to {}", items, path.display());
                RunSummary::Completed { items, path }
            }
            Err(e) => {
                tracing::error!("Aggregation aborted: {}", e);
                RunSummary::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn aggregate(&self, shops: &ShopCatalog, today: NaiveDate) -> Result<(usize, PathBuf)> {
        let mut all_records = Vec::new();

        for (key, shop) in shops.iter() {
            tracing::info!("Processing {}...", key);
            let records = self.aggregator.process_shop(shop).await?;
            tracing::info!("{} items kept for {}", records.len(), key);
            all_records.extend(records);
        }

        let path = self.store.save(today, &all_records)?;
        Ok((all_records.len(), path))
    }
}
