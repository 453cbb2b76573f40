use chrono::NaiveDate;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::aggregator::CatalogAggregator;
use crate::config::AppConfig;
use crate::coordinator::{Clock, RunCoordinator, SystemClock};
use crate::fetcher::HttpFetcher;
use crate::models::{ProductRecord, RunSummary, ShopCatalog};
use crate::storage::ResultStore;
use crate::utils::error::Result;

/// Loads the shops and runs one aggregation. A configuration error is
/// returned before anything is fetched; everything later ends up in the summary.
pub async fn run_aggregation(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<RunSummary> {
    let shops = ShopCatalog::load(&config.paths.config_path)?;
    tracing::info!(
        "Loaded {} shops from {}",
        shops.len(),
        config.paths.config_path.display()
    );

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let coordinator = RunCoordinator::new(
        CatalogAggregator::new(fetcher),
        ResultStore::new(&config.paths.results_dir),
        clock,
    );

    Ok(coordinator.run(&shops).await)
}

pub fn check_config(config: &AppConfig) -> Result<()> {
    let shops = ShopCatalog::load(&config.paths.config_path)?;

    if shops.is_empty() {
        println!("No shops configured in {}", config.paths.config_path.display());
        return Ok(());
    }

    println!("{} shops configured:", shops.len());
    for (key, shop) in shops.iter() {
        println!(
            "  {} ({}) {} | {} catalog fields, {} detail fields, {} excluded keywords",
            key,
            shop.shop_name,
            shop.base_url,
            shop.mainpage_attributes.len(),
            shop.subpage_attributes.len(),
            shop.excluded_keywords.len(),
        );
    }

    Ok(())
}

pub fn show_summary(config: &AppConfig, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| SystemClock.today());
    let store = ResultStore::new(&config.paths.results_dir);
    let records = store.load(date)?;

    println!("{}: {} items", store.path_for(date).display(), records.len());
    for (shop, stats) in tally_by_shop(&records) {
        println!(
            "  {}: {} items, {} failed detail pages",
            shop, stats.items, stats.failed_subpages
        );
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShopTally {
    pub items: usize,
    pub failed_subpages: usize,
}

/// Per-shop counts in order of first appearance.
pub fn tally_by_shop(records: &[ProductRecord]) -> IndexMap<&str, ShopTally> {
    let mut tally: IndexMap<&str, ShopTally> = IndexMap::new();
    for record in records {
        let entry = tally.entry(record.shop.as_str()).or_default();
        entry.items += 1;
        if record.subpage_failed() {
            entry.failed_subpages += 1;
        }
    }
    tally
}
