use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::extractor::{self, CatalogEntry, ShopSelectors};
use crate::fetcher::PageFetcher;
use crate::models::{Details, ProductRecord, ShopConfig, SubpageDetails};
use crate::url_normalizer;
use crate::utils::error::{AppError, Result};

/// Why a catalog container did not become a record.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("missing name")]
    MissingName,

    #[error("name contains excluded keyword '{0}'")]
    ExcludedKeyword(String),

    #[error(transparent)]
    Failed(#[from] AppError),
}

/// Turns one shop's catalog page into its retained product records.
pub struct CatalogAggregator {
    fetcher: Arc<dyn PageFetcher>,
}

impl CatalogAggregator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fails only when the catalog page itself cannot be fetched (or the shop's
    /// rules cannot be compiled). Problems with single items or their detail
    /// pages are logged and absorbed.
    pub async fn process_shop(&self, shop: &ShopConfig) -> Result<Vec<ProductRecord>> {
        let selectors = ShopSelectors::compile(shop)?;
        let base_url = shop.parsed_base_url()?;

        let html = self.fetcher.fetch(&shop.base_url).await?;
        let entries = extractor::extract_catalog(&html, &selectors, &base_url, &shop.shop_name);

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.build_record(shop, &selectors, &base_url, entry).await {
                Ok(record) => records.push(record),
                Err(SkipReason::Failed(e)) => {
                    tracing::warn!("Skipping item from {}: {}", shop.shop_name, e);
                }
                Err(reason) => {
                    tracing::debug!("Skipping item from {}: {}", shop.shop_name, reason);
                }
            }
        }

        Ok(records)
    }

    async fn build_record(
        &self,
        shop: &ShopConfig,
        selectors: &ShopSelectors,
        base_url: &Url,
        entry: CatalogEntry,
    ) -> std::result::Result<ProductRecord, SkipReason> {
        let mut record = ProductRecord::new(shop.shop_name.clone(), entry.fields);

        if let Some(href) = entry.subpage_href {
            let subpage_url = url_normalizer::normalize(base_url, &href)?;
            let details = match self.load_details(&subpage_url, selectors).await {
                Ok(details) => Details::Loaded(details),
                Err(e) => {
                    tracing::warn!("Subpage error ({}): {}", subpage_url, e);
                    Details::failed()
                }
            };
            record = record.with_details(details);
        }

        let name = record.effective_name().ok_or(SkipReason::MissingName)?;
        if let Some(keyword) = shop.excluded_keyword_in(name) {
            return Err(SkipReason::ExcludedKeyword(keyword.to_string()));
        }

        Ok(record)
    }

    async fn load_details(&self, url: &Url, selectors: &ShopSelectors) -> Result<SubpageDetails> {
        let html = self.fetcher.fetch(url.as_str()).await?;
        Ok(extractor::extract_subpage(&html, &selectors.subpage, url))
    }
}
