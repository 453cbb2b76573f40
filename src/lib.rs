//! FishySearch collects product listings from configured shop catalog pages
//! and writes them, once per day, into a single dated JSON file.
//!
//! Each shop is described by CSS selectors in a JSON document. A run fetches
//! the catalog page of every shop, follows optional detail links, drops items
//! without a name or with an excluded keyword, and saves the merged list.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod storage;
pub mod url_normalizer;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
