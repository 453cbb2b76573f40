use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;
use validator::Validate;

use crate::extractor::ShopSelectors;
use crate::models::product::RESERVED_RECORD_FIELDS;
use crate::utils::error::{AppError, Result};

/// Scraping rules for one shop.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ShopConfig {
    #[validate(length(min = 1, message = "shop_name must not be empty"))]
    pub shop_name: String,

    #[validate(url(message = "base_url must be an absolute URL"))]
    pub base_url: String,

    pub selectors: SelectorConfig,

    /// Output field name -> selector, evaluated within each catalog container
    #[serde(default)]
    pub mainpage_attributes: IndexMap<String, String>,

    /// Output field name -> selector, evaluated on the item's detail page
    #[serde(default)]
    pub subpage_attributes: IndexMap<String, String>,

    /// Case-insensitive substrings that disqualify an item by name
    #[serde(default)]
    pub excluded_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorConfig {
    pub catalog: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linktosubpage: Option<String>,
}

impl ShopConfig {
    pub fn parsed_base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Returns the first excluded keyword contained in `name`, ignoring case.
    pub fn excluded_keyword_in(&self, name: &str) -> Option<&str> {
        let name = name.to_uppercase();
        self.excluded_keywords
            .iter()
            .map(|kw| kw.as_str())
            .find(|kw| name.contains(&kw.to_uppercase()))
    }

    /// Everything about a shop that can be rejected before fetching.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if let Some(field) = self
            .mainpage_attributes
            .keys()
            .find(|field| RESERVED_RECORD_FIELDS.contains(&field.as_str()))
        {
            return Err(AppError::Config(format!(
                "mainpage_attributes.{} collides with a reserved result field",
                field
            )));
        }

        // A blank keyword would be contained in every name
        if let Some(index) = self
            .excluded_keywords
            .iter()
            .position(|kw| kw.trim().is_empty())
        {
            return Err(AppError::Config(format!(
                "excluded_keywords[{}] must not be blank",
                index
            )));
        }

        ShopSelectors::compile(self)?;
        Ok(())
    }
}

/// Every configured shop, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopCatalog {
    shops: IndexMap<String, ShopConfig>,
}

impl ShopCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), strip_prefix(e))))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let shops: IndexMap<String, ShopConfig> = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("invalid shop configuration: {}", e)))?;

        for (key, shop) in &shops {
            shop.check()
                .map_err(|e| AppError::Config(format!("shop '{}': {}", key, strip_prefix(e))))?;
        }

        Ok(Self { shops })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShopConfig)> {
        self.shops.iter().map(|(key, shop)| (key.as_str(), shop))
    }

    pub fn get(&self, key: &str) -> Option<&ShopConfig> {
        self.shops.get(key)
    }

    pub fn len(&self) -> usize {
        self.shops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }
}

impl FromIterator<(String, ShopConfig)> for ShopCatalog {
    fn from_iter<I: IntoIterator<Item = (String, ShopConfig)>>(iter: I) -> Self {
        Self {
            shops: iter.into_iter().collect(),
        }
    }
}

// Avoids "Configuration error: Configuration error: ..." when re-wrapping
fn strip_prefix(err: AppError) -> String {
    match err {
        AppError::Config(message) => message,
        other => other.to_string(),
    }
}
