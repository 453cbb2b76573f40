use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker stored in `details` when an item's detail page could not be used.
pub const SUBPAGE_FAILURE_MESSAGE: &str = "Subpage failed to load";

/// Keys a record always writes itself, unavailable to catalog fields.
pub const RESERVED_RECORD_FIELDS: [&str; 2] = ["shop", "details"];

/// One retained catalog item as written to the daily result file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub shop: String,

    /// Values extracted from the catalog container, keyed by configured field name
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Details {
    Failed(SubpageFailure),
    Loaded(SubpageDetails),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubpageFailure {
    pub error: String,
}

/// Fields read from a detail page. Unmatched fields are kept as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SubpageDetails {
    fields: IndexMap<String, Option<String>>,
}

impl ProductRecord {
    pub fn new(shop: impl Into<String>, fields: IndexMap<String, String>) -> Self {
        Self {
            shop: shop.into(),
            fields,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Top-level `name` when non-empty, else `details.name`; `None` if that is blank.
    pub fn effective_name(&self) -> Option<&str> {
        self.field("name")
            .filter(|name| !name.is_empty())
            .or_else(|| match &self.details {
                Some(Details::Loaded(details)) => details.get("name"),
                _ => None,
            })
            .filter(|name| !name.trim().is_empty())
    }

    pub fn subpage_failed(&self) -> bool {
        matches!(self.details, Some(Details::Failed(_)))
    }
}

impl Details {
    pub fn failed() -> Self {
        Details::Failed(SubpageFailure {
            error: SUBPAGE_FAILURE_MESSAGE.to_string(),
        })
    }
}

impl SubpageDetails {
    /// Builds details from extracted values; `url` is recorded only if at
    /// least one value is present.
    pub fn from_fields(mut fields: IndexMap<String, Option<String>>, url: &str) -> Self {
        if fields.values().any(Option::is_some) {
            fields.insert("url".to_string(), Some(url.to_string()));
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
