//! Selector-driven field extraction from catalog and detail pages.
//!
//! Documents are parsed and walked synchronously and everything handed back
//! is owned, so no parsed tree outlives the call that produced it.

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{ShopConfig, SubpageDetails};
use crate::utils::error::{AppError, Result};

/// Field name whose value comes from the element's `src`, resolved to an absolute URL.
pub const IMAGE_FIELD: &str = "image";

/// A shop's selectors, compiled once per run.
#[derive(Debug, Clone)]
pub struct ShopSelectors {
    pub catalog: Selector,
    pub link_to_subpage: Option<Selector>,
    pub mainpage: Vec<(String, Selector)>,
    pub subpage: Vec<(String, Selector)>,
}

/// What a single catalog container yielded before any subpage work.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub fields: IndexMap<String, String>,
    /// Raw `href` of the container's detail link, if it has a non-empty one
    pub subpage_href: Option<String>,
}

impl ShopSelectors {
    pub fn compile(config: &ShopConfig) -> Result<Self> {
        let catalog = parse_selector("selectors.catalog", &config.selectors.catalog)?;
        let link_to_subpage = config
            .selectors
            .linktosubpage
            .as_deref()
            .map(|raw| parse_selector("selectors.linktosubpage", raw))
            .transpose()?;

        Ok(Self {
            catalog,
            link_to_subpage,
            mainpage: compile_fields("mainpage_attributes", &config.mainpage_attributes)?,
            subpage: compile_fields("subpage_attributes", &config.subpage_attributes)?,
        })
    }
}

fn parse_selector(field: &str, raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|e| AppError::Config(format!("invalid selector for {} '{}': {:?}", field, raw, e)))
}

fn compile_fields(section: &str, fields: &IndexMap<String, String>) -> Result<Vec<(String, Selector)>> {
    fields
        .iter()
        .map(|(name, raw)| {
            let selector = parse_selector(&format!("{}.{}", section, name), raw)?;
            Ok((name.clone(), selector))
        })
        .collect()
}

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Descendant text nodes, each trimmed, blanks dropped, concatenated without separator.
pub fn text_content(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Extracts one entry per element matching the catalog selector.
///
/// Zero matches is not an error: a warning naming the shop is logged and an
/// empty list returned.
pub fn extract_catalog(
    html: &str,
    selectors: &ShopSelectors,
    base_url: &Url,
    shop_name: &str,
) -> Vec<CatalogEntry> {
    let document = parse_document(html);
    let containers: Vec<ElementRef> = document.select(&selectors.catalog).collect();

    if containers.is_empty() {
        tracing::warn!("No containers found for {}", shop_name);
        return Vec::new();
    }

    tracing::debug!("{} containers found for {}", containers.len(), shop_name);

    containers
        .into_iter()
        .map(|container| CatalogEntry {
            fields: extract_mainpage_fields(container, &selectors.mainpage, base_url),
            subpage_href: selectors
                .link_to_subpage
                .as_ref()
                .and_then(|selector| container.select(selector).next())
                .and_then(|link| link.value().attr("href"))
                .filter(|href| !href.is_empty())
                .map(str::to_string),
        })
        .collect()
}

/// Unmatched fields are left out of the result entirely.
pub fn extract_mainpage_fields(
    container: ElementRef<'_>,
    fields: &[(String, Selector)],
    base_url: &Url,
) -> IndexMap<String, String> {
    let mut values = IndexMap::new();

    for (name, selector) in fields {
        let Some(element) = container.select(selector).next() else {
            continue;
        };

        let image_src = if name == IMAGE_FIELD {
            element.value().attr("src").filter(|src| !src.is_empty())
        } else {
            None
        };

        let value = match image_src {
            Some(src) => resolve_image(base_url, src),
            None => text_content(element),
        };
        values.insert(name.clone(), value);
    }

    values
}

fn resolve_image(base_url: &Url, src: &str) -> String {
    match base_url.join(src) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!("Keeping unresolvable image src '{}': {}", src, e);
            src.to_string()
        }
    }
}

/// Unmatched or empty fields are kept as `None`; `page_url` is recorded only
/// when at least one field has content.
pub fn extract_subpage(html: &str, fields: &[(String, Selector)], page_url: &Url) -> SubpageDetails {
    let document = parse_document(html);

    let values = fields
        .iter()
        .map(|(name, selector)| {
            let value = document
                .select(selector)
                .next()
                .map(text_content)
                .filter(|text| !text.is_empty());
            (name.clone(), value)
        })
        .collect();

    SubpageDetails::from_fields(values, page_url.as_str())
}
