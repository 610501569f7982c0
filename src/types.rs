use crate::classifier::CategoryId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw search hit as returned from an external API
pub type RawHit = serde_json::Value;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("static regex"));

/// Free-text search string supplied by the caller. Each client encodes it for its own API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form usable inside a file name: runs of anything other than `[A-Za-z0-9_-]` become `_`.
    pub fn sanitized(&self) -> String {
        let replaced = UNSAFE_FILENAME_CHARS.replace_all(self.0.trim(), "_");
        let trimmed = replaced.trim_matches('_');
        if trimmed.is_empty() {
            "query".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulated, unprocessed search hits for one query. Opaque to the workflow.
#[derive(Debug, Clone)]
pub struct RawSearchResult {
    pub query: Query,
    pub hits: Vec<RawHit>,
}

impl RawSearchResult {
    pub fn new(query: Query, hits: Vec<RawHit>) -> Self {
        Self { query, hits }
    }

    pub fn empty(query: Query) -> Self {
        Self::new(query, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Source-independent representation of one place.
///
/// `name` and `address` are required for persistence (see [`crate::validator`]);
/// everything else depends on what the source provides. Absent fields are left out of
/// the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NormalizedRecord {
    /// Present fields as `(column, text)` pairs, in declaration order.
    pub fn columns(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone();
        let num = |v: &Option<f64>| v.map(|n| n.to_string());

        [
            ("source_id", text(&self.source_id)),
            ("name", text(&self.name)),
            ("address", text(&self.address)),
            ("city", text(&self.city)),
            ("phone", text(&self.phone)),
            ("website", text(&self.website)),
            ("image", text(&self.image)),
            ("latitude", num(&self.latitude)),
            ("longitude", num(&self.longitude)),
            ("rating", num(&self.rating)),
            ("price_level", text(&self.price_level)),
            ("category", self.category.map(|c| c.to_string())),
            ("description", text(&self.description)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Core trait that all place data sources must implement.
///
/// Neither stage returns an error: transport and data-shape failures are logged inside the
/// client and degrade to partial or empty results.
#[async_trait::async_trait]
pub trait SourceClient: Send + Sync {
    /// Unique identifier for this source
    fn source_name(&self) -> &'static str;

    /// Collect every search hit for `query`, following pagination where the source has it
    async fn fetch_data(&self, query: &Query) -> RawSearchResult;

    /// Fetch details for each hit and map them into normalized records, in hit order
    async fn parse_data(&self, raw: RawSearchResult) -> Vec<NormalizedRecord>;

    /// Columns this source always produces, in export order. Tabular output starts with
    /// these even when a batch has no value for some of them.
    fn columns(&self) -> &'static [&'static str] {
        &[]
    }
}
