use crate::apis::google_places::PlacesApi;
use crate::apis::{f64_at, str_at};
use crate::classifier::{classify, CategoryId};
use crate::constants::GOOGLE_PLACES_CSV_SOURCE;
use crate::output::{OutputFormat, OutputWriter};
use crate::types::{NormalizedRecord, Query, RawSearchResult, SourceClient};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, error, info};

const LOCALITY: &str = "locality";
const ADMIN_AREA_LEVEL_3: &str = "administrative_area_level_3";

/// Column layout expected by the content backend's import.
pub const IMPORT_COLUMNS: &[&str] = &[
    "name",
    "address",
    "city",
    "latitude",
    "longitude",
    "description",
    "category",
];

/// Category-aware place search scraper.
///
/// Besides returning its records it exports every parsed record, valid or not, to
/// `<query>_import_<timestamp>.csv` in its own export directory, for bulk import into
/// the content backend.
pub struct GooglePlacesCsvScraper {
    api: PlacesApi,
    export: Option<OutputWriter>,
}

impl GooglePlacesCsvScraper {
    pub fn new(api: PlacesApi, export_dir: Option<PathBuf>) -> Self {
        Self {
            api,
            export: export_dir.map(|dir| OutputWriter::new(dir, OutputFormat::Csv)),
        }
    }

    pub fn map_details(result: &Value) -> NormalizedRecord {
        let record = NormalizedRecord {
            name: str_at(result, "/name"),
            address: str_at(result, "/formatted_address"),
            city: result.get("address_components").and_then(resolve_city),
            latitude: f64_at(result, "/geometry/location/lat"),
            longitude: f64_at(result, "/geometry/location/lng"),
            description: str_at(result, "/editorial_summary/overview"),
            category: Some(category_for(result)),
            ..Default::default()
        };
        debug!(
            "{} -> category {}",
            record.display_name(),
            record.category.map(|c| c.to_string()).unwrap_or_default()
        );
        record
    }
}

fn category_for(result: &Value) -> CategoryId {
    let tags: Vec<&str> = result
        .get("types")
        .and_then(Value::as_array)
        .map(|types| types.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    classify(tags.as_slice())
}

/// City name from `address_components`: a `locality` component if any, otherwise an
/// `administrative_area_level_3` one (small towns), otherwise nothing.
pub fn resolve_city(components: &Value) -> Option<String> {
    let components = components.as_array()?;
    let find = |wanted: &str| {
        components.iter().find_map(|component| {
            let tagged = component
                .get("types")
                .and_then(Value::as_array)
                .map(|types| types.iter().any(|t| t.as_str() == Some(wanted)))
                .unwrap_or(false);
            if tagged {
                str_at(component, "/long_name")
            } else {
                None
            }
        })
    };
    find(LOCALITY).or_else(|| find(ADMIN_AREA_LEVEL_3))
}

#[async_trait::async_trait]
impl SourceClient for GooglePlacesCsvScraper {
    fn source_name(&self) -> &'static str {
        GOOGLE_PLACES_CSV_SOURCE
    }

    async fn fetch_data(&self, query: &Query) -> RawSearchResult {
        info!("Searching places for query={}", query);
        self.api.search(query).await
    }

    async fn parse_data(&self, raw: RawSearchResult) -> Vec<NormalizedRecord> {
        let query = raw.query.clone();
        let records = self.api.parse_hits(raw, Self::map_details).await;

        if let Some(export) = &self.export {
            match export.write(&records, &query, IMPORT_COLUMNS) {
                Ok(Some(path)) => info!("Exported import CSV to {}", path.display()),
                Ok(None) => {}
                Err(e) => error!("Failed to export import CSV: {}", e),
            }
        }

        records
    }

    fn columns(&self) -> &'static [&'static str] {
        IMPORT_COLUMNS
    }
}
