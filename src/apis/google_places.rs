use crate::apis::{f64_at, id_at, str_at};
use crate::constants::{GOOGLE_PLACES_SOURCE, PLACES_DETAILS_URL, PLACES_TEXT_SEARCH_URL};
use crate::infra::{fetch_json, HttpClientPort, HttpRequest};
use crate::rate_limiter::{CallClass, RateLimiter};
use crate::types::{NormalizedRecord, Query, RawSearchResult, SourceClient};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Shared access to the place search API: paginated text search plus per-place details.
/// Both place-search scrapers are built on it and differ only in how details are mapped.
pub struct PlacesApi {
    http: Arc<dyn HttpClientPort>,
    api_key: String,
    limiter: RateLimiter,
    timeout: Duration,
}

impl PlacesApi {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        api_key: String,
        limiter: RateLimiter,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            api_key,
            limiter,
            timeout,
        }
    }

    /// Run a text search and follow `next_page_token` until the API stops returning one.
    ///
    /// A failed page ends pagination; the hits gathered so far are still returned.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn search(&self, query: &Query) -> RawSearchResult {
        let mut request = HttpRequest::get(PLACES_TEXT_SEARCH_URL, self.timeout)
            .param("query", query.as_str())
            .param("key", &self.api_key);
        let mut hits = Vec::new();
        let mut pages = 0usize;

        loop {
            let data = match fetch_json(self.http.as_ref(), &request).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Search request failed after {} page(s): {}", pages, e);
                    break;
                }
            };
            pages += 1;

            if let Some(results) = data.get("results").and_then(Value::as_array) {
                debug!("Page {} returned {} results", pages, results.len());
                hits.extend(results.iter().cloned());
            }

            let Some(token) = str_at(&data, "/next_page_token") else {
                break;
            };

            debug!("Waiting for next_page_token to activate");
            self.limiter.acquire(CallClass::SearchPage).await;
            request = HttpRequest::get(PLACES_TEXT_SEARCH_URL, self.timeout)
                .param("pagetoken", token)
                .param("key", &self.api_key);
        }

        info!("Collected {} search results over {} page(s)", hits.len(), pages);
        RawSearchResult::new(query.clone(), hits)
    }

    /// Fetch the `result` object of one place's details.
    #[instrument(skip(self))]
    pub async fn fetch_details(&self, place_id: &str) -> Option<Value> {
        if place_id.trim().is_empty() {
            warn!("Refusing details lookup without a place_id");
            return None;
        }

        let request = HttpRequest::get(PLACES_DETAILS_URL, self.timeout)
            .param("place_id", place_id)
            .param("key", &self.api_key);

        let body = match fetch_json(self.http.as_ref(), &request).await {
            Ok(body) => body,
            Err(e) if e.is_transport() => {
                error!("Failed to fetch details for place_id={}: {}", place_id, e);
                return None;
            }
            Err(e) => {
                warn!("Details lookup failed for place_id={}: {}", place_id, e);
                return None;
            }
        };

        match body.get("result") {
            Some(result) if result.is_object() => Some(result.clone()),
            _ => {
                warn!("No details payload for place_id={}", place_id);
                None
            }
        }
    }

    /// Look up details for every hit with a `place_id` and map them with `map`.
    pub async fn parse_hits<F>(&self, raw: RawSearchResult, map: F) -> Vec<NormalizedRecord>
    where
        F: Fn(&Value) -> NormalizedRecord + Send + Sync,
    {
        if raw.is_empty() {
            warn!("No search results to parse");
            return Vec::new();
        }

        let total = raw.len();
        info!("Parsing {} places...", total);
        let mut records = Vec::new();

        for (i, hit) in raw.hits.iter().enumerate() {
            let position = i + 1;
            let Some(place_id) = id_at(hit, "/place_id") else {
                debug!("[{}/{}] Skipping result without place_id", position, total);
                continue;
            };

            match self.fetch_details(&place_id).await {
                Some(details) => {
                    let record = map(&details);
                    debug!("[{}/{}] Added: {}", position, total, record.display_name());
                    records.push(record);
                }
                None => {
                    warn!("[{}/{}] No details for place_id={}", position, total, place_id);
                }
            }

            self.limiter.acquire(CallClass::Details).await;
        }

        info!("Parsing finished with {} records", records.len());
        records
    }
}

const COLUMNS: &[&str] = &[
    "source_id",
    "name",
    "address",
    "phone",
    "latitude",
    "longitude",
    "image",
    "website",
];

/// Minimal-field place search scraper.
pub struct GooglePlacesScraper {
    api: PlacesApi,
}

impl GooglePlacesScraper {
    pub fn new(api: PlacesApi) -> Self {
        Self { api }
    }

    pub fn map_details(result: &Value) -> NormalizedRecord {
        NormalizedRecord {
            source_id: id_at(result, "/place_id"),
            name: str_at(result, "/name"),
            address: str_at(result, "/formatted_address"),
            phone: str_at(result, "/international_phone_number"),
            latitude: f64_at(result, "/geometry/location/lat"),
            longitude: f64_at(result, "/geometry/location/lng"),
            image: str_at(result, "/photos/0/photo_reference"),
            website: str_at(result, "/website"),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl SourceClient for GooglePlacesScraper {
    fn source_name(&self) -> &'static str {
        GOOGLE_PLACES_SOURCE
    }

    async fn fetch_data(&self, query: &Query) -> RawSearchResult {
        self.api.search(query).await
    }

    async fn parse_data(&self, raw: RawSearchResult) -> Vec<NormalizedRecord> {
        self.api.parse_hits(raw, Self::map_details).await
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }
}
