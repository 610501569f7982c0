use crate::apis::{f64_at, id_at, str_at};
use crate::config::Timeouts;
use crate::constants::{
    TRIP_ADVISOR_BASE_URL, TRIP_ADVISOR_CURRENCY, TRIP_ADVISOR_DETAILS_LANGUAGE,
    TRIP_ADVISOR_SEARCH_LANGUAGE, TRIP_ADVISOR_SEARCH_LIMIT, TRIP_ADVISOR_SOURCE,
};
use crate::infra::{fetch_json, HttpClientPort, HttpRequest};
use crate::rate_limiter::{CallClass, RateLimiter};
use crate::types::{NormalizedRecord, Query, RawSearchResult, SourceClient};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const COLUMNS: &[&str] = &[
    "source_id",
    "name",
    "address",
    "phone",
    "website",
    "latitude",
    "longitude",
    "rating",
    "price_level",
    "image",
];

/// Content search API scraper. Search is a single page; details and photos are one
/// extra call each per location.
pub struct TripAdvisorScraper {
    http: Arc<dyn HttpClientPort>,
    api_key: String,
    limiter: RateLimiter,
    timeouts: Timeouts,
    base_url: String,
}

impl TripAdvisorScraper {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        api_key: String,
        limiter: RateLimiter,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            http,
            api_key,
            limiter,
            timeouts,
            base_url: TRIP_ADVISOR_BASE_URL.to_string(),
        }
    }

    pub fn details_url(&self, location_id: &str) -> String {
        format!("{}/location/{}/details", self.base_url, location_id)
    }

    pub fn photos_url(&self, location_id: &str) -> String {
        format!("{}/location/{}/photos", self.base_url, location_id)
    }

    #[instrument(skip(self))]
    async fn get_place_details(&self, location_id: &str) -> Option<Value> {
        let request = HttpRequest::get(self.details_url(location_id), self.timeouts.content)
            .param("key", &self.api_key)
            .param("language", TRIP_ADVISOR_DETAILS_LANGUAGE)
            .param("currency", TRIP_ADVISOR_CURRENCY);

        match fetch_json(self.http.as_ref(), &request).await {
            Ok(details) if details.is_object() => Some(details),
            Ok(_) => {
                warn!("Details response for location_id={} is not an object", location_id);
                None
            }
            Err(e) if e.is_transport() => {
                error!("Failed to fetch details for location_id={}: {}", location_id, e);
                None
            }
            Err(e) => {
                warn!("Details lookup failed for location_id={}: {}", location_id, e);
                None
            }
        }
    }

    /// Large image URL of the first photo. Photos cost extra quota and are optional,
    /// so every failure quietly means "no image".
    async fn get_place_photo(&self, location_id: &str) -> Option<String> {
        self.limiter.acquire(CallClass::Photo).await;
        let request = HttpRequest::get(self.photos_url(location_id), self.timeouts.photo)
            .param("key", &self.api_key)
            .param("limit", 1);

        let response = self.http.get(&request).await.ok()?;
        if !response.is_success() {
            return None;
        }
        str_at(&response.body, "/data/0/images/large/url")
    }

    pub fn map_details(
        hit: &Value,
        details: &Value,
        location_id: &str,
        image: Option<String>,
    ) -> NormalizedRecord {
        let address = str_at(hit, "/address_obj/address_string").or_else(|| {
            details
                .get("address_obj")
                .filter(|obj| obj.is_object())
                .and_then(fallback_address)
        });

        NormalizedRecord {
            source_id: Some(location_id.to_string()),
            name: str_at(details, "/name"),
            address,
            phone: str_at(details, "/phone"),
            website: str_at(details, "/website"),
            latitude: f64_at(details, "/latitude"),
            longitude: f64_at(details, "/longitude"),
            rating: f64_at(details, "/rating"),
            price_level: str_at(details, "/price_level"),
            image,
            ..Default::default()
        }
    }
}

/// `street, city, country` from a structured address, skipping empty parts.
pub fn fallback_address(address_obj: &Value) -> Option<String> {
    join_address_parts(&[
        text_part(address_obj, "street1"),
        text_part(address_obj, "city"),
        text_part(address_obj, "country"),
    ])
}

fn text_part<'a>(obj: &'a Value, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub fn join_address_parts(parts: &[&str]) -> Option<String> {
    let joined = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[async_trait::async_trait]
impl SourceClient for TripAdvisorScraper {
    fn source_name(&self) -> &'static str {
        TRIP_ADVISOR_SOURCE
    }

    #[instrument(skip(self, query), fields(query = %query))]
    async fn fetch_data(&self, query: &Query) -> RawSearchResult {
        let request = HttpRequest::get(
            format!("{}/location/search", self.base_url),
            self.timeouts.content,
        )
        .param("key", &self.api_key)
        .param("searchQuery", query.as_str())
        .param("category", "restaurants")
        .param("language", TRIP_ADVISOR_SEARCH_LANGUAGE)
        .param("limit", TRIP_ADVISOR_SEARCH_LIMIT);

        info!("Sending search request for {}", query);
        match fetch_json(self.http.as_ref(), &request).await {
            Ok(data) => {
                let hits = data
                    .get("data")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                info!("Search returned {} locations", hits.len());
                RawSearchResult::new(query.clone(), hits)
            }
            Err(e) => {
                error!("Search request failed: {}", e);
                RawSearchResult::empty(query.clone())
            }
        }
    }

    async fn parse_data(&self, raw: RawSearchResult) -> Vec<NormalizedRecord> {
        if raw.is_empty() {
            warn!("No search results to parse");
            return Vec::new();
        }

        let total = raw.len();
        info!("Found {} locations, fetching details...", total);
        let mut records = Vec::new();

        for (i, hit) in raw.hits.iter().enumerate() {
            let position = i + 1;
            let Some(location_id) = id_at(hit, "/location_id") else {
                debug!("[{}/{}] Skipping result without location_id", position, total);
                continue;
            };

            let details = self.get_place_details(&location_id).await;
            self.limiter.acquire(CallClass::Details).await;
            let Some(details) = details else {
                continue;
            };

            let image = self.get_place_photo(&location_id).await;
            let record = Self::map_details(hit, &details, &location_id, image);
            debug!("[{}/{}] Processed: {}", position, total, record.display_name());
            records.push(record);
        }

        info!("Finished with {} restaurants", records.len());
        records
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }
}
