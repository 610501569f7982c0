use crate::apis::google_places::{GooglePlacesScraper, PlacesApi};
use crate::apis::google_places_csv::GooglePlacesCsvScraper;
use crate::apis::trip_advisor::TripAdvisorScraper;
use crate::config::Config;
use crate::constants::{
    GOOGLE_PLACES_CSV_SOURCE, GOOGLE_PLACES_SOURCE, IMPORT_EXPORT_DIR, TRIP_ADVISOR_SOURCE,
};
use crate::error::{Result, ScraperError};
use crate::infra::HttpClientPort;
use crate::rate_limiter::RateLimiter;
use crate::types::SourceClient;
use std::path::Path;
use std::sync::Arc;

/// Build the client for `source`. The API key is checked here, before any request is made.
///
/// The category-aware place search variant drops its import CSV into
/// `<output_dir>/import`, apart from the run's own output file.
pub fn create_client(
    source: &str,
    config: &Config,
    http: Arc<dyn HttpClientPort>,
    output_dir: &Path,
) -> Result<Box<dyn SourceClient>> {
    let limiter = RateLimiter::new(config.limits);
    match source {
        GOOGLE_PLACES_SOURCE => {
            let api = PlacesApi::new(http, config.google_place_api_key()?, limiter, config.timeouts.places);
            Ok(Box::new(GooglePlacesScraper::new(api)))
        }
        GOOGLE_PLACES_CSV_SOURCE => {
            let api = PlacesApi::new(http, config.google_place_api_key()?, limiter, config.timeouts.places);
            Ok(Box::new(GooglePlacesCsvScraper::new(
                api,
                Some(output_dir.join(IMPORT_EXPORT_DIR)),
            )))
        }
        TRIP_ADVISOR_SOURCE => Ok(Box::new(TripAdvisorScraper::new(
            http,
            config.tripadvisor_api_key()?,
            limiter,
            config.timeouts,
        ))),
        other => Err(ScraperError::Config(format!("Unknown source: {}", other))),
    }
}
