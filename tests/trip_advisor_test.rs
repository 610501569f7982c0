mod common;

use common::{Reply, ScriptedHttp};
use restaurant_scraper::apis::trip_advisor::TripAdvisorScraper;
use restaurant_scraper::config::Timeouts;
use restaurant_scraper::constants::TRIP_ADVISOR_BASE_URL;
use restaurant_scraper::rate_limiter::{Limits, RateLimiter};
use restaurant_scraper::types::{Query, SourceClient};
use serde_json::json;
use std::sync::Arc;

fn search_url() -> String {
    format!("{}/location/search", TRIP_ADVISOR_BASE_URL)
}

fn details_url(id: &str) -> String {
    format!("{}/location/{}/details", TRIP_ADVISOR_BASE_URL, id)
}

fn photos_url(id: &str) -> String {
    format!("{}/location/{}/photos", TRIP_ADVISOR_BASE_URL, id)
}

fn scraper(http: Arc<ScriptedHttp>) -> TripAdvisorScraper {
    TripAdvisorScraper::new(http, "ta-key".into(), RateLimiter::new(Limits::none()), Timeouts::default())
}

#[tokio::test]
async fn test_search_sends_expected_params() {
    let http = Arc::new(ScriptedHttp::new().on(
        &search_url(),
        Reply::Json(json!({ "data": [{ "location_id": "1" }, { "location_id": "2" }] })),
    ));
    let client = scraper(http.clone());

    let raw = client.fetch_data(&Query::new("restaurants in Krakow")).await;
    assert_eq!(raw.len(), 2);

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let search = &requests[0];
    assert_eq!(search.param_value("searchQuery"), Some("restaurants in Krakow"));
    assert_eq!(search.param_value("category"), Some("restaurants"));
    assert_eq!(search.param_value("language"), Some("pl"));
    assert_eq!(search.param_value("limit"), Some("10"));
    assert_eq!(search.param_value("key"), Some("ta-key"));
}

#[tokio::test]
async fn test_search_failure_yields_empty_result() {
    let http = Arc::new(ScriptedHttp::new().on(&search_url(), Reply::Status(401)));
    let client = scraper(http);

    let raw = client.fetch_data(&Query::new("q")).await;
    assert!(raw.is_empty());
    assert!(client.parse_data(raw).await.is_empty());
}

#[tokio::test]
async fn test_parse_fetches_details_and_photos() {
    let http = Arc::new(
        ScriptedHttp::new()
            .on(
                &search_url(),
                Reply::Json(json!({
                    "data": [
                        { "location_id": "100", "address_obj": { "address_string": "Floriańska 1, Kraków" } },
                        { "name": "missing id" },
                        { "location_id": "200" },
                        { "location_id": "300" }
                    ]
                })),
            )
            .on(
                &details_url("100"),
                Reply::Json(json!({
                    "name": "Jama Michalika",
                    "phone": "+48 12 422 15 61",
                    "latitude": "50.0636",
                    "longitude": "19.9401",
                    "rating": "4.0"
                })),
            )
            .on(
                &photos_url("100"),
                Reply::Json(json!({
                    "data": [{ "images": { "large": { "url": "https://media.example/jama.jpg" } } }]
                })),
            )
            .on(&details_url("200"), Reply::Status(500))
            .on(
                &details_url("300"),
                Reply::Json(json!({
                    "name": "Bar Mleczny",
                    "address_obj": { "street1": "", "city": "Kraków", "country": "" }
                })),
            )
            .on(&photos_url("300"), Reply::Status(429)),
    );
    let client = scraper(http.clone());

    let raw = client.fetch_data(&Query::new("q")).await;
    let records = client.parse_data(raw).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name.as_deref(), Some("Jama Michalika"));
    assert_eq!(records[0].address.as_deref(), Some("Floriańska 1, Kraków"));
    assert_eq!(records[0].image.as_deref(), Some("https://media.example/jama.jpg"));
    assert_eq!(records[0].latitude, Some(50.0636));
    assert_eq!(records[0].rating, Some(4.0));
    assert_eq!(records[0].source_id.as_deref(), Some("100"));

    assert_eq!(records[1].name.as_deref(), Some("Bar Mleczny"));
    assert_eq!(records[1].address.as_deref(), Some("Kraków"));
    assert_eq!(records[1].image, None);

    // No photo lookup for the location whose details failed
    assert!(http.requests_to(&photos_url("200")).is_empty());
    let photo = &http.requests_to(&photos_url("100"))[0];
    assert_eq!(photo.param_value("limit"), Some("1"));
    let detail = &http.requests_to(&details_url("100"))[0];
    assert_eq!(detail.param_value("language"), Some("en"));
    assert_eq!(detail.param_value("currency"), Some("PLN"));
}
