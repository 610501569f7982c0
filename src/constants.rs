/// Source name constants to ensure consistency across the codebase.
/// These are the names accepted on the command line.
pub const GOOGLE_PLACES_SOURCE: &str = "google-places";
pub const GOOGLE_PLACES_CSV_SOURCE: &str = "google-places-csv";
pub const TRIP_ADVISOR_SOURCE: &str = "trip-advisor";

// Environment variables holding the API keys
pub const GOOGLE_PLACE_API_KEY_VAR: &str = "GOOGLE_PLACE_API_KEY";
pub const TRIPADVISOR_API_KEY_VAR: &str = "TRIPADVISOR_API_KEY";

/// Subdirectory of the output directory receiving the category-aware import CSV
pub const IMPORT_EXPORT_DIR: &str = "import";

// Place search API (A)
pub const PLACES_TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
pub const PLACES_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

// Content search API (B)
pub const TRIP_ADVISOR_BASE_URL: &str = "https://api.content.tripadvisor.com/api/v1";
pub const TRIP_ADVISOR_SEARCH_LIMIT: u32 = 10;
pub const TRIP_ADVISOR_SEARCH_LANGUAGE: &str = "pl";
pub const TRIP_ADVISOR_DETAILS_LANGUAGE: &str = "en";
pub const TRIP_ADVISOR_CURRENCY: &str = "PLN";

/// Default query when none is given on the command line
pub fn default_query(source: &str) -> &'static str {
    match source {
        GOOGLE_PLACES_CSV_SOURCE => "restauracje+w+warszawie",
        TRIP_ADVISOR_SOURCE => "restaurants in Krakow",
        _ => "restaurants+in+Krakow",
    }
}

/// Get all supported source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![GOOGLE_PLACES_SOURCE, GOOGLE_PLACES_CSV_SOURCE, TRIP_ADVISOR_SOURCE]
}
