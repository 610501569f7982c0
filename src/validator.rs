use crate::types::NormalizedRecord;
use tracing::{debug, warn};

/// Read-only keep/discard check for a normalized record.
///
/// `name` and `address` must be present and non-empty. Missing `phone`, `website` or
/// `image` is only noted at debug level and never affects the outcome.
pub fn validate(record: &NormalizedRecord) -> bool {
    let has_required = is_filled(&record.name) && is_filled(&record.address);

    if !has_required {
        warn!(record = ?record, "Invalid record, missing name or address");
        return false;
    }

    for (field, value) in [
        ("phone", &record.phone),
        ("website", &record.website),
        ("image", &record.image),
    ] {
        if !is_filled(value) {
            debug!("Empty optional field '{}' for {}", field, record.display_name());
        }
    }

    true
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.is_empty())
}
