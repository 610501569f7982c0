//! Maps place-search type tags onto the internal category enumeration.
//!
//! The table is fixed configuration: many tags share one category, and lookup is
//! first-match in the order the tags were given.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier from the closed, source-independent category enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const FAST_FOOD: CategoryId = CategoryId(1);
pub const ITALIAN: CategoryId = CategoryId(3);
pub const ASIAN: CategoryId = CategoryId(5);
pub const POLISH: CategoryId = CategoryId(7);
pub const AMERICAN: CategoryId = CategoryId(9);
pub const MEXICAN: CategoryId = CategoryId(11);
pub const INDIAN: CategoryId = CategoryId(13);
pub const CAFE: CategoryId = CategoryId(15);
pub const VEGAN: CategoryId = CategoryId(17);
pub const TURKISH: CategoryId = CategoryId(19);
pub const HEALTHY: CategoryId = CategoryId(21);
pub const JAPANESE: CategoryId = CategoryId(24);
pub const VIETNAMESE: CategoryId = CategoryId(26);
pub const EUROPEAN: CategoryId = CategoryId(31);

/// "Other": returned when no tag is recognised.
pub const DEFAULT_CATEGORY: CategoryId = CategoryId(33);

const CATEGORY_MAPPING: &[(&str, CategoryId)] = &[
    ("chinese_restaurant", ASIAN),
    ("asian_restaurant", ASIAN),
    ("thai_restaurant", ASIAN),
    ("japanese_restaurant", JAPANESE),
    ("sushi_restaurant", JAPANESE),
    ("vietnamese_restaurant", VIETNAMESE),
    ("italian_restaurant", ITALIAN),
    ("pizza_restaurant", ITALIAN),
    ("hamburger_restaurant", AMERICAN),
    ("american_restaurant", AMERICAN),
    ("fast_food_restaurant", FAST_FOOD),
    ("meal_takeaway", FAST_FOOD),
    ("cafe", CAFE),
    ("coffee_shop", CAFE),
    ("bakery", CAFE),
    ("mexican_restaurant", MEXICAN),
    ("indian_restaurant", INDIAN),
    ("turkish_restaurant", TURKISH),
    ("kebab_shop", TURKISH),
    ("vegan_restaurant", VEGAN),
    ("vegetarian_restaurant", VEGAN),
    ("health_food_restaurant", HEALTHY),
    ("polish_restaurant", POLISH),
    ("french_restaurant", EUROPEAN),
    ("spanish_restaurant", EUROPEAN),
    ("european_restaurant", EUROPEAN),
];

static CATEGORY_TABLE: Lazy<HashMap<&'static str, CategoryId>> =
    Lazy::new(|| CATEGORY_MAPPING.iter().copied().collect());

/// First tag found in the table wins; empty or unrecognised input gives [`DEFAULT_CATEGORY`].
pub fn classify<S: AsRef<str>>(tags: &[S]) -> CategoryId {
    tags.iter()
        .find_map(|tag| CATEGORY_TABLE.get(tag.as_ref()).copied())
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_unknown_fall_back_to_default() {
        let empty: [&str; 0] = [];
        assert_eq!(classify(&empty), DEFAULT_CATEGORY);
        assert_eq!(classify(&["unknown_tag"]), DEFAULT_CATEGORY);
        assert_eq!(classify(&["restaurant", "food", "point_of_interest"]), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(classify(&["sushi_restaurant"]), CategoryId(24));
        assert_eq!(classify(&["sushi_restaurant", "chinese_restaurant"]), CategoryId(24));
        assert_eq!(classify(&["chinese_restaurant", "sushi_restaurant"]), CategoryId(5));
        assert_eq!(classify(&["restaurant", "kebab_shop", "cafe"]), CategoryId(19));
    }

    #[test]
    fn test_owned_tags() {
        let tags = vec!["bakery".to_string()];
        assert_eq!(classify(tags.as_slice()), CAFE);
    }

    #[test]
    fn test_table_has_no_duplicate_tags() {
        assert_eq!(CATEGORY_TABLE.len(), CATEGORY_MAPPING.len());
    }
}
