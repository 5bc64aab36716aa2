//! Preference matching - the pure predicate behind notification fan-out
//!
//! City entries compare case-insensitively (lowercased, trimmed) by exact
//! equality or substring of the property location. Type entries compare
//! case-sensitively (trimmed only). The asymmetry is intentional product
//! behavior, not an oversight.

use crate::property::Property;
use crate::user::UserPreferences;

/// Decide whether a property matches a user's stored preferences.
///
/// Absent preferences never match, and so do empty preference lists on both
/// axes. When both axes carry entries, a match on either one is enough.
pub fn matches(property: &Property, preferences: Option<&UserPreferences>) -> bool {
    let Some(prefs) = preferences else {
        return false;
    };

    let has_city_prefs = !prefs.preferred_cities.is_empty();
    let has_type_prefs = !prefs.preferred_property_types.is_empty();

    let city_match =
        has_city_prefs && city_matches(&property.location, &prefs.preferred_cities);
    let type_match =
        has_type_prefs && type_matches(&property.property_type, &prefs.preferred_property_types);

    match (has_city_prefs, has_type_prefs) {
        // Both axes set: either one alone satisfies the user
        (true, true) => city_match || type_match,
        (true, false) => city_match,
        (false, true) => type_match,
        // No opinion on either axis never means "match everything"
        (false, false) => false,
    }
}

fn city_matches(location: &str, cities: &[String]) -> bool {
    let location = location.trim().to_lowercase();
    cities.iter().any(|city| {
        let city = city.trim().to_lowercase();
        location == city || location.contains(&city)
    })
}

// Case-sensitive, unlike city matching
fn type_matches(property_type: &str, types: &[String]) -> bool {
    let property_type = property_type.trim();
    types.iter().any(|preferred| {
        let preferred = preferred.trim();
        property_type == preferred || property_type.contains(preferred)
    })
}
