use once_cell::sync::Lazy;
use regex::Regex;

static UK_POSTCODE: Lazy<Regex> = Lazy::new(|| {
    // Outward code, optional space, inward code.
    Regex::new(r"(?i)([A-Z]{1,2}\d{1,2}[A-Z]?\s?\d[A-Z]{2})").expect("postcode pattern is valid")
});

/// Pull the first UK postcode out of a free-text address.
///
/// Returns an empty string when the address carries none. Used as a
/// fallback when the location-capture step did not populate a structured
/// postcode.
pub fn extract_postcode(address: &str) -> String {
    UK_POSTCODE
        .find(address)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
