/// Central-area postcode prefixes that attract the flat zone charge,
/// analogous to a congestion charge.
const ZONE_PREFIXES: [&str; 11] = [
    "EC1", "EC2", "EC3", "EC4", "WC1", "WC2", "W1", "SW1", "SE1", "NW1", "E1",
];

/// Whether a postcode falls inside the surcharge zone.
///
/// Total over all strings: empty or malformed input classifies as outside
/// the zone, never an error.
pub fn is_surcharge_zone(postcode: &str) -> bool {
    let normalized: String = postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if normalized.is_empty() {
        return false;
    }

    ZONE_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}
