//! Web-map deep links emitted alongside each output row.

use crate::geo::Coordinate;

const MAP_PLACE_URL: &str = "https://www.google.com/maps/place/";

/// Link that searches the map for a free-form address.
pub fn map_address_url(address: &str) -> String {
    format!("{}{}", MAP_PLACE_URL, quote_plus(address))
}

/// Link that centres the map on a coordinate.
pub fn map_location_url(coordinate: Coordinate) -> String {
    format!(
        "{}{:?},{:?}",
        MAP_PLACE_URL, coordinate.latitude, coordinate.longitude
    )
}

/// Form-style percent-encoding: spaces become `+`, unreserved characters are
/// kept and every other UTF-8 byte is written as `%XX`.
fn quote_plus(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
