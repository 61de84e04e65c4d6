//! MPRIS D-Bus monitoring module
//!
//! Watches MPRIS-compatible media players via D-Bus signals using an async
//! event-driven architecture (not polling).

mod metadata;
mod watcher;

pub use metadata::parse_metadata;
pub use watcher::ShareWatcher;

use zbus::zvariant::{OwnedValue, Value};

/// MPRIS D-Bus constants
pub const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";
pub const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";
pub const MPRIS_PLAYER_IFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Extract a string from a D-Bus value.
pub fn extract_string(value: &OwnedValue) -> Option<String> {
    <&str>::try_from(value)
        .map(String::from)
        .or_else(|_| String::try_from(value.clone()))
        .ok()
}

/// Extract a string array from a D-Bus value, with a manual fallback for
/// variant-wrapped arrays.
fn extract_string_array(value: &OwnedValue) -> Option<Vec<String>> {
    Vec::<String>::try_from(value.clone())
        .ok()
        .filter(|arr| !arr.is_empty())
        .or_else(|| {
            if let Value::Array(arr) = Value::from(value.clone()) {
                let strings: Vec<_> = arr
                    .iter()
                    .filter_map(|v| match v {
                        Value::Str(s) => Some(s.to_string()),
                        _ => None,
                    })
                    .collect();
                (!strings.is_empty()).then_some(strings)
            } else {
                None
            }
        })
}

/// Extract the first element of a string array, falling back to a single string
pub fn extract_first_or_string(value: &OwnedValue) -> Option<String> {
    if let Some(arr) = extract_string_array(value) {
        arr.into_iter().next()
    } else {
        extract_string(value)
    }
}

/// Extract a string array and join with separator, falling back to a single string
pub fn extract_or_join_array(value: &OwnedValue, separator: &str) -> Option<String> {
    if let Some(arr) = extract_string_array(value) {
        Some(arr.join(separator))
    } else {
        extract_string(value)
    }
}
