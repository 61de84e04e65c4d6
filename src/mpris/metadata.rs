//! MPRIS metadata parsing

use std::collections::HashMap;
use zbus::zvariant::OwnedValue;

use crate::track::TrackCoreElement;

use super::{extract_first_or_string, extract_or_join_array, extract_string};

/// Parse MPRIS metadata into a track core element
pub fn parse_metadata(metadata: &HashMap<String, OwnedValue>) -> TrackCoreElement {
    let mut core = TrackCoreElement::default();

    // Title
    if let Some(value) = metadata.get("xesam:title") {
        core.title = extract_string(value);
    }

    // Artist (array of strings, take first)
    if let Some(value) = metadata.get("xesam:artist") {
        core.artist = extract_first_or_string(value);
    }

    // Album
    if let Some(value) = metadata.get("xesam:album") {
        core.album = extract_string(value);
    }

    // Composer (array of strings -> comma-separated)
    if let Some(value) = metadata.get("xesam:composer") {
        core.composer = extract_or_join_array(value, ", ");
    }

    core
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::Value;

    fn owned(value: Value<'_>) -> OwnedValue {
        value.try_into().unwrap()
    }

    #[test]
    fn test_parse_empty_metadata() {
        let metadata = HashMap::new();
        let core = parse_metadata(&metadata);
        assert!(core.title.is_none());
        assert!(core.artist.is_none());
        assert!(core.album.is_none());
        assert!(core.composer.is_none());
    }

    #[test]
    fn test_parse_core_fields() {
        let mut metadata = HashMap::new();
        metadata.insert("xesam:title".to_string(), owned(Value::from("Song")));
        metadata.insert("xesam:album".to_string(), owned(Value::from("Record")));

        let core = parse_metadata(&metadata);
        assert_eq!(core.title.as_deref(), Some("Song"));
        assert_eq!(core.album.as_deref(), Some("Record"));
    }

    #[test]
    fn test_artist_takes_first_of_array() {
        let mut metadata = HashMap::new();
        metadata.insert(
            "xesam:artist".to_string(),
            owned(Value::from(vec!["Band", "Guest"])),
        );

        let core = parse_metadata(&metadata);
        assert_eq!(core.artist.as_deref(), Some("Band"));
    }

    #[test]
    fn test_composer_joins_array() {
        let mut metadata = HashMap::new();
        metadata.insert(
            "xesam:composer".to_string(),
            owned(Value::from(vec!["Writer", "Cowriter"])),
        );

        let core = parse_metadata(&metadata);
        assert_eq!(core.composer.as_deref(), Some("Writer, Cowriter"));
    }
}
