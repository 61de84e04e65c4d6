//! External-service URL resolution
//!
//! Fills the `SU` placeholder without credentials: instead of resolving the
//! exact track through an authenticated search API, build a public search
//! URL from the track's title and artist.

use crate::track::TrackCoreElement;

const SPOTIFY_SEARCH_BASE: &str = "https://open.spotify.com/search/";

/// Public Spotify search URL for a track.
///
/// `None` when the core element lacks a search query (title or artist
/// unknown).
#[must_use]
pub fn spotify_search_url(core: &TrackCoreElement) -> Option<String> {
    core.search_query()
        .map(|query| format!("{SPOTIFY_SEARCH_BASE}{}", urlencoding::encode(&query)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_query() {
        let core = TrackCoreElement {
            title: Some("Song & Dance".to_string()),
            artist: Some("Band".to_string()),
            album: None,
            composer: None,
        };
        assert_eq!(
            spotify_search_url(&core).as_deref(),
            Some("https://open.spotify.com/search/Song%20%26%20Dance%20Band")
        );
    }

    #[test]
    fn none_without_artist() {
        let core = TrackCoreElement {
            title: Some("Song".to_string()),
            ..TrackCoreElement::default()
        };
        assert!(spotify_search_url(&core).is_none());
    }
}
