//! Track metadata passed into share-text rendering

use serde::{Deserialize, Serialize};

/// The metadata fields a track must carry before share text is produced.
///
/// Every field is optional at the type level; players routinely omit any of
/// them. [`is_all_present`](Self::is_all_present) is the strict-match gate:
/// title, artist and album must all be known. Composer is carried when
/// available but never required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackCoreElement {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub composer: Option<String>,
}

impl TrackCoreElement {
    /// Whether the required fields (title, artist, album) are all known.
    #[must_use]
    pub const fn is_all_present(&self) -> bool {
        self.title.is_some() && self.artist.is_some() && self.album.is_some()
    }

    /// Search query for resolving an external service URL.
    ///
    /// `None` unless both title and artist are known.
    #[must_use]
    pub fn search_query(&self) -> Option<String> {
        match (self.title.as_deref(), self.artist.as_deref()) {
            (Some(title), Some(artist)) => Some(format!("{title} {artist}")),
            _ => None,
        }
    }
}

/// A snapshot of what is currently playing.
///
/// Plain immutable value data: two instances with equal fields are
/// interchangeable. Rendering never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackInfo {
    /// Core track metadata
    pub core: TrackCoreElement,

    /// Human-readable name of the player application
    pub player_app_name: Option<String>,

    /// Resolved external-service URL for this track (e.g. Spotify)
    pub service_url: Option<String>,
}

impl TrackInfo {
    /// Create a track info from its core element only.
    #[must_use]
    pub fn from_core(core: TrackCoreElement) -> Self {
        Self {
            core,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_core() -> TrackCoreElement {
        TrackCoreElement {
            title: Some("Song".to_string()),
            artist: Some("Band".to_string()),
            album: Some("Record".to_string()),
            composer: None,
        }
    }

    #[test]
    fn all_present_requires_title_artist_album() {
        assert!(full_core().is_all_present());

        let strips: [fn(&mut TrackCoreElement); 3] = [
            |c| c.title = None,
            |c| c.artist = None,
            |c| c.album = None,
        ];
        for strip in strips {
            let mut core = full_core();
            strip(&mut core);
            assert!(!core.is_all_present());
        }
    }

    #[test]
    fn composer_not_required() {
        let mut core = full_core();
        core.composer = Some("Writer".to_string());
        assert!(core.is_all_present());
        core.composer = None;
        assert!(core.is_all_present());
    }

    #[test]
    fn search_query_needs_title_and_artist() {
        assert_eq!(full_core().search_query().as_deref(), Some("Song Band"));

        let mut core = full_core();
        core.artist = None;
        assert!(core.search_query().is_none());
    }

    #[test]
    fn structural_equality() {
        let a = TrackInfo::from_core(full_core());
        let b = TrackInfo::from_core(full_core());
        assert_eq!(a, b);
    }

    #[test]
    fn json_round_trip() {
        let info = TrackInfo {
            core: full_core(),
            player_app_name: Some("amberol".to_string()),
            service_url: Some("https://open.spotify.com/track/x".to_string()),
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: TrackInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
