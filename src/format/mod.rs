//! Sharing-text format engine
//!
//! A template is plain text with fixed placeholder tokens (`TI`, `AR`, `AL`,
//! `CO`, `PN`, `SU`), a `\n` line-break escape, and single-quote literal
//! spans: text between a pair of quotes renders verbatim with no
//! substitution, and `''` renders a literal quote. Each placeholder may
//! carry a prefix/suffix modifier applied around its resolved value.
//!
//! The engine is a pure, synchronous text transform: tokenize a template
//! once, render it against any number of [`TrackInfo`] snapshots. No state,
//! no I/O, safe to call from any thread.

pub mod pattern;
mod render;
mod tokenize;

pub use pattern::{affixes, FormatPattern, FormatPatternModifier};
pub use render::render;
pub use tokenize::tokenize;

use crate::error::{Error, Result};
use crate::track::TrackInfo;

/// The out-of-the-box share template.
pub const DEFAULT_TEMPLATE: &str = "#NowPlaying TI - AR (AL)";

/// Render share text for a track, or `None` when the track is not ready.
///
/// The readiness gate is strict-match on the core element: title, artist and
/// album must all be known, otherwise no text is produced at all (never a
/// partially filled string). Optional fields beyond those three may be
/// absent; they substitute as empty.
#[must_use]
pub fn share_text(
    template: &str,
    track: &TrackInfo,
    modifiers: &[FormatPatternModifier],
) -> Option<String> {
    if !track.core.is_all_present() {
        return None;
    }
    Some(render(&tokenize(template), track, modifiers))
}

/// Whether a template contains a pattern as an active token.
///
/// Matching runs on the folded token list, so a pattern appearing only
/// inside a quoted escape span counts as absent - the answer agrees with
/// what rendering would substitute.
#[must_use]
pub fn contains_pattern(template: &str, pattern: FormatPattern) -> bool {
    tokenize(template).contains(&pattern.token())
}

/// The patterns active in a template, in order of appearance.
///
/// Duplicates are kept; escaped occurrences are not reported.
#[must_use]
pub fn contained_patterns(template: &str) -> Vec<FormatPattern> {
    tokenize(template)
        .into_iter()
        .filter_map(FormatPattern::from_token)
        .collect()
}

/// Check a template for authoring errors.
///
/// After folding, a surviving lone quote token means an unterminated escape
/// span. Rendering such a template drops the dangling quote silently; this
/// check exists so the problem surfaces while the template is being edited.
pub fn validate(template: &str) -> Result<()> {
    if tokenize(template)
        .iter()
        .any(|t| *t == FormatPattern::Quote.token())
    {
        return Err(Error::format(
            "unterminated escape: a ' marker is missing its closing '",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackCoreElement;

    fn track(title: Option<&str>, artist: Option<&str>, album: Option<&str>) -> TrackInfo {
        TrackInfo::from_core(TrackCoreElement {
            title: title.map(String::from),
            artist: artist.map(String::from),
            album: album.map(String::from),
            composer: None,
        })
    }

    #[test]
    fn end_to_end_default_template() {
        let track = track(Some("Song"), Some("Band"), Some("Record"));
        assert_eq!(
            share_text(DEFAULT_TEMPLATE, &track, &[]).as_deref(),
            Some("#NowPlaying Song - Band (Record)")
        );
    }

    #[test]
    fn gate_rejects_incomplete_core() {
        for t in [
            track(None, Some("Band"), Some("Record")),
            track(Some("Song"), None, Some("Record")),
            track(Some("Song"), Some("Band"), None),
        ] {
            assert_eq!(share_text(DEFAULT_TEMPLATE, &t, &[]), None);
        }
    }

    #[test]
    fn gate_ignores_optional_fields() {
        // No composer, player name or service URL - still renders.
        let track = track(Some("Song"), Some("Band"), Some("Record"));
        assert_eq!(
            share_text("TI (PN)", &track, &[]).as_deref(),
            Some("Song ()")
        );
    }

    #[test]
    fn contains_pattern_finds_active_tokens() {
        assert!(contains_pattern("TI - AR", FormatPattern::Artist));
        assert!(!contains_pattern("TI - AR", FormatPattern::Album));
    }

    #[test]
    fn contains_pattern_ignores_escaped_tokens() {
        assert!(!contains_pattern("'AR'", FormatPattern::Artist));
        assert!(contains_pattern("'AR' AR", FormatPattern::Artist));
    }

    #[test]
    fn contained_patterns_in_order() {
        assert_eq!(
            contained_patterns("AR - TI 'AL' TI"),
            vec![
                FormatPattern::Artist,
                FormatPattern::Title,
                FormatPattern::Title
            ]
        );
    }

    #[test]
    fn validate_accepts_balanced_quotes() {
        for template in ["", "TI - AR", "'TI' AR", "it''s", "'a' 'b'"] {
            assert!(validate(template).is_ok(), "template: {template:?}");
        }
    }

    #[test]
    fn validate_rejects_unterminated_escape() {
        for template in ["'", "TI'", "'a' b'", "'''"] {
            assert!(validate(template).is_err(), "template: {template:?}");
        }
    }
}
