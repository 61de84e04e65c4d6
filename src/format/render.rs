//! Token substitution against a track snapshot

use super::pattern::{affixes, FormatPattern, FormatPatternModifier};
use crate::track::TrackInfo;

/// Render a tokenized template against a track snapshot.
///
/// Missing metadata is normal, not an error: an unset field renders as the
/// empty string with no orphaned modifier decoration, and any mix of
/// present/absent fields produces a best-effort string.
#[must_use]
pub fn render(tokens: &[&str], track: &TrackInfo, modifiers: &[FormatPatternModifier]) -> String {
    let mut out = String::new();

    for &token in tokens {
        if is_folded_literal(token) {
            // One leading and one trailing quote wrap the escaped run.
            out.push_str(&token[1..token.len() - 1]);
            continue;
        }

        match FormatPattern::from_token(token) {
            Some(FormatPattern::Quote) => {}
            Some(FormatPattern::DoubleQuote) => out.push('\''),
            Some(FormatPattern::NewLine) => out.push('\n'),
            Some(pattern) => {
                if let Some(value) = field_value(track, pattern) {
                    let (prefix, suffix) = affixes(modifiers, pattern);
                    out.push_str(prefix);
                    out.push_str(value);
                    out.push_str(suffix);
                }
            }
            None => out.push_str(token),
        }
    }

    out
}

/// A token produced by escape-span folding: wrapped in its own quote
/// characters with at least one character between them.
fn is_folded_literal(token: &str) -> bool {
    token.len() > 2 && token.starts_with('\'') && token.ends_with('\'')
}

/// The track field a replaceable pattern substitutes.
fn field_value(track: &TrackInfo, pattern: FormatPattern) -> Option<&str> {
    match pattern {
        FormatPattern::Title => track.core.title.as_deref(),
        FormatPattern::Artist => track.core.artist.as_deref(),
        FormatPattern::Album => track.core.album.as_deref(),
        FormatPattern::Composer => track.core.composer.as_deref(),
        FormatPattern::PlayerName => track.player_app_name.as_deref(),
        FormatPattern::ServiceUrl => track.service_url.as_deref(),
        FormatPattern::Quote | FormatPattern::DoubleQuote | FormatPattern::NewLine => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tokenize::tokenize;
    use crate::track::TrackCoreElement;

    fn track() -> TrackInfo {
        TrackInfo {
            core: TrackCoreElement {
                title: Some("Song".to_string()),
                artist: Some("Band".to_string()),
                album: Some("Record".to_string()),
                composer: Some("Writer".to_string()),
            },
            player_app_name: Some("amberol".to_string()),
            service_url: Some("https://open.spotify.com/track/x".to_string()),
        }
    }

    fn rendered(template: &str, track: &TrackInfo, modifiers: &[FormatPatternModifier]) -> String {
        render(&tokenize(template), track, modifiers)
    }

    #[test]
    fn substitutes_all_placeholders() {
        assert_eq!(
            rendered("TI/AR/AL/CO/PN/SU", &track(), &[]),
            "Song/Band/Record/Writer/amberol/https://open.spotify.com/track/x"
        );
    }

    #[test]
    fn escaped_span_is_verbatim() {
        assert_eq!(rendered("'literal TI text'", &track(), &[]), "literal TI text");
    }

    #[test]
    fn escaped_span_verbatim_even_without_title() {
        let mut track = track();
        track.core.title = None;
        assert_eq!(rendered("'literal TI text'", &track, &[]), "literal TI text");
    }

    #[test]
    fn double_quote_renders_single_quote() {
        assert_eq!(rendered("it''s", &track(), &[]), "it's");
    }

    #[test]
    fn lone_quote_renders_empty() {
        assert_eq!(rendered("TI'", &track(), &[]), "Song");
    }

    #[test]
    fn newline_escape_renders_line_break() {
        assert_eq!(rendered("TI\\nAR", &track(), &[]), "Song\nBand");
    }

    #[test]
    fn missing_field_renders_empty() {
        let mut track = track();
        track.core.composer = None;
        assert_eq!(rendered("TI (CO)", &track, &[]), "Song ()");
    }

    #[test]
    fn missing_field_drops_modifier_decoration() {
        let mut track = track();
        track.core.title = None;
        let modifiers = [FormatPatternModifier::new(
            FormatPattern::Title,
            Some("["),
            None::<String>,
        )];
        let out = rendered("TI AR", &track, &modifiers);
        assert!(!out.contains('['));
        assert_eq!(out, " Band");
    }

    #[test]
    fn modifier_wraps_value() {
        let modifiers = [FormatPatternModifier::new(
            FormatPattern::Title,
            Some("\u{ab}"),
            Some("\u{bb}"),
        )];
        assert_eq!(rendered("TI", &track(), &modifiers), "\u{ab}Song\u{bb}");
    }

    #[test]
    fn duplicate_modifier_keys_use_first() {
        let modifiers = [
            FormatPatternModifier::new(FormatPattern::Title, Some("["), Some("]")),
            FormatPatternModifier::new(FormatPattern::Title, Some("<"), Some(">")),
        ];
        assert_eq!(rendered("TI", &track(), &modifiers), "[Song]");
    }

    #[test]
    fn unrecognized_tokens_pass_through() {
        assert_eq!(rendered("by AR!", &track(), &[]), "by Band!");
    }
}
