//! Template tokenization: delimiter splitting and escape-span folding

use super::pattern::FormatPattern;

/// Split a template into pattern and literal tokens, folding quoted escape
/// spans into single literal tokens.
///
/// Tokens are borrowed slices of the input in original order; concatenating
/// them reproduces the template exactly. A folded escape span keeps its
/// surrounding quote characters (the renderer strips them), so the coverage
/// invariant holds after folding too.
#[must_use]
pub fn tokenize(template: &str) -> Vec<&str> {
    fold_escapes(template, split_including_delimiters(template))
}

/// Split on every pattern token, keeping the delimiters as tokens.
///
/// Patterns are tried in [`FormatPattern::SPLIT_ORDER`] at each position so
/// `''` wins over `'`.
fn split_including_delimiters(template: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < template.len() {
        let rest = &template[i..];
        if let Some(pattern) = FormatPattern::SPLIT_ORDER
            .iter()
            .find(|p| rest.starts_with(p.token()))
        {
            if literal_start < i {
                tokens.push(&template[literal_start..i]);
            }
            let end = i + pattern.token().len();
            tokens.push(&template[i..end]);
            i = end;
            literal_start = i;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    if literal_start < template.len() {
        tokens.push(&template[literal_start..]);
    }

    tokens
}

/// Merge each consecutively paired run of quote tokens into one literal.
///
/// Quote tokens pair left to right (1st with 2nd, 3rd with 4th, ...); the
/// tokens from an opening quote through its closing quote become a single
/// slice of the template. Tokens outside pairs pass through verbatim, as
/// does a final unpaired quote (`validate` reports that case).
fn fold_escapes<'a>(template: &'a str, raw: Vec<&'a str>) -> Vec<&'a str> {
    let quote = FormatPattern::Quote.token();
    let quote_indices: Vec<usize> = raw
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == quote)
        .map(|(i, _)| i)
        .collect();

    if quote_indices.is_empty() {
        return raw;
    }

    // Tokens tile the template, so offsets follow from the lengths.
    let mut offsets = Vec::with_capacity(raw.len() + 1);
    let mut pos = 0;
    for token in &raw {
        offsets.push(pos);
        pos += token.len();
    }
    offsets.push(pos);

    let mut folded = Vec::with_capacity(raw.len());
    let mut next = 0;
    for pair in quote_indices.chunks_exact(2) {
        let (open, close) = (pair[0], pair[1]);
        folded.extend_from_slice(&raw[next..open]);
        folded.push(&template[offsets[open]..offsets[close + 1]]);
        next = close + 1;
    }
    folded.extend_from_slice(&raw[next..]);

    folded
}
