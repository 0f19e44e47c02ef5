use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::OriginalToken;

const HEBREW_MAQAF: char = '\u{05BE}';

/// Split `source` into maximal runs of non-whitespace characters.
///
/// Offsets are recorded both as character positions (what clients highlight
/// against) and as byte positions (what Rust slices with). Combining marks are
/// never whitespace, so vocalized clusters always stay inside one token.
pub fn tokenize_source_text(source: &str) -> Vec<OriginalToken> {
    let mut tokens = Vec::new();
    // (byte_start, char_start) of the run being accumulated.
    let mut run: Option<(usize, usize)> = None;
    let mut char_pos = 0usize;

    for (byte_pos, c) in source.char_indices() {
        if c.is_whitespace() {
            if let Some((byte_start, char_start)) = run.take() {
                tokens.push(make_token(source, byte_start, byte_pos, char_start, char_pos));
            }
        } else if run.is_none() {
            run = Some((byte_pos, char_pos));
        }
        char_pos += 1;
    }
    if let Some((byte_start, char_start)) = run {
        tokens.push(make_token(source, byte_start, source.len(), char_start, char_pos));
    }

    debug_assert!(
        offsets_are_monotonic(&tokens),
        "tokenization offset contract violated"
    );
    tokens
}

fn make_token(
    source: &str,
    byte_start: usize,
    byte_end: usize,
    text_start: usize,
    text_end: usize,
) -> OriginalToken {
    let text = &source[byte_start..byte_end];
    OriginalToken {
        text: text.to_string(),
        norm_form: normalize_for_matching(text),
        text_start,
        text_end,
        byte_start,
        byte_end,
    }
}

fn offsets_are_monotonic(tokens: &[OriginalToken]) -> bool {
    tokens.iter().all(|t| t.text_start < t.text_end && t.byte_start < t.byte_end)
        && tokens
            .windows(2)
            .all(|w| w[0].text_end < w[1].text_start && w[0].byte_end < w[1].byte_start)
}

/// Comparison-only form of a word.
///
/// Strips diacritics, niqqud, cantillation and Greek accents, folds case and
/// drops punctuation. Never used for output text.
pub fn normalize_for_matching(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|&c| !is_combining_mark(c) && c != HEBREW_MAQAF)
        .collect();
    let folded: String = stripped
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    folded.trim().to_string()
}
