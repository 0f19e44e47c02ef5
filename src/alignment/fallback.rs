use crate::types::{EstimatedSpan, OriginalToken};

/// Spread `audio_duration_secs` over the tokens in proportion to their length.
///
/// Intervals are laid end to end from 0.0 and the last one ends exactly at
/// the audio duration. Returns nothing when there is no time to distribute.
pub fn estimate_proportional_spans(
    tokens: &[OriginalToken],
    audio_duration_secs: f64,
) -> Vec<EstimatedSpan> {
    if tokens.is_empty() || !audio_duration_secs.is_finite() || audio_duration_secs <= 0.0 {
        return Vec::new();
    }

    let lengths: Vec<usize> = tokens.iter().map(|t| t.text.chars().count()).collect();
    let total_chars: usize = lengths.iter().sum();
    if total_chars == 0 {
        return Vec::new();
    }

    let mut spans = Vec::with_capacity(tokens.len());
    let mut consumed_chars = 0usize;
    let mut start = 0.0f64;
    for (idx, len) in lengths.iter().copied().enumerate() {
        consumed_chars += len;
        let end = if idx + 1 == lengths.len() {
            audio_duration_secs
        } else {
            consumed_chars as f64 / total_chars as f64 * audio_duration_secs
        };
        spans.push(EstimatedSpan { start, end });
        start = end;
    }
    spans
}
