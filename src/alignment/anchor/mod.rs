use crate::alignment::similarity::ratio;
use crate::config::AlignerConfig;
use crate::types::{OriginalToken, TokenMatch, TranscribedToken};


/// Floor for a matched word's confidence; 0.0 is reserved for unmatched words.
pub const MIN_MATCHED_CONFIDENCE: f64 = 0.01;

/// Winning transcript candidate inside one lookahead window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    index: usize,
    score: f64,
}

/// Forward-only anchor matching of source tokens against a noisy transcript.
///
/// The transcript cursor only ever advances, so every transcript token is
/// claimed by at most one source token and anchors come out in time order.
/// Returns one entry per source token; `None` marks a token without an anchor.
pub fn match_anchors(
    original: &[OriginalToken],
    transcript: &[TranscribedToken],
    config: &AlignerConfig,
) -> Vec<Option<TokenMatch>> {
    let mut matches = Vec::with_capacity(original.len());
    let mut t_cursor = 0usize;

    for (word_index, token) in original.iter().enumerate() {
        if token.norm_form.is_empty() {
            tracing::debug!(
                word_index,
                word = token.text.as_str(),
                "anchor: skipping token without letters"
            );
            matches.push(None);
            continue;
        }

        let window_end = transcript.len().min(t_cursor.saturating_add(config.lookahead));
        let Some(best) = best_candidate(token, transcript, t_cursor, window_end, config) else {
            tracing::debug!(
                word_index,
                word = token.text.as_str(),
                norm = token.norm_form.as_str(),
                t_cursor,
                window_end,
                "anchor: no candidate above threshold"
            );
            matches.push(None);
            continue;
        };

        let anchor = &transcript[best.index];
        tracing::debug!(
            word_index,
            word = token.text.as_str(),
            heard = anchor.text.as_str(),
            transcript_index = best.index,
            skipped = best.index - t_cursor,
            score = format!("{:.3}", best.score),
            "anchor: matched"
        );
        matches.push(Some(TokenMatch {
            transcript_index: best.index,
            start: anchor.start,
            end: anchor.end,
            confidence: best.score.clamp(MIN_MATCHED_CONFIDENCE, 1.0),
        }));
        t_cursor = best.index + 1;
    }

    matches
}

/// Scan `transcript[t_cursor..window_end]` for the best anchor of `token`.
///
/// An exact normalized match wins immediately. Otherwise the highest
/// distance-penalized score among candidates whose raw score clears the
/// threshold is kept; ties go to the nearer candidate.
fn best_candidate(
    token: &OriginalToken,
    transcript: &[TranscribedToken],
    t_cursor: usize,
    window_end: usize,
    config: &AlignerConfig,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for index in t_cursor..window_end {
        let heard = &transcript[index];
        if heard.norm_form.is_empty() {
            continue;
        }
        if heard.norm_form == token.norm_form {
            return Some(Candidate { index, score: 1.0 });
        }
        let score = ratio(&token.norm_form, &heard.norm_form);
        if score < config.match_threshold {
            continue;
        }
        let distance = (index - t_cursor) as f64;
        let adjusted = score - distance * config.position_penalty;
        if best.map_or(true, |b| adjusted > b.score) {
            best = Some(Candidate {
                index,
                score: adjusted,
            });
        }
    }
    best
}
