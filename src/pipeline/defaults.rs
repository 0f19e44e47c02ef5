use crate::alignment::anchor::match_anchors;
use crate::alignment::fallback::estimate_proportional_spans;
use crate::alignment::tokenization::tokenize_source_text;
use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::traits::{AudioDurationProvider, TimestampEstimator, Tokenizer, WordMatcher};
use crate::types::{AudioClip, EstimatedSpan, OriginalToken, TokenMatch, TranscribedToken};

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, source_text: &str) -> Vec<OriginalToken> {
        tokenize_source_text(source_text)
    }
}

pub struct AnchorWordMatcher;

impl WordMatcher for AnchorWordMatcher {
    fn match_words(
        &self,
        original: &[OriginalToken],
        transcript: &[TranscribedToken],
        config: &AlignerConfig,
    ) -> Vec<Option<TokenMatch>> {
        match_anchors(original, transcript, config)
    }
}

pub struct ProportionalEstimator;

impl TimestampEstimator for ProportionalEstimator {
    fn estimate(&self, tokens: &[OriginalToken], audio_duration_secs: f64) -> Vec<EstimatedSpan> {
        estimate_proportional_spans(tokens, audio_duration_secs)
    }
}

/// Duration from sample count and rate.
pub struct SampleClockDuration;

impl AudioDurationProvider for SampleClockDuration {
    fn duration_secs(&self, audio: &AudioClip) -> Result<f64, AlignmentError> {
        if audio.sample_rate_hz == 0 {
            return Err(AlignmentError::invalid_input(
                "audio clip has a zero sample rate",
            ));
        }
        Ok(audio.duration_secs())
    }
}
