use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::types::{
    AudioClip, EstimatedSpan, Language, OriginalToken, TokenMatch, TranscribedToken,
};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, source_text: &str) -> Vec<OriginalToken>;
}

pub trait WordMatcher: Send + Sync {
    /// One entry per source token, `None` when no anchor was found.
    fn match_words(
        &self,
        original: &[OriginalToken],
        transcript: &[TranscribedToken],
        config: &AlignerConfig,
    ) -> Vec<Option<TokenMatch>>;
}

pub trait TimestampEstimator: Send + Sync {
    /// One span per token, or nothing when no estimate is possible.
    fn estimate(&self, tokens: &[OriginalToken], audio_duration_secs: f64) -> Vec<EstimatedSpan>;
}

/// Speech recognizer that reports words with timestamps, in time order.
pub trait SpeechTimestampProvider: Send + Sync {
    fn transcribe(
        &self,
        audio: &AudioClip,
        language: Language,
    ) -> Result<Vec<TranscribedToken>, AlignmentError>;
}

pub trait AudioDurationProvider: Send + Sync {
    fn duration_secs(&self, audio: &AudioClip) -> Result<f64, AlignmentError>;
}
