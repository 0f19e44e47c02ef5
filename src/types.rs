use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alignment::tokenization::normalize_for_matching;
use crate::error::AlignmentError;

/// Timestamp carried by records that received no timing evidence.
pub const UNMATCHED_TIMESTAMP: f64 = -1.0;

/// Whitespace-delimited token of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalToken {
    /// Exact slice of the source text.
    pub text: String,
    /// Comparison-only form, see [`normalize_for_matching`].
    pub norm_form: String,
    /// Character (Unicode scalar) offsets into the source: `[text_start, text_end)`.
    pub text_start: usize,
    pub text_end: usize,
    /// UTF-8 byte offsets into the source: `source[byte_start..byte_end] == text`.
    pub byte_start: usize,
    pub byte_end: usize,
}

/// Word reported by the speech-recognition pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TranscribedTokenWire")]
pub struct TranscribedToken {
    pub text: String,
    #[serde(skip_serializing)]
    pub norm_form: String,
    /// Seconds from the start of the audio.
    pub start: f64,
    pub end: f64,
    pub probability: f64,
}

impl TranscribedToken {
    pub fn new(text: impl Into<String>, start: f64, end: f64, probability: f64) -> Self {
        let text = text.into();
        let norm_form = normalize_for_matching(&text);
        Self {
            text,
            norm_form,
            start,
            end,
            probability,
        }
    }
}

#[derive(Deserialize)]
struct TranscribedTokenWire {
    text: String,
    start: f64,
    end: f64,
    #[serde(default = "default_probability")]
    probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

impl From<TranscribedTokenWire> for TranscribedToken {
    fn from(wire: TranscribedTokenWire) -> Self {
        Self::new(wire.text, wire.start, wire.end, wire.probability)
    }
}

/// Anchor found for one source token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenMatch {
    /// Index into the transcript the anchor consumed.
    pub transcript_index: usize,
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

/// Estimated `[start, end)` interval produced without timing evidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedSpan {
    pub start: f64,
    pub end: f64,
}

/// One output entry per source token, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentRecord {
    pub text: String,
    /// Seconds, or [`UNMATCHED_TIMESTAMP`] when no timing is available.
    pub start: f64,
    pub end: f64,
    /// Character offsets of `text` in the source text.
    pub text_start: usize,
    pub text_end: usize,
    /// `0.0` no evidence, `1.0` exact normalized match.
    pub confidence: f64,
}

impl AlignmentRecord {
    pub(crate) fn unmatched(token: &OriginalToken) -> Self {
        Self {
            text: token.text.clone(),
            start: UNMATCHED_TIMESTAMP,
            end: UNMATCHED_TIMESTAMP,
            text_start: token.text_start,
            text_end: token.text_end,
            confidence: 0.0,
        }
    }

    pub(crate) fn timed(token: &OriginalToken, start: f64, end: f64, confidence: f64) -> Self {
        Self {
            text: token.text.clone(),
            start,
            end,
            text_start: token.text_start,
            text_end: token.text_end,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn is_timed(&self) -> bool {
        self.start >= 0.0 && self.end >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMethod {
    /// Timestamps come from matched transcript anchors.
    Anchored,
    /// Timestamps were distributed over the audio duration.
    Estimated,
    /// Nothing to align.
    Empty,
}

impl AlignmentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anchored => "anchored",
            Self::Estimated => "estimated",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub total_words: usize,
    pub matched_words: usize,
    pub match_ratio: f64,
    pub method: AlignmentMethod,
}

impl AlignmentStats {
    pub fn empty() -> Self {
        Self {
            total_words: 0,
            matched_words: 0,
            match_ratio: 0.0,
            method: AlignmentMethod::Empty,
        }
    }

    pub(crate) fn from_records(records: &[AlignmentRecord], method: AlignmentMethod) -> Self {
        let total_words = records.len();
        let matched_words = records.iter().filter(|r| r.is_timed()).count();
        Self {
            total_words,
            matched_words,
            match_ratio: match_ratio(matched_words, total_words),
            method,
        }
    }
}

pub(crate) fn match_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub original_text: String,
    pub transcript: Vec<TranscribedToken>,
    /// Total audio duration; `<= 0` disables the estimated fallback.
    pub audio_duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutput {
    pub records: Vec<AlignmentRecord>,
    pub stats: AlignmentStats,
}

impl AlignmentOutput {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            stats: AlignmentStats::empty(),
        }
    }
}

/// Mono waveform.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub sample_rate_hz: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }
}

/// Languages the synthesis service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Hebrew,
    Greek,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Hebrew, Language::Greek, Language::Portuguese];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Hebrew => "he",
            Self::Greek => "el",
            Self::Portuguese => "pt",
        }
    }

    pub fn iso639_3(self) -> &'static str {
        match self {
            Self::Hebrew => "heb",
            Self::Greek => "ell",
            Self::Portuguese => "por",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hebrew => "hebrew",
            Self::Greek => "greek",
            Self::Portuguese => "portuguese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| {
                wanted == lang.code() || wanted == lang.iso639_3() || wanted == lang.name()
            })
            .ok_or_else(|| {
                AlignmentError::invalid_input(format!(
                    "language '{s}' not supported, expected one of he, el, pt"
                ))
            })
    }
}

impl TryFrom<String> for Language {
    type Error = AlignmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}
