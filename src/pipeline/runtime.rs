use crate::config::AlignerConfig;
use crate::pipeline::traits::{
    AudioDurationProvider, SpeechTimestampProvider, TimestampEstimator, Tokenizer, WordMatcher,
};
use crate::types::{
    match_ratio, AlignmentInput, AlignmentMethod, AlignmentOutput, AlignmentRecord,
    AlignmentStats, AudioClip, Language, OriginalToken, TranscribedToken,
};

pub struct ForcedAligner {
    config: AlignerConfig,
    tokenizer: Box<dyn Tokenizer>,
    word_matcher: Box<dyn WordMatcher>,
    estimator: Box<dyn TimestampEstimator>,
    duration_provider: Box<dyn AudioDurationProvider>,
}

pub(crate) struct ForcedAlignerParts {
    pub config: AlignerConfig,
    pub tokenizer: Box<dyn Tokenizer>,
    pub word_matcher: Box<dyn WordMatcher>,
    pub estimator: Box<dyn TimestampEstimator>,
    pub duration_provider: Box<dyn AudioDurationProvider>,
}

/// Generated audio plus the text it was synthesized from.
#[derive(Debug, Clone, Copy)]
pub struct AudioAlignmentRequest<'a> {
    pub audio: &'a AudioClip,
    pub original_text: &'a str,
    pub language: Language,
}

impl ForcedAligner {
    pub(crate) fn from_parts(parts: ForcedAlignerParts) -> Self {
        Self {
            config: parts.config,
            tokenizer: parts.tokenizer,
            word_matcher: parts.word_matcher,
            estimator: parts.estimator,
            duration_provider: parts.duration_provider,
        }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Assign a timestamp span to every word of `input.original_text`.
    ///
    /// Never fails: noisy or missing transcripts degrade to estimated spans
    /// (when the audio duration is known) or to untimed records.
    pub fn align(&self, input: &AlignmentInput) -> AlignmentOutput {
        let tokens = self.tokenizer.tokenize(&input.original_text);
        if tokens.is_empty() {
            return AlignmentOutput::empty();
        }

        let transcript = sanitize_transcript(&input.transcript);
        let matches = self
            .word_matcher
            .match_words(&tokens, &transcript, &self.config);
        if matches.len() != tokens.len() {
            tracing::warn!(
                slots = matches.len(),
                total = tokens.len(),
                "word matcher returned the wrong number of slots; discarding alignment"
            );
            return AlignmentOutput::empty();
        }

        let matched = matches.iter().filter(|m| m.is_some()).count();
        let ratio = match_ratio(matched, tokens.len());
        let duration = input.audio_duration_secs;

        if ratio < self.config.quality_floor && duration.is_finite() && duration > 0.0 {
            if let Some(output) = self.estimate(&tokens, duration, matched) {
                tracing::warn!(
                    matched,
                    total = tokens.len(),
                    match_ratio = format!("{ratio:.3}"),
                    quality_floor = self.config.quality_floor,
                    audio_duration_secs = duration,
                    "alignment below quality floor; using estimated timestamps"
                );
                return output;
            }
        }

        let records: Vec<AlignmentRecord> = tokens
            .iter()
            .zip(&matches)
            .map(|(token, m)| match m {
                Some(m) => AlignmentRecord::timed(token, m.start, m.end, m.confidence),
                None => AlignmentRecord::unmatched(token),
            })
            .collect();
        let stats = AlignmentStats::from_records(&records, AlignmentMethod::Anchored);
        tracing::info!(
            total = stats.total_words,
            matched = stats.matched_words,
            match_ratio = format!("{:.3}", stats.match_ratio),
            "alignment complete"
        );
        AlignmentOutput { records, stats }
    }

    /// Transcribe `request.audio` with `provider` and align the result.
    ///
    /// Provider and duration failures are logged and treated as an empty
    /// transcript and an unknown duration respectively.
    pub fn align_audio(
        &self,
        request: &AudioAlignmentRequest<'_>,
        provider: &dyn SpeechTimestampProvider,
    ) -> AlignmentOutput {
        let audio_duration_secs = self
            .duration_provider
            .duration_secs(request.audio)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "audio duration unavailable");
                0.0
            });

        let transcript = provider
            .transcribe(request.audio, request.language)
            .unwrap_or_else(|err| {
                tracing::warn!(
                    error = %err,
                    language = request.language.code(),
                    "speech timestamp provider failed; aligning without transcript"
                );
                Vec::new()
            });

        self.align(&AlignmentInput {
            original_text: request.original_text.to_string(),
            transcript,
            audio_duration_secs,
        })
    }

    /// Estimated records for every token. Stats keep the anchor pass counts so
    /// `match_ratio` still reports how little of the transcript lined up.
    fn estimate(
        &self,
        tokens: &[OriginalToken],
        duration: f64,
        anchored: usize,
    ) -> Option<AlignmentOutput> {
        let spans = self.estimator.estimate(tokens, duration);
        if spans.len() != tokens.len() {
            return None;
        }
        let records: Vec<AlignmentRecord> = tokens
            .iter()
            .zip(spans)
            .map(|(token, span)| {
                AlignmentRecord::timed(token, span.start, span.end, self.config.fallback_confidence)
            })
            .collect();
        let stats = AlignmentStats {
            total_words: records.len(),
            matched_words: anchored,
            match_ratio: match_ratio(anchored, records.len()),
            method: AlignmentMethod::Estimated,
        };
        Some(AlignmentOutput { records, stats })
    }
}

/// Drop or repair transcript entries that would break record invariants.
fn sanitize_transcript(transcript: &[TranscribedToken]) -> Vec<TranscribedToken> {
    let mut cleaned = Vec::with_capacity(transcript.len());
    for (index, token) in transcript.iter().enumerate() {
        if !token.start.is_finite() || token.start < 0.0 {
            tracing::warn!(
                index,
                word = token.text.as_str(),
                start = token.start,
                "dropping transcript word with invalid start"
            );
            continue;
        }
        let mut token = token.clone();
        if !token.end.is_finite() || token.end < token.start {
            token.end = token.start;
        }
        token.probability = if token.probability.is_finite() {
            token.probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        cleaned.push(token);
    }
    cleaned
}
