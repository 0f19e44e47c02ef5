use std::sync::{Mutex, OnceLock};

use crate::error::AlignmentError;
use crate::pipeline::traits::SpeechTimestampProvider;
use crate::types::{AudioClip, Language, TranscribedToken};

/// Provider that replays a transcript obtained elsewhere (a file, a cache).
#[derive(Debug, Clone, Default)]
pub struct StaticTranscriptProvider {
    transcript: Vec<TranscribedToken>,
}

impl StaticTranscriptProvider {
    pub fn new(transcript: Vec<TranscribedToken>) -> Self {
        Self { transcript }
    }

    pub fn from_json(json: &str) -> Result<Self, AlignmentError> {
        let transcript = serde_json::from_str(json)
            .map_err(|e| AlignmentError::json("parse transcript", e))?;
        Ok(Self { transcript })
    }
}

impl SpeechTimestampProvider for StaticTranscriptProvider {
    fn transcribe(
        &self,
        _audio: &AudioClip,
        _language: Language,
    ) -> Result<Vec<TranscribedToken>, AlignmentError> {
        Ok(self.transcript.clone())
    }
}

/// Owns a speech provider that is expensive to load and builds it on first use.
///
/// The handle is created by the caller and passed to every alignment call, so
/// loading and reuse stay outside the aligner. A failed load is reported to the
/// caller and attempted again on the next call.
pub struct LazySpeechProvider<P, F> {
    factory: F,
    provider: OnceLock<P>,
    init_lock: Mutex<()>,
}

impl<P, F> LazySpeechProvider<P, F>
where
    P: SpeechTimestampProvider,
    F: Fn() -> Result<P, AlignmentError> + Send + Sync,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            provider: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }

    fn get_or_init(&self) -> Result<&P, AlignmentError> {
        if let Some(provider) = self.provider.get() {
            return Ok(provider);
        }
        let _guard = self
            .init_lock
            .lock()
            .map_err(|e| AlignmentError::runtime("speech provider init lock", e))?;
        if let Some(provider) = self.provider.get() {
            return Ok(provider);
        }
        tracing::info!("loading speech timestamp provider");
        let provider = (self.factory)().inspect_err(|err| {
            tracing::warn!(error = %err, "speech timestamp provider failed to load");
        })?;
        Ok(self.provider.get_or_init(|| provider))
    }
}

impl<P, F> SpeechTimestampProvider for LazySpeechProvider<P, F>
where
    P: SpeechTimestampProvider,
    F: Fn() -> Result<P, AlignmentError> + Send + Sync,
{
    fn transcribe(
        &self,
        audio: &AudioClip,
        language: Language,
    ) -> Result<Vec<TranscribedToken>, AlignmentError> {
        self.get_or_init()?.transcribe(audio, language)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn clip() -> AudioClip {
        AudioClip {
            sample_rate_hz: 16_000,
            samples: vec![0.0; 160],
        }
    }

    #[test]
    fn static_provider_parses_json_transcript() {
        let provider = StaticTranscriptProvider::from_json(
            r#"[{"text": "alpha", "start": 0.0, "end": 0.5, "probability": 0.9}]"#,
        )
        .expect("valid transcript");
        let words = provider.transcribe(&clip(), Language::Greek).expect("transcribe");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].norm_form, "alpha");
        assert!(StaticTranscriptProvider::from_json("{").is_err());
    }

    #[test]
    fn lazy_provider_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let lazy = LazySpeechProvider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(StaticTranscriptProvider::new(vec![TranscribedToken::new(
                "alpha", 0.0, 0.5, 1.0,
            )]))
        });
        assert!(!lazy.is_initialized());
        for _ in 0..3 {
            let words = lazy.transcribe(&clip(), Language::Hebrew).expect("transcribe");
            assert_eq!(words.len(), 1);
        }
        assert!(lazy.is_initialized());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_provider_retries_after_failed_load() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let lazy = LazySpeechProvider::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AlignmentError::provider("load model", "weights missing"))
            } else {
                Ok(StaticTranscriptProvider::default())
            }
        });
        assert!(lazy.transcribe(&clip(), Language::Portuguese).is_err());
        assert!(!lazy.is_initialized());
        assert!(lazy.transcribe(&clip(), Language::Portuguese).is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
