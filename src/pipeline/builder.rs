use std::path::PathBuf;

use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{
    AnchorWordMatcher, ProportionalEstimator, SampleClockDuration, WhitespaceTokenizer,
};
use crate::pipeline::runtime::{ForcedAligner, ForcedAlignerParts};
use crate::pipeline::traits::{AudioDurationProvider, TimestampEstimator, Tokenizer, WordMatcher};

pub struct ForcedAlignerBuilder {
    config: AlignerConfig,
    config_path: Option<PathBuf>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    word_matcher: Option<Box<dyn WordMatcher>>,
    estimator: Option<Box<dyn TimestampEstimator>>,
    duration_provider: Option<Box<dyn AudioDurationProvider>>,
}

impl ForcedAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            config_path: None,
            tokenizer: None,
            word_matcher: None,
            estimator: None,
            duration_provider: None,
        }
    }

    /// Load the config from a JSON file at build time, replacing the one given to `new`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_word_matcher(mut self, word_matcher: Box<dyn WordMatcher>) -> Self {
        self.word_matcher = Some(word_matcher);
        self
    }

    pub fn with_estimator(mut self, estimator: Box<dyn TimestampEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn with_duration_provider(
        mut self,
        duration_provider: Box<dyn AudioDurationProvider>,
    ) -> Self {
        self.duration_provider = Some(duration_provider);
        self
    }

    pub fn build(self) -> Result<ForcedAligner, AlignmentError> {
        let config = match self.config_path.as_deref() {
            Some(path) => AlignerConfig::load(path)?,
            None => {
                self.config.validate()?;
                self.config
            }
        };

        Ok(ForcedAligner::from_parts(ForcedAlignerParts {
            config,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WhitespaceTokenizer)),
            word_matcher: self
                .word_matcher
                .unwrap_or_else(|| Box::new(AnchorWordMatcher)),
            estimator: self
                .estimator
                .unwrap_or_else(|| Box::new(ProportionalEstimator)),
            duration_provider: self
                .duration_provider
                .unwrap_or_else(|| Box::new(SampleClockDuration)),
        }))
    }
}
