use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// Tunables for anchor matching and the duration fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Number of upcoming transcript tokens considered per source token.
    pub lookahead: usize,
    /// Score subtracted per transcript token skipped over to reach a candidate.
    pub position_penalty: f64,
    /// Minimum raw similarity for a fuzzy candidate to be considered.
    pub match_threshold: f64,
    /// Matched fraction below which estimated timestamps replace the anchors.
    pub quality_floor: f64,
    /// Confidence stamped on every estimated record.
    pub fallback_confidence: f64,
}

impl AlignerConfig {
    pub const DEFAULT_LOOKAHEAD: usize = 10;
    pub const DEFAULT_POSITION_PENALTY: f64 = 0.02;
    pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.55;
    pub const DEFAULT_QUALITY_FLOOR: f64 = 0.5;
    pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.3;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| AlignmentError::json("parse aligner config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.lookahead == 0 {
            return Err(AlignmentError::invalid_input("lookahead must be >= 1"));
        }
        if !self.position_penalty.is_finite() || self.position_penalty < 0.0 {
            return Err(AlignmentError::invalid_input(format!(
                "position_penalty must be a non-negative number, got {}",
                self.position_penalty
            )));
        }
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("quality_floor", self.quality_floor),
            ("fallback_confidence", self.fallback_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AlignmentError::invalid_input(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            lookahead: Self::DEFAULT_LOOKAHEAD,
            position_penalty: Self::DEFAULT_POSITION_PENALTY,
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
            quality_floor: Self::DEFAULT_QUALITY_FLOOR,
            fallback_confidence: Self::DEFAULT_FALLBACK_CONFIDENCE,
        }
    }
}
