use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::AlignerConfig;
use crate::types::{AlignmentMethod, AlignmentOutput, AlignmentRecord, AlignmentStats};

const SCHEMA_VERSION: u32 = 1;
const LOW_CONF_THRESHOLD: f64 = 0.5;

/// Body returned to the synthesis endpoint's callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResponse {
    pub word_timestamps: Vec<AlignmentRecord>,
    pub alignment_stats: AlignmentStats,
    pub audio_duration: f64,
}

impl AlignmentResponse {
    pub fn new(output: AlignmentOutput, audio_duration: f64) -> Self {
        Self {
            word_timestamps: output.records,
            alignment_stats: output.stats,
            audio_duration,
        }
    }
}

/// One alignment job of a batch run.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCase {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub transcript: Vec<crate::types::TranscribedToken>,
    #[serde(default)]
    pub audio_duration: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub case_count: usize,
    pub config: AlignerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub stats: AlignmentStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceSummary>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceSummary {
    pub mean: f64,
    pub min: f64,
    pub low_conf_ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    pub case_count: usize,
    pub total_words: usize,
    pub matched_words: usize,
    pub mean_match_ratio: f64,
    pub anchored_case_count: usize,
    pub estimated_case_count: usize,
    pub empty_case_count: usize,
}

impl Report {
    pub fn new(cases: Vec<CaseReport>, config: &AlignerConfig) -> Self {
        let aggregates = aggregate_reports(&cases);
        Self {
            schema_version: SCHEMA_VERSION,
            meta: Meta {
                generated_at: Utc::now().to_rfc3339(),
                case_count: cases.len(),
                config: config.clone(),
            },
            cases,
            aggregates,
        }
    }
}

pub fn compute_case_report(id: &str, output: &AlignmentOutput) -> CaseReport {
    let timed: Vec<f64> = output
        .records
        .iter()
        .filter(|r| r.is_timed())
        .map(|r| r.confidence)
        .collect();
    let confidence = if timed.is_empty() {
        None
    } else {
        let low = timed.iter().filter(|&&c| c < LOW_CONF_THRESHOLD).count();
        Some(ConfidenceSummary {
            mean: timed.iter().sum::<f64>() / timed.len() as f64,
            min: timed.iter().copied().fold(f64::INFINITY, f64::min),
            low_conf_ratio: low as f64 / timed.len() as f64,
        })
    };

    let mut notes = Vec::new();
    match output.stats.method {
        AlignmentMethod::Estimated => notes.push(format!(
            "timestamps estimated from audio duration ({} of {} words anchored)",
            output.stats.matched_words, output.stats.total_words
        )),
        AlignmentMethod::Empty => notes.push("no alignable words".to_string()),
        AlignmentMethod::Anchored => {
            let unmatched = output.stats.total_words.saturating_sub(output.stats.matched_words);
            if unmatched > 0 {
                notes.push(format!("{unmatched} words without timestamps"));
            }
        }
    }

    CaseReport {
        id: id.to_string(),
        stats: output.stats.clone(),
        confidence,
        notes,
    }
}

pub fn aggregate_reports(cases: &[CaseReport]) -> AggregateReport {
    if cases.is_empty() {
        return AggregateReport::default();
    }
    let count_method =
        |method: AlignmentMethod| cases.iter().filter(|c| c.stats.method == method).count();
    AggregateReport {
        case_count: cases.len(),
        total_words: cases.iter().map(|c| c.stats.total_words).sum(),
        matched_words: cases.iter().map(|c| c.stats.matched_words).sum(),
        mean_match_ratio: cases.iter().map(|c| c.stats.match_ratio).sum::<f64>()
            / cases.len() as f64,
        anchored_case_count: count_method(AlignmentMethod::Anchored),
        estimated_case_count: count_method(AlignmentMethod::Estimated),
        empty_case_count: count_method(AlignmentMethod::Empty),
    }
}
