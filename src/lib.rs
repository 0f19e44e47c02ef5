pub mod alignment;
pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::captions::{to_srt, to_webvtt};
pub use alignment::report::{
    aggregate_reports, compute_case_report, AlignmentResponse, CaseReport, Report, ReportCase,
};
pub use config::AlignerConfig;
pub use error::AlignmentError;
pub use pipeline::builder::ForcedAlignerBuilder;
pub use pipeline::provider::{LazySpeechProvider, StaticTranscriptProvider};
pub use pipeline::runtime::{AudioAlignmentRequest, ForcedAligner};
pub use pipeline::traits::{
    AudioDurationProvider, SpeechTimestampProvider, TimestampEstimator, Tokenizer, WordMatcher,
};
pub use types::{
    AlignmentInput, AlignmentMethod, AlignmentOutput, AlignmentRecord, AlignmentStats, AudioClip,
    Language, OriginalToken, TranscribedToken, UNMATCHED_TIMESTAMP,
};
