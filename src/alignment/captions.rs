use std::fmt::Write;

use crate::types::AlignmentRecord;

/// Render timed records as SubRip cues, one word per cue.
///
/// Records without timestamps are left out and cues are numbered from 1.
pub fn to_srt(records: &[AlignmentRecord]) -> String {
    let mut out = String::new();
    for (cue, record) in records.iter().filter(|r| r.is_timed()).enumerate() {
        if cue > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{}\n{} --> {}\n{}",
            cue + 1,
            format_timestamp(record.start, ','),
            format_timestamp(record.end, ','),
            record.text
        );
    }
    out
}

/// Render timed records as a WebVTT document.
pub fn to_webvtt(records: &[AlignmentRecord]) -> String {
    let mut out = String::from("WEBVTT\n");
    for (cue, record) in records.iter().filter(|r| r.is_timed()).enumerate() {
        let _ = write!(
            out,
            "\n{}\n{} --> {}\n{}\n",
            cue + 1,
            format_timestamp(record.start, '.'),
            format_timestamp(record.end, '.'),
            record.text
        );
    }
    out
}

/// `HH:MM:SS<sep>mmm`, milliseconds truncated.
fn format_timestamp(seconds: f64, millis_sep: char) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0 + 1e-6).floor() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}{millis_sep}{millis:03}")
}
