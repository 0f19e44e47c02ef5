use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use word_align_rs::audio::{probe_duration_secs, read_audio_mono};
use word_align_rs::{
    compute_case_report, to_srt, to_webvtt, AlignerConfig, AlignmentInput, AlignmentOutput,
    AlignmentResponse, AudioAlignmentRequest, ForcedAligner, ForcedAlignerBuilder, Language,
    Report, ReportCase, StaticTranscriptProvider, TranscribedToken,
};

#[path = "align_report/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Srt,
    #[value(name = "vtt")]
    WebVtt,
}

#[derive(Debug, Parser)]
#[command(name = "align_report")]
#[command(about = "Assign word timestamps to source text from a speech-recognition transcript")]
struct Args {
    /// Source text to align.
    #[arg(long, env = "ALIGN_REPORT_TEXT", conflicts_with = "text_file")]
    text: Option<String>,
    #[arg(long, env = "ALIGN_REPORT_TEXT_FILE")]
    text_file: Option<PathBuf>,
    /// JSON array of {"text","start","end","probability"} words.
    #[arg(long, env = "ALIGN_REPORT_TRANSCRIPT")]
    transcript: Option<PathBuf>,
    /// WAV or FLAC file the transcript was produced from.
    #[arg(long, env = "ALIGN_REPORT_AUDIO")]
    audio: Option<PathBuf>,
    /// Audio duration in seconds when no audio file is given.
    #[arg(long, env = "ALIGN_REPORT_DURATION", conflicts_with = "audio")]
    duration: Option<f64>,
    #[arg(long, env = "ALIGN_REPORT_LANGUAGE", default_value = "he", value_parser = parse_language)]
    language: Language,
    /// Aligner config JSON; defaults apply to missing fields.
    #[arg(long, env = "ALIGN_REPORT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(
        long = "format",
        env = "ALIGN_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    /// Output file; stdout when omitted.
    #[arg(long, env = "ALIGN_REPORT_OUT")]
    out: Option<PathBuf>,
    /// JSONL file of {"id","text","transcript","audio_duration"} cases; writes a batch report.
    #[arg(long, env = "ALIGN_REPORT_CASES_FILE")]
    cases_file: Option<PathBuf>,
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_align_rs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run() {
        eprintln!("align_report: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let aligner = build_aligner(args.config.as_deref())?;

    if let Some(cases_file) = args.cases_file.as_ref() {
        return run_batch(&aligner, cases_file, args.out.as_deref());
    }

    let text = load_text(&args)?;
    let transcript = match args.transcript.as_deref() {
        Some(path) => load_transcript(path)?,
        None => Vec::new(),
    };

    let (output, audio_duration) = match args.audio.as_ref() {
        Some(audio_path) => {
            require_path_exists(audio_path, "Missing audio file.")?;
            let clip = read_audio_mono(audio_path).map_err(|err| err.to_string())?;
            let provider = StaticTranscriptProvider::new(transcript);
            let request = AudioAlignmentRequest {
                audio: &clip,
                original_text: &text,
                language: args.language,
            };
            (aligner.align_audio(&request, &provider), clip.duration_secs())
        }
        None => {
            let duration = args.duration.unwrap_or(0.0);
            let input = AlignmentInput {
                original_text: text,
                transcript,
                audio_duration_secs: duration,
            };
            (aligner.align(&input), duration)
        }
    };

    write_single(&output, audio_duration, args.output_format, args.out.as_deref())
}

fn build_aligner(config_path: Option<&Path>) -> Result<ForcedAligner, String> {
    let mut builder = ForcedAlignerBuilder::new(AlignerConfig::default());
    if let Some(path) = config_path {
        require_path_exists(path, "Missing aligner config file.")?;
        builder = builder.with_config_path(path);
    }
    builder
        .build()
        .map_err(|err| format!("Failed to build aligner: {err}"))
}

fn load_text(args: &Args) -> Result<String, String> {
    match (&args.text, &args.text_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read text file '{}': {err}", path.display())),
        (None, None) => Err("Either --text or --text-file is required.".to_string()),
    }
}

fn load_transcript(path: &Path) -> Result<Vec<TranscribedToken>, String> {
    require_path_exists(path, "Missing transcript file.")?;
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read transcript '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Invalid transcript '{}': {err}", path.display()))
}

fn write_single(
    output: &AlignmentOutput,
    audio_duration: f64,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), String> {
    let body = match format {
        OutputFormat::Json => {
            let response = AlignmentResponse::new(output.clone(), audio_duration);
            if let Some(path) = out {
                return json_report_formatter::write_json(path, &response);
            }
            serde_json::to_string_pretty(&response)
                .map_err(|err| format!("Failed to serialize alignment JSON: {err}"))?
                + "\n"
        }
        OutputFormat::Srt => to_srt(&output.records),
        OutputFormat::WebVtt => to_webvtt(&output.records),
    };
    match out {
        Some(path) => json_report_formatter::write_text(path, &body),
        None => {
            print!("{body}");
            Ok(())
        }
    }
}

fn run_batch(aligner: &ForcedAligner, cases_file: &Path, out: Option<&Path>) -> Result<(), String> {
    let cases = load_cases(cases_file)?;
    if cases.is_empty() {
        return Err(format!("No cases found in '{}'.", cases_file.display()));
    }

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(cases.len());
    for case in cases {
        progress.set_message(case.id.clone());
        let output = aligner.align(&AlignmentInput {
            original_text: case.text,
            transcript: case.transcript,
            audio_duration_secs: case.audio_duration,
        });
        reports.push(compute_case_report(&case.id, &output));
        progress.inc(1);
    }
    progress.finish_with_message("done");

    let report = Report::new(reports, aligner.config());
    match out {
        Some(path) => json_report_formatter::write_json(path, &report),
        None => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
            println!("{json}");
            Ok(())
        }
    }
}

fn load_cases(path: &Path) -> Result<Vec<ReportCase>, String> {
    require_path_exists(path, "Missing cases file.")?;
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut cases = Vec::new();
    for (line_no, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut case: ReportCase = serde_json::from_str(line).map_err(|err| {
            format!("{}:{}: invalid case: {err}", path.display(), line_no + 1)
        })?;
        if case.audio_duration <= 0.0 {
            case.audio_duration = sibling_audio_duration(base_dir, &case.id);
        }
        cases.push(case);
    }
    Ok(cases)
}

/// Duration of `<id>.wav` or `<id>.flac` next to the cases file, 0 when absent.
fn sibling_audio_duration(base_dir: &Path, id: &str) -> f64 {
    ["wav", "flac"]
        .iter()
        .map(|ext| base_dir.join(format!("{id}.{ext}")))
        .find(|candidate| candidate.exists())
        .and_then(|candidate| probe_duration_secs(&candidate).ok())
        .unwrap_or(0.0)
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("{message} Path: {}", path.display()))
    }
}
