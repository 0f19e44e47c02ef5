use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use word_align_rs::{
    AlignerConfig, AlignmentInput, AlignmentRecord, ForcedAlignerBuilder, Language,
    TranscribedToken,
};

const DEFAULT_DELTA_MS: f64 = 1.0;
const SUITE_NAME: &str = "alignment_reference_matches_within_delta";

#[derive(Debug, Deserialize)]
struct ReferenceCase {
    id: String,
    language: Language,
    text: String,
    audio_duration: f64,
    transcript: Vec<TranscribedToken>,
    expected: ExpectedAlignment,
}

#[derive(Debug, Deserialize)]
struct ExpectedAlignment {
    method: String,
    matched_words: usize,
    words: Vec<ExpectedWord>,
}

#[derive(Debug, Deserialize)]
struct ExpectedWord {
    text: String,
    start: f64,
    end: f64,
    confidence: f64,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let delta_ms = env_f64("WORD_ALIGN_IT_DELTA_MS", DEFAULT_DELTA_MS);

    let cases = match load_reference_cases(&repo_root.join("test-data/alignments")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(
            &args,
            "No reference cases found under test-data/alignments.".to_string(),
        );
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::{}::{}", case.language.code(), case.id);
            Trial::test(test_name, move || {
                run_reference_case(&case, delta_ms).map_err(Failed::from)
            })
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_reference_case(case: &ReferenceCase, delta_ms: f64) -> Result<(), String> {
    let aligner = ForcedAlignerBuilder::new(AlignerConfig::default())
        .build()
        .map_err(|err| format!("{}: failed to build aligner: {err}", case.id))?;
    let output = aligner.align(&AlignmentInput {
        original_text: case.text.clone(),
        transcript: case.transcript.clone(),
        audio_duration_secs: case.audio_duration,
    });

    if output.stats.method.as_str() != case.expected.method {
        return Err(format!(
            "{}: method mismatch (expected {}, got {})",
            case.id,
            case.expected.method,
            output.stats.method.as_str()
        ));
    }
    if output.stats.matched_words != case.expected.matched_words {
        return Err(format!(
            "{}: matched_words mismatch (expected {}, got {})",
            case.id, case.expected.matched_words, output.stats.matched_words
        ));
    }
    compare_records(case, &output.records, delta_ms)
}

fn compare_records(
    case: &ReferenceCase,
    observed: &[AlignmentRecord],
    delta_ms: f64,
) -> Result<(), String> {
    let expected = &case.expected.words;
    if observed.len() != expected.len() {
        return Err(format!(
            "{}: word count mismatch (expected {}, got {})",
            case.id,
            expected.len(),
            observed.len()
        ));
    }

    let delta_secs = delta_ms / 1000.0;
    for (idx, (want, got)) in expected.iter().zip(observed).enumerate() {
        if want.text != got.text {
            return Err(format!(
                "{}: word mismatch at index {idx} (expected '{}', got '{}')",
                case.id, want.text, got.text
            ));
        }
        let start_diff = (got.start - want.start).abs();
        let end_diff = (got.end - want.end).abs();
        if start_diff > delta_secs || end_diff > delta_secs {
            return Err(format!(
                "{}: #{idx} '{}' span ({:.6}, {:.6}) differs from ({:.6}, {:.6}) by more than {delta_ms}ms",
                case.id, want.text, got.start, got.end, want.start, want.end
            ));
        }
        if (got.confidence - want.confidence).abs() > 1e-4 {
            return Err(format!(
                "{}: #{idx} '{}' confidence {:.6} (expected {:.6})",
                case.id, want.text, got.confidence, want.confidence
            ));
        }
        let slice: String = case
            .text
            .chars()
            .skip(got.text_start)
            .take(got.text_end - got.text_start)
            .collect();
        if slice != got.text {
            return Err(format!(
                "{}: #{idx} offsets [{}, {}) select '{slice}', not '{}'",
                case.id, got.text_start, got.text_end, got.text
            ));
        }
    }
    Ok(())
}

fn load_reference_cases(dir: &Path) -> Result<Vec<ReferenceCase>, String> {
    require_path_exists(dir, "Missing alignment fixture directory.")?;
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|err| format!("Failed to list fixtures in '{}': {err}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut cases = Vec::new();
    for path in paths {
        let file = File::open(&path)
            .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
        let subset: Vec<ReferenceCase> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))?;
        cases.extend(subset);
    }
    Ok(cases)
}

fn env_f64(name: &str, default: f64) -> f64 {
    match env::var(name) {
        Ok(value) => value.trim().parse::<f64>().unwrap_or_else(|err| {
            panic!(
                "Invalid value for {}='{}' (expected f64): {}",
                name, value, err
            )
        }),
        Err(_) => default,
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{} Missing path: {}", message, path.display()))
}
