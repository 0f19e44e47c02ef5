use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use word_align_rs::alignment::tokenization::tokenize_source_text;
use word_align_rs::{
    AlignerConfig, AlignmentInput, AlignmentMethod, ForcedAligner, ForcedAlignerBuilder,
    TranscribedToken, UNMATCHED_TIMESTAMP,
};

const SEED: u64 = 42;
const ROUNDS: usize = 200;

const VOCABULARY: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "olá,", "coração", "tudo", "bem?", "Καλημέρα", "κόσμε!",
    "λόγος", "σας", "בְּרֵאשִׁית", "בָּרָא", "אֱלֹהִים", "שָׁלוֹם", "—", "...",
];

fn aligner() -> ForcedAligner {
    ForcedAlignerBuilder::new(AlignerConfig::default())
        .build()
        .expect("default aligner")
}

/// A transcript that loosely follows `words`: some dropped, some garbled, some inserted.
fn noisy_transcript(rng: &mut StdRng, words: &[&str]) -> Vec<TranscribedToken> {
    let mut heard = Vec::new();
    let mut clock = 0.0f64;
    for word in words {
        if rng.gen_bool(0.15) {
            continue;
        }
        if rng.gen_bool(0.1) {
            let filler = VOCABULARY.choose(rng).copied().unwrap_or("uh");
            let end = clock + rng.gen_range(0.05..0.4);
            heard.push(TranscribedToken::new(filler, clock, end, rng.gen_range(0.0..1.0)));
            clock = end;
        }
        let mut text: String = word.to_string();
        if rng.gen_bool(0.2) && text.chars().count() > 2 {
            text = text.chars().skip(1).collect();
        }
        let end = clock + rng.gen_range(0.1..0.8);
        heard.push(TranscribedToken::new(text, clock, end, rng.gen_range(0.0..1.0)));
        clock = end + rng.gen_range(0.0..0.2);
    }
    heard
}

fn random_case(rng: &mut StdRng) -> AlignmentInput {
    let count = rng.gen_range(0..12);
    let words: Vec<&str> = (0..count)
        .filter_map(|_| VOCABULARY.choose(rng).copied())
        .collect();
    let separator = if rng.gen_bool(0.5) { " " } else { "  \n" };
    let transcript = if rng.gen_bool(0.2) {
        Vec::new()
    } else {
        noisy_transcript(rng, &words)
    };
    let audio_duration_secs = if rng.gen_bool(0.2) {
        0.0
    } else {
        transcript.last().map_or(1.0, |t| t.end) + rng.gen_range(0.0..1.0)
    };
    AlignmentInput {
        original_text: words.join(separator),
        transcript,
        audio_duration_secs,
    }
}

#[test]
fn records_follow_source_tokens() {
    let aligner = aligner();
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ROUNDS {
        let input = random_case(&mut rng);
        let output = aligner.align(&input);
        let tokens = tokenize_source_text(&input.original_text);

        assert_eq!(output.records.len(), tokens.len());
        assert_eq!(output.stats.total_words, tokens.len());
        for (record, token) in output.records.iter().zip(&tokens) {
            assert_eq!(record.text, token.text);
            assert_eq!((record.text_start, record.text_end), (token.text_start, token.text_end));
        }
    }
}

#[test]
fn timestamps_and_confidence_stay_in_bounds() {
    let aligner = aligner();
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    for _ in 0..ROUNDS {
        let input = random_case(&mut rng);
        let output = aligner.align(&input);
        for record in &output.records {
            assert!((0.0..=1.0).contains(&record.confidence));
            if record.is_timed() {
                assert!(record.start >= 0.0);
                assert!(record.end >= record.start);
            } else {
                assert_eq!(record.start, UNMATCHED_TIMESTAMP);
                assert_eq!(record.end, UNMATCHED_TIMESTAMP);
                assert_eq!(record.confidence, 0.0);
            }
        }
        let timed = output.records.iter().filter(|r| r.is_timed()).count();
        match output.stats.method {
            AlignmentMethod::Estimated => {
                assert_eq!(timed, output.records.len());
                assert!(output.stats.match_ratio < AlignerConfig::DEFAULT_QUALITY_FLOOR);
            }
            _ => assert_eq!(output.stats.matched_words, timed),
        }
        assert!(output.stats.matched_words <= output.stats.total_words);
    }
}

#[test]
fn anchored_records_are_time_ordered() {
    let aligner = aligner();
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for _ in 0..ROUNDS {
        let input = random_case(&mut rng);
        let output = aligner.align(&input);
        if output.stats.method != AlignmentMethod::Anchored {
            continue;
        }
        let starts: Vec<f64> = output
            .records
            .iter()
            .filter(|r| r.is_timed())
            .map(|r| r.start)
            .collect();
        assert!(
            starts.windows(2).all(|w| w[0] <= w[1]),
            "anchors out of order for {:?}",
            input.original_text
        );
    }
}

#[test]
fn estimated_records_partition_the_audio() {
    let aligner = aligner();
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    for _ in 0..ROUNDS {
        let input = random_case(&mut rng);
        let output = aligner.align(&input);
        if output.stats.method != AlignmentMethod::Estimated {
            continue;
        }
        assert_eq!(output.records.first().map(|r| r.start), Some(0.0));
        assert_eq!(
            output.records.last().map(|r| r.end),
            Some(input.audio_duration_secs)
        );
        for pair in output.records.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(output.records.iter().all(|r| r.confidence == 0.3));
    }
}

#[test]
fn alignment_is_deterministic() {
    let aligner = aligner();
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    for _ in 0..ROUNDS {
        let input = random_case(&mut rng);
        assert_eq!(aligner.align(&input), aligner.align(&input));
    }
}
