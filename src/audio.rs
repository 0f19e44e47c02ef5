//! Decoding and duration probing for the audio the synthesizer writes.

use std::path::Path;

use claxon::FlacReader;
use hound::{SampleFormat, WavReader};

use crate::error::AlignmentError;
use crate::types::AudioClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Wav,
    Flac,
}

fn container_for(path: &Path) -> Result<Container, AlignmentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") | Some("wave") => Ok(Container::Wav),
        Some("flac") => Ok(Container::Flac),
        _ => Err(AlignmentError::invalid_input(format!(
            "unsupported audio container '{}', expected .wav or .flac",
            path.display()
        ))),
    }
}

/// Decode a WAV or FLAC file to a mono clip, picking the decoder by extension.
pub fn read_audio_mono(path: &Path) -> Result<AudioClip, AlignmentError> {
    match container_for(path)? {
        Container::Wav => read_wav_mono(path),
        Container::Flac => read_flac_mono(path),
    }
}

/// Total duration in seconds read from the file header only.
pub fn probe_duration_secs(path: &Path) -> Result<f64, AlignmentError> {
    match container_for(path)? {
        Container::Wav => {
            let reader = WavReader::open(path).map_err(|e| AlignmentError::audio("open WAV", e))?;
            let spec = reader.spec();
            if spec.sample_rate == 0 {
                return Err(AlignmentError::audio("probe WAV", "sample rate is zero"));
            }
            Ok(reader.duration() as f64 / spec.sample_rate as f64)
        }
        Container::Flac => {
            let reader =
                FlacReader::open(path).map_err(|e| AlignmentError::audio("open FLAC", e))?;
            let info = reader.streaminfo();
            if info.sample_rate == 0 {
                return Err(AlignmentError::audio("probe FLAC", "sample rate is zero"));
            }
            let frames = info
                .samples
                .ok_or_else(|| AlignmentError::audio("probe FLAC", "stream length unknown"))?;
            Ok(frames as f64 / info.sample_rate as f64)
        }
    }
}

pub fn read_wav_mono(path: &Path) -> Result<AudioClip, AlignmentError> {
    let mut reader = WavReader::open(path).map_err(|e| AlignmentError::audio("open WAV", e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AlignmentError::audio("read WAV", "zero channels"));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AlignmentError::audio("read WAV samples", e))?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample as i32);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AlignmentError::audio("read WAV samples", e))?
        }
    };

    Ok(AudioClip {
        sample_rate_hz: spec.sample_rate,
        samples: downmix(interleaved, channels),
    })
}

pub fn read_flac_mono(path: &Path) -> Result<AudioClip, AlignmentError> {
    let mut reader = FlacReader::open(path).map_err(|e| AlignmentError::audio("open FLAC", e))?;
    let streaminfo = reader.streaminfo();
    let channels = streaminfo.channels as usize;
    if channels == 0 {
        return Err(AlignmentError::audio("read FLAC", "zero channels"));
    }
    let scale = int_scale(streaminfo.bits_per_sample as i32);

    let interleaved = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AlignmentError::audio("read FLAC samples", e))?;

    Ok(AudioClip {
        sample_rate_hz: streaminfo.sample_rate,
        samples: downmix(interleaved, channels),
    })
}

fn int_scale(bits_per_sample: i32) -> f32 {
    if bits_per_sample > 1 {
        ((1_i64 << (bits_per_sample - 1)) - 1) as f32
    } else {
        1.0
    }
}

/// Average interleaved frames into one channel; a trailing partial frame is dropped.
fn downmix(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved;
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
