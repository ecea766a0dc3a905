//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;
use std::path::PathBuf;

use bol_india::voice::{
    EndpointState, MicCheck, SAMPLE_RATE, TTS_SAMPLE_RATE, UtteranceDetector,
    decode_pcm16_base64, plan_command, samples_to_wav,
};

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_detector_waits_through_silence() {
    let mut detector = UtteranceDetector::new();

    assert!(!detector.process(&generate_silence(0.5)));
    assert_eq!(detector.state(), EndpointState::Waiting);
    assert!(!detector.heard_speech());
}

#[test]
fn test_utterance_completes_after_trailing_silence() {
    let mut detector = UtteranceDetector::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!detector.process(&speech));
    assert_eq!(detector.state(), EndpointState::Speaking);

    // Short pause keeps the utterance open
    assert!(!detector.process(&generate_silence(0.2)));
    assert_eq!(detector.state(), EndpointState::Speaking);

    assert!(detector.process(&generate_silence(0.4)));
    assert_eq!(detector.state(), EndpointState::Complete);
}

#[test]
fn test_short_blip_is_discarded() {
    let mut detector = UtteranceDetector::new();

    detector.process(&generate_sine_samples(440.0, 0.1, 0.3));
    assert!(!detector.process(&generate_silence(0.6)));
    assert_eq!(detector.state(), EndpointState::Waiting);
}

#[test]
fn test_take_utterance_includes_speech_and_resets() {
    let mut detector = UtteranceDetector::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    let silence = generate_silence(0.6);
    detector.process(&speech);
    detector.process(&silence);

    let utterance = detector.take_utterance();
    assert_eq!(utterance.len(), speech.len() + silence.len());
    assert_eq!(detector.state(), EndpointState::Waiting);
    assert!(detector.take_utterance().is_empty());
}

#[test]
fn test_mic_check_summarizes_detected_utterance() {
    let mut detector = UtteranceDetector::new();
    detector.process(&generate_sine_samples(440.0, 0.5, 0.3));
    detector.process(&generate_silence(0.6));

    let check = MicCheck::from_utterance(&detector.take_utterance());
    assert!(check.heard);
    assert!((check.seconds - 1.1).abs() < 0.01);
    assert!((check.peak - 0.3).abs() < 0.01);
    assert!(check.rms > 0.1 && check.rms < 0.3);
}

#[test]
fn test_mic_check_reports_silence() {
    let check = MicCheck::from_utterance(&[]);
    assert!(!check.heard);
    assert!(check.seconds.abs() < f32::EPSILON);
    assert!(check.peak.abs() < f32::EPSILON);
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44);
}

#[test]
fn test_wav_roundtrip() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}

#[test]
fn test_synthesized_pcm_decodes_to_unit_range() {
    use base64::Engine;

    let bytes: Vec<u8> = [i16::MIN, 0, i16::MAX]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

    let samples = decode_pcm16_base64(&encoded).unwrap();
    assert_eq!(samples.len(), 3);
    assert!((samples[0] + 1.0).abs() < 1e-4);
    assert!(samples[1].abs() < f32::EPSILON);
    assert!((samples[2] - 1.0).abs() < 1e-3);
    assert_eq!(TTS_SAMPLE_RATE, 24_000);
}

#[test]
fn test_native_voice_uses_configured_locale() {
    let cmd = plan_command("linux", "Namaste", "hi-IN", |name| {
        (name == "espeak").then(|| PathBuf::from("/usr/bin/espeak"))
    })
    .unwrap();
    assert_eq!(cmd.args, ["-v", "hi-in", "--", "Namaste"]);
}
