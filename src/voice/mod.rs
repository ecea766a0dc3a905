//! Voice processing module
//!
//! Handles microphone capture, utterance endpointing, transcription,
//! playback, and the platform voice fallback.

mod capture;
mod endpoint;
mod native;
mod output;
mod pcm;
mod playback;
mod recognizer;
mod stt;

pub use capture::{AudioCapture, MicCheck, SAMPLE_RATE};
pub use endpoint::{EndpointState, UtteranceDetector};
pub use native::{NativeVoice, VoiceCommand, plan_command};
pub use output::{AudioOutput, DeviceOutput, SilentOutput};
pub use pcm::{TTS_SAMPLE_RATE, decode_pcm16_base64, pcm16_le_to_f32, rms, samples_to_wav};
pub use playback::AudioPlayback;
pub use recognizer::{
    MicrophoneRecognizer, SpeechRecognizer, TypedRecognizer, UnavailableRecognizer,
};
pub use stt::{DEEPGRAM_BASE_URL, SpeechToText, WHISPER_BASE_URL, language_code};
