//! Speech recognition capability
//!
//! One call captures one utterance and returns its best transcript.

use std::time::Duration;

use async_trait::async_trait;

use super::capture::{AudioCapture, SAMPLE_RATE};
use super::pcm::samples_to_wav;
use super::stt::SpeechToText;
use crate::config::Config;
use crate::{Error, Result};

/// Shortest capture worth transcribing (0.3 seconds)
const MIN_UTTERANCE_SAMPLES: usize = SAMPLE_RATE as usize * 3 / 10;

/// Captures a single utterance and transcribes it
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and return the best transcript
    ///
    /// Returns `Ok(None)` when nothing was said.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` when the capability is absent, other errors when
    /// capture or transcription fails
    async fn recognize_once(&self) -> Result<Option<String>>;
}

/// Microphone capture followed by remote transcription
pub struct MicrophoneRecognizer {
    stt: SpeechToText,
    max_capture: Duration,
}

impl MicrophoneRecognizer {
    /// Create a recognizer
    #[must_use]
    pub const fn new(stt: SpeechToText, max_capture: Duration) -> Self {
        Self { stt, max_capture }
    }

    /// Create a recognizer from configuration
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if voice is disabled or no STT key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.voice.enabled {
            return Err(Error::Unsupported("voice is disabled".to_string()));
        }
        let stt = SpeechToText::from_config(&config.voice, &config.api_keys)?;
        Ok(Self::new(stt, config.voice.max_capture))
    }
}

#[async_trait]
impl SpeechRecognizer for MicrophoneRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>> {
        let max_capture = self.max_capture;
        let samples = tokio::task::spawn_blocking(move || {
            let mut capture = AudioCapture::new()?;
            capture.record_utterance(max_capture)
        })
        .await
        .map_err(|e| Error::Audio(format!("capture task failed: {e}")))??;

        if samples.len() < MIN_UTTERANCE_SAMPLES {
            tracing::debug!(samples = samples.len(), "nothing heard");
            return Ok(None);
        }

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        let transcript = self.stt.transcribe(&wav).await?;
        Ok(non_empty(transcript))
    }
}

/// Recognizer that reads typed text from the terminal instead of the microphone
pub struct TypedRecognizer {
    prompt: String,
}

impl TypedRecognizer {
    /// Create a typed recognizer showing `prompt`
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for TypedRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>> {
        let prompt = self.prompt.clone();
        let line = tokio::task::spawn_blocking(move || {
            dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| Error::Audio(format!("input task failed: {e}")))?
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        Ok(non_empty(line))
    }
}

/// Recognizer for devices without the capability
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    /// Create a recognizer that always reports `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for UnavailableRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>> {
        Err(Error::Unsupported(self.reason.clone()))
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_reports_unsupported() {
        let recognizer = UnavailableRecognizer::new("no microphone");
        match recognizer.recognize_once().await {
            Err(Error::Unsupported(reason)) => assert_eq!(reason, "no microphone"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn blank_transcripts_are_none() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" hi ".to_string()), Some("hi".to_string()));
    }
}
