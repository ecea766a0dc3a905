//! Where synthesized and fallback speech ends up

use async_trait::async_trait;

use super::native::NativeVoice;
use super::playback::AudioPlayback;
use crate::{Error, Result};

/// Sink for spoken output
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Play mono samples at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns error if no device can play them
    async fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()>;

    /// Speak text with the platform's own voice
    ///
    /// # Errors
    ///
    /// Returns error if the platform has no usable voice
    async fn speak_native(&self, text: &str) -> Result<()>;
}

/// Default output device plus the platform voice
pub struct DeviceOutput {
    native: NativeVoice,
}

impl DeviceOutput {
    /// Create an output using `locale` for the platform voice
    #[must_use]
    pub fn new(locale: &str) -> Self {
        Self {
            native: NativeVoice::new(locale),
        }
    }
}

#[async_trait]
impl AudioOutput for DeviceOutput {
    async fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            AudioPlayback::new(sample_rate)?.play_blocking(samples)
        })
        .await
        .map_err(|e| Error::Audio(format!("playback task failed: {e}")))?
    }

    async fn speak_native(&self, text: &str) -> Result<()> {
        self.native.speak(text).await
    }
}

/// Output that discards everything, for text-only sessions
pub struct SilentOutput;

#[async_trait]
impl AudioOutput for SilentOutput {
    async fn play(&self, samples: Vec<f32>, _sample_rate: u32) -> Result<()> {
        tracing::debug!(samples = samples.len(), "voice disabled, dropping audio");
        Ok(())
    }

    async fn speak_native(&self, text: &str) -> Result<()> {
        tracing::debug!(text, "voice disabled, not speaking");
        Ok(())
    }
}
