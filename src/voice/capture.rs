//! Audio capture from microphone

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use super::endpoint::UtteranceDetector;
use super::pcm::rms;
use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// How often the capture buffer is drained while recording
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captures audio from the default input device
///
/// Holds a live `cpal` stream, so it must stay on the thread that created it.
pub struct AudioCapture {
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Open the default input device at 16kHz mono
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if there is no input device, `Audio` if it
    /// cannot record 16kHz mono
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Unsupported("no microphone available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start capturing audio
    ///
    /// # Errors
    ///
    /// Returns error if capture fails
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| Error::Unsupported("no microphone available".to_string()))?;

        let stream = device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("audio capture stopped");
        }
    }

    /// Get captured audio buffer and clear it
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Clear the audio buffer
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Record a single utterance, blocking the current thread
    ///
    /// Stops at the end of the first utterance or after `max_duration`,
    /// whichever comes first. Returns an empty buffer if nobody spoke.
    ///
    /// # Errors
    ///
    /// Returns error if capture fails to start
    pub fn record_utterance(&mut self, max_duration: Duration) -> Result<Vec<f32>> {
        let mut detector = UtteranceDetector::new();
        self.clear_buffer();
        self.start()?;

        let deadline = Instant::now() + max_duration;
        while Instant::now() < deadline {
            std::thread::sleep(POLL_INTERVAL);

            let chunk = self.take_buffer();
            if chunk.is_empty() {
                continue;
            }
            if detector.process(&chunk) {
                break;
            }
        }

        self.stop();

        if !detector.heard_speech() {
            tracing::debug!("no speech before capture deadline");
            return Ok(Vec::new());
        }
        Ok(detector.take_utterance())
    }
}

/// Summary of one recorded utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicCheck {
    /// Whether the endpoint detector heard an utterance at all
    pub heard: bool,
    pub seconds: f32,
    pub rms: f32,
    pub peak: f32,
}

impl MicCheck {
    /// Summarize the output of [`AudioCapture::record_utterance`]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_utterance(samples: &[f32]) -> Self {
        Self {
            heard: !samples.is_empty(),
            seconds: samples.len() as f32 / SAMPLE_RATE as f32,
            rms: rms(samples),
            peak: samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max),
        }
    }
}
