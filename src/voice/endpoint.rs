//! Utterance endpointing
//!
//! Decides when a single spoken utterance has started and ended using local
//! energy detection, so one capture yields one utterance.

use super::pcm::rms;

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum voiced samples for a real utterance (0.3 seconds at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.5 seconds at 16kHz)
const SILENCE_SAMPLES: usize = 8000;

/// State of the endpoint detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Waiting for speech to start
    Waiting,
    /// Speech in progress, accumulating
    Speaking,
    /// Speech followed by enough silence
    Complete,
}

/// Finds the boundaries of one utterance in a sample stream
#[derive(Debug)]
pub struct UtteranceDetector {
    state: EndpointState,
    buffer: Vec<f32>,
    voiced: usize,
    silence: usize,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a detector waiting for speech
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EndpointState::Waiting,
            buffer: Vec::new(),
            voiced: 0,
            silence: 0,
        }
    }

    /// Feed a block of samples
    ///
    /// Returns true once the utterance is complete
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let energy = rms(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            EndpointState::Waiting => {
                if is_speech {
                    self.state = EndpointState::Speaking;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.voiced = samples.len();
                    self.silence = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            EndpointState::Speaking => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.voiced += samples.len();
                    self.silence = 0;
                } else {
                    self.silence += samples.len();
                }

                if self.silence > SILENCE_SAMPLES {
                    if self.voiced >= MIN_SPEECH_SAMPLES {
                        self.state = EndpointState::Complete;
                        tracing::debug!(
                            samples = self.buffer.len(),
                            voiced = self.voiced,
                            "utterance complete"
                        );
                    } else {
                        tracing::trace!(voiced = self.voiced, "too short, waiting again");
                        self.reset();
                    }
                }
            }
            EndpointState::Complete => {}
        }

        self.state == EndpointState::Complete
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> EndpointState {
        self.state
    }

    /// Whether speech has started
    #[must_use]
    pub fn heard_speech(&self) -> bool {
        self.state != EndpointState::Waiting
    }

    /// Take the captured utterance and reset
    pub fn take_utterance(&mut self) -> Vec<f32> {
        let buffer = std::mem::take(&mut self.buffer);
        self.reset();
        buffer
    }

    /// Forget everything and wait for speech again
    pub fn reset(&mut self) {
        self.state = EndpointState::Waiting;
        self.buffer.clear();
        self.voiced = 0;
        self.silence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::SAMPLE_RATE;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn tone(duration_secs: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration_secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn silence(duration_secs: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration_secs) as usize;
        vec![0.0; n]
    }

    #[test]
    fn silence_keeps_waiting() {
        let mut detector = UtteranceDetector::new();
        assert!(!detector.process(&silence(1.0)));
        assert_eq!(detector.state(), EndpointState::Waiting);
        assert!(!detector.heard_speech());
    }

    #[test]
    fn speech_then_silence_completes() {
        let mut detector = UtteranceDetector::new();

        assert!(!detector.process(&tone(0.5)));
        assert_eq!(detector.state(), EndpointState::Speaking);
        assert!(!detector.process(&silence(0.2)));
        assert!(detector.process(&silence(0.6)));
        assert_eq!(detector.state(), EndpointState::Complete);

        let utterance = detector.take_utterance();
        assert_eq!(utterance.len(), tone(0.5).len() + silence(0.2).len() + silence(0.6).len());
        assert_eq!(detector.state(), EndpointState::Waiting);
    }

    #[test]
    fn short_click_is_discarded() {
        let mut detector = UtteranceDetector::new();

        detector.process(&tone(0.1));
        assert!(!detector.process(&silence(0.6)));
        assert_eq!(detector.state(), EndpointState::Waiting);
        assert!(detector.take_utterance().is_empty());
    }

    #[test]
    fn complete_state_is_sticky_until_taken() {
        let mut detector = UtteranceDetector::new();
        detector.process(&tone(0.4));
        detector.process(&silence(0.6));
        let len = detector.buffer.len();

        assert!(detector.process(&tone(0.2)));
        assert_eq!(detector.buffer.len(), len);
    }
}
