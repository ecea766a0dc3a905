//! Speaking practice overlay
//!
//! One target phrase, one capture at a time. The session records what the
//! learner said and the tutor's feedback; the shell decides when a successful
//! session is dismissed and points are awarded.

use crate::content::Phrase;
use crate::tutor::{Speaker, Tutor};
use crate::voice::SpeechRecognizer;
use crate::Error;

/// Shown when the tutor returns empty feedback
pub const DEFAULT_PRAISE: &str = "बहुत अच्छे!";

/// Shown when the feedback request fails
pub const RETRY_MESSAGE: &str = "फिर से कोशिश करें।";

/// Shown when the device cannot recognize speech
pub const UNSUPPORTED_NOTICE: &str = "Speech recognition is not supported on this device.";

/// Where a practice session is in its capture cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PracticeState {
    #[default]
    Idle,
    Listening,
    Analyzing,
    /// Terminal; the overlay is dismissed after a delay
    Success,
    FeedbackShown,
}

impl PracticeState {
    /// Caption under the microphone control
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Listening => "Listening...",
            Self::Analyzing => "Analyzing...",
            Self::Success => "Well done!",
            Self::Idle | Self::FeedbackShown => "Tap to Speak",
        }
    }
}

/// Whether an attempt counts as a pass
///
/// `feedback` is the tutor's raw text, before any default praise is applied.
#[must_use]
pub fn is_success(transcript: &str, target: &str, feedback: &str) -> bool {
    feedback.contains("100")
        || feedback.to_lowercase().contains("good")
        || transcript.to_lowercase() == target.to_lowercase()
}

/// Practice overlay for a single phrase
#[derive(Debug, Clone)]
pub struct PracticeSession {
    phrase: Phrase,
    state: PracticeState,
    transcript: Option<String>,
    feedback: Option<String>,
    notice: Option<String>,
}

impl PracticeSession {
    #[must_use]
    pub const fn new(phrase: Phrase) -> Self {
        Self {
            phrase,
            state: PracticeState::Idle,
            transcript: None,
            feedback: None,
            notice: None,
        }
    }

    #[must_use]
    pub const fn phrase(&self) -> &Phrase {
        &self.phrase
    }

    #[must_use]
    pub const fn state(&self) -> PracticeState {
        self.state
    }

    /// What the learner said on the last capture
    #[must_use]
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Blocking notice from the last capture attempt, if any
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == PracticeState::Success
    }

    /// Play the target phrase
    pub async fn play_target(&self, speaker: &dyn Speaker) {
        speaker.speak(&self.phrase.english).await;
    }

    /// Capture one utterance and evaluate it
    pub async fn capture(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
        tutor: &dyn Tutor,
    ) -> PracticeState {
        if self.is_success() {
            tracing::debug!(phrase = %self.phrase.id, "already passed, ignoring capture");
            return self.state;
        }

        self.notice = None;
        self.state = PracticeState::Listening;

        match recognizer.recognize_once().await {
            Ok(Some(transcript)) => return self.submit_transcript(transcript, tutor).await,
            Ok(None) => {
                tracing::debug!(phrase = %self.phrase.id, "no speech captured");
            }
            Err(Error::Unsupported(reason)) => {
                tracing::warn!(reason = %reason, "speech recognition unavailable");
                self.notice = Some(UNSUPPORTED_NOTICE.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech capture failed");
            }
        }

        self.state = PracticeState::Idle;
        self.state
    }

    /// Evaluate a transcript against the target phrase
    pub async fn submit_transcript(
        &mut self,
        transcript: String,
        tutor: &dyn Tutor,
    ) -> PracticeState {
        if self.is_success() {
            return self.state;
        }

        self.state = PracticeState::Analyzing;
        let target = self.phrase.english.clone();

        let (feedback, passed) = match tutor.analyze_speech(&transcript, &target).await {
            Ok(text) => {
                let passed = is_success(&transcript, &target, &text);
                let shown = if text.trim().is_empty() {
                    DEFAULT_PRAISE.to_string()
                } else {
                    text
                };
                (shown, passed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech analysis failed");
                if is_success(&transcript, &target, "") {
                    (DEFAULT_PRAISE.to_string(), true)
                } else {
                    (RETRY_MESSAGE.to_string(), false)
                }
            }
        };

        tracing::info!(phrase = %self.phrase.id, passed, "practice attempt evaluated");

        self.transcript = Some(transcript);
        self.feedback = Some(feedback);
        self.state = if passed {
            PracticeState::Success
        } else {
            PracticeState::FeedbackShown
        };
        self.state
    }
}
