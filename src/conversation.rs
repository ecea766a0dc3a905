//! Conversation tutor session
//!
//! Holds the visible transcript and drives one chat turn at a time. A turn
//! is split into `begin_turn` and `finish_turn` so callers that run the
//! remote call themselves see the same gating as `send`.

use crate::genai::{Content, Role};
use crate::prompt::{GREETING_SEED, TUTOR_SUGGESTIONS};
use crate::tutor::{ChatReply, Speaker, Tutor};
use crate::voice::SpeechRecognizer;
use crate::{Error, Result};

/// Who wrote a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    const fn wire_role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Assistant => Role::Model,
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    /// Target-language text
    pub text: String,
    pub translation: Option<String>,
    pub note: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            translation: None,
            note: None,
        }
    }

    #[must_use]
    pub fn assistant(reply: ChatReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: reply.text,
            translation: non_empty(reply.translation),
            note: non_empty(reply.note),
        }
    }
}

/// A live conversation with the tutor
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
    thinking: bool,
    tutor_mode: bool,
}

impl ConversationSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn is_thinking(&self) -> bool {
        self.thinking
    }

    #[must_use]
    pub const fn tutor_mode(&self) -> bool {
        self.tutor_mode
    }

    /// Flip tutor mode, returning the new value
    ///
    /// Only the instruction sent with later requests changes.
    pub fn toggle_tutor_mode(&mut self) -> bool {
        self.tutor_mode = !self.tutor_mode;
        tracing::info!(tutor_mode = self.tutor_mode, "conversation mode changed");
        self.tutor_mode
    }

    /// Canned questions to offer, empty unless in tutor mode and idle
    #[must_use]
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.tutor_mode && !self.thinking {
            &TUTOR_SUGGESTIONS
        } else {
            &[]
        }
    }

    /// Status line while waiting on the tutor
    #[must_use]
    pub const fn thinking_label(&self) -> Option<&'static str> {
        match (self.thinking, self.tutor_mode) {
            (false, _) => None,
            (true, true) => Some("Teacher is explaining..."),
            (true, false) => Some("AI is thinking..."),
        }
    }

    /// Transcript as chat history for the remote endpoint
    #[must_use]
    pub fn history(&self) -> Vec<Content> {
        self.messages
            .iter()
            .map(|m| Content::text(m.role.wire_role(), m.text.clone()))
            .collect()
    }

    /// Start the opening turn, `None` if a turn is already in flight
    pub fn begin_greeting(&mut self) -> Option<Vec<Content>> {
        if self.thinking {
            return None;
        }
        self.thinking = true;
        Some(vec![Content::text(Role::User, GREETING_SEED)])
    }

    /// Append a user turn and return the history to send
    ///
    /// Returns `None` while a turn is in flight or for blank input.
    pub fn begin_turn(&mut self, text: &str) -> Option<Vec<Content>> {
        let text = text.trim();
        if self.thinking {
            tracing::debug!("still thinking, input ignored");
            return None;
        }
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.thinking = true;
        Some(self.history())
    }

    /// Record the outcome of the turn in flight
    ///
    /// Returns the text to speak when a reply was appended. Failures leave
    /// the transcript as it was.
    pub fn finish_turn(&mut self, reply: Result<ChatReply>) -> Option<String> {
        self.thinking = false;
        match reply {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply);
                let spoken = message.text.clone();
                self.messages.push(message);
                Some(spoken)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                None
            }
        }
    }

    /// Request and speak the opening line
    pub async fn start(&mut self, tutor: &dyn Tutor, speaker: &dyn Speaker) -> bool {
        let Some(history) = self.begin_greeting() else {
            return false;
        };
        let reply = tutor.chat_reply(&history, self.tutor_mode).await;
        self.speak_reply(reply, speaker).await
    }

    /// Send a typed utterance or suggestion and speak the reply
    ///
    /// Returns whether a reply was appended.
    pub async fn send(&mut self, text: &str, tutor: &dyn Tutor, speaker: &dyn Speaker) -> bool {
        let Some(history) = self.begin_turn(text) else {
            return false;
        };
        let reply = tutor.chat_reply(&history, self.tutor_mode).await;
        self.speak_reply(reply, speaker).await
    }

    /// Capture one spoken utterance and send it
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if speech recognition is unavailable; other
    /// capture failures are logged and treated as silence
    pub async fn listen(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
        tutor: &dyn Tutor,
        speaker: &dyn Speaker,
    ) -> Result<bool> {
        if self.thinking {
            return Ok(false);
        }

        match recognizer.recognize_once().await {
            Ok(Some(transcript)) => Ok(self.send(&transcript, tutor, speaker).await),
            Ok(None) => Ok(false),
            Err(e @ Error::Unsupported(_)) => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "speech capture failed");
                Ok(false)
            }
        }
    }

    /// Speak an earlier tutor message again
    ///
    /// Returns false if `index` is not a tutor message.
    pub async fn replay(&self, index: usize, speaker: &dyn Speaker) -> bool {
        match self.messages.get(index) {
            Some(message) if message.role == ChatRole::Assistant => {
                speaker.speak(&message.text).await;
                true
            }
            _ => false,
        }
    }

    async fn speak_reply(&mut self, reply: Result<ChatReply>, speaker: &dyn Speaker) -> bool {
        match self.finish_turn(reply) {
            Some(text) => {
                speaker.speak(&text).await;
                true
            }
            None => false,
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
