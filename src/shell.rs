//! Top-level screen state
//!
//! The shell owns the progress record and decides which screen is active.
//! Overlays (practice) and the conversation session live and die with it.

use std::time::Duration;

use crate::content::Catalog;
use crate::conversation::ConversationSession;
use crate::practice::{PracticeSession, PracticeState};
use crate::progress::{POINTS_PER_PRACTICE, ProgressStore, UserProgress, load_or_default};
use crate::tutor::Tutor;
use crate::voice::SpeechRecognizer;
use crate::Result;

/// Screens reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Lessons,
    Vocabulary,
    Conversation,
}

impl View {
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Lessons,
        Self::Conversation,
        Self::Vocabulary,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Home",
            Self::Lessons => "Lessons",
            Self::Vocabulary => "Vocab",
            Self::Conversation => "Speak",
        }
    }
}

/// Application state behind every screen
pub struct Shell {
    catalog: Catalog,
    store: Box<dyn ProgressStore>,
    progress: UserProgress,
    view: View,
    practice: Option<PracticeSession>,
    conversation: Option<ConversationSession>,
    success_delay: Duration,
}

impl Shell {
    /// Create the shell, loading progress once from `store`
    #[must_use]
    pub fn new(catalog: Catalog, store: Box<dyn ProgressStore>, success_delay: Duration) -> Self {
        let progress = load_or_default(store.as_ref());
        Self {
            catalog,
            store,
            progress,
            view: View::Dashboard,
            practice: None,
            conversation: None,
            success_delay,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn progress(&self) -> &UserProgress {
        &self.progress
    }

    /// Points shown in the header
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.progress.total_points
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub const fn practice(&self) -> Option<&PracticeSession> {
        self.practice.as_ref()
    }

    pub const fn practice_mut(&mut self) -> Option<&mut PracticeSession> {
        self.practice.as_mut()
    }

    #[must_use]
    pub const fn conversation(&self) -> Option<&ConversationSession> {
        self.conversation.as_ref()
    }

    pub const fn conversation_mut(&mut self) -> Option<&mut ConversationSession> {
        self.conversation.as_mut()
    }

    /// Switch screens
    ///
    /// Entering the conversation screen starts a fresh session; leaving it
    /// discards the session.
    pub fn navigate(&mut self, view: View) {
        if view == self.view {
            return;
        }

        tracing::debug!(from = ?self.view, to = ?view, "navigate");

        if self.view == View::Conversation {
            self.conversation = None;
        }
        if view == View::Conversation {
            self.conversation = Some(ConversationSession::new());
        }
        self.view = view;
    }

    /// Show the practice overlay for a phrase
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no lesson contains the phrase
    pub fn open_practice(&mut self, phrase_id: &str) -> Result<&mut PracticeSession> {
        let phrase = self.catalog.require_phrase(phrase_id)?.clone();
        tracing::debug!(phrase = %phrase.id, "open practice");
        Ok(self.practice.insert(PracticeSession::new(phrase)))
    }

    /// Dismiss the practice overlay without awarding points
    pub fn close_practice(&mut self) {
        self.practice = None;
    }

    /// Award points for a completed practice and dismiss the overlay
    ///
    /// A failed write is logged; the in-memory total still changes.
    pub fn complete_practice(&mut self) {
        self.progress.award(POINTS_PER_PRACTICE);
        tracing::info!(total = self.progress.total_points, "practice complete");

        if let Err(e) = self.store.save(&self.progress) {
            tracing::error!(error = %e, "failed to save progress");
        }
        self.practice = None;
    }

    /// Capture once in the open overlay, `None` if no overlay is open
    pub async fn capture_practice(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
        tutor: &dyn Tutor,
    ) -> Option<PracticeState> {
        Some(self.practice.as_mut()?.capture(recognizer, tutor).await)
    }

    /// Close a successful overlay after the success delay, awarding points
    ///
    /// Returns whether the practice was completed.
    pub async fn settle_practice(&mut self) -> bool {
        if !self.practice.as_ref().is_some_and(PracticeSession::is_success) {
            return false;
        }

        if !self.success_delay.is_zero() {
            tokio::time::sleep(self.success_delay).await;
        }
        self.complete_practice();
        true
    }
}
