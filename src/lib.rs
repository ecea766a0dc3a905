//! Bol India - Spoken English tutor for Hindi speakers
//!
//! This library provides the core functionality for Bol India:
//! - Lessons, phrases and vocabulary cards
//! - Speaking practice with pronunciation feedback
//! - Conversation tutor with an optional teaching mode
//! - Voice processing (capture, STT, speech playback)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Terminal (app)                      │
//! │   Dashboard  │  Lessons  │  Vocab  │  Conversation  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                     Shell                            │
//! │   Practice  │  Conversation  │  Progress store      │
//! └──────────┬─────────────────────────────┬────────────┘
//!            │                             │
//! ┌──────────▼──────────┐   ┌──────────────▼────────────┐
//! │  Voice (mic, STT,   │   │  Tutor (Gemini feedback,  │
//! │  playback, native)  │   │  chat, speech synthesis)  │
//! └─────────────────────┘   └───────────────────────────┘
//! ```

pub mod app;
pub mod config;
pub mod content;
pub mod conversation;
pub mod error;
pub mod genai;
pub mod practice;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod setup;
pub mod shell;
pub mod tutor;
pub mod voice;

pub use app::App;
pub use config::Config;
pub use content::{Catalog, Lesson, Phrase, VocabWord};
pub use conversation::{ChatMessage, ChatRole, ConversationSession};
pub use error::{Error, Result};
pub use practice::{PracticeSession, PracticeState};
pub use progress::{FileProgressStore, MemoryProgressStore, ProgressStore, UserProgress};
pub use shell::{Shell, View};
pub use tutor::{ChatReply, Speaker, Tutor, TutorClient};
