//! Error types for Bol India

use thiserror::Error;

/// Result type alias for Bol India operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Bol India
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A platform capability (microphone, speech recognition) is missing
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Generative model request error
    #[error("chat error: {0}")]
    Chat(String),

    /// Progress storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Embedded lesson content error
    #[error("content error: {0}")]
    Content(String),

    /// Lesson phrase or word not found
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Base64 decoding error
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}
