//! Configuration management for Bol India

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

use file::BolConfigFile;

/// Default base URL of the generative language API
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for feedback and chat
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

/// Default model for speech synthesis
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default prebuilt TTS voice
pub const DEFAULT_TTS_VOICE: &str = "Kore";

/// Default recognition locale
pub const DEFAULT_LOCALE: &str = "en-US";

/// Bol India configuration
#[derive(Debug)]
pub struct Config {
    /// Directory holding the progress record
    pub data_dir: PathBuf,

    /// Generative model configuration
    pub gemini: GeminiConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Speech recognition provider keys
    pub api_keys: ApiKeys,

    /// Delay before a successful practice overlay closes itself
    pub success_delay: Duration,
}

/// Gemini API configuration
#[derive(Debug)]
pub struct GeminiConfig {
    /// API key, absent means every remote call fails and falls back
    pub api_key: Option<SecretString>,

    /// Base URL of the API
    pub base_url: String,

    /// Model for feedback and chat
    pub chat_model: String,

    /// Model for speech synthesis
    pub tts_model: String,

    /// Prebuilt voice name
    pub tts_voice: String,
}

/// Speech-to-text provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SttProviderKind {
    /// `OpenAI` Whisper
    #[default]
    Whisper,
    /// Deepgram
    Deepgram,
}

impl SttProviderKind {
    /// Parse a provider name, case-insensitively
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "whisper" | "openai" => Some(Self::Whisper),
            "deepgram" => Some(Self::Deepgram),
            _ => None,
        }
    }

    /// Default model for this provider
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Whisper => "whisper-1",
            Self::Deepgram => "nova-2",
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable microphone and speaker
    pub enabled: bool,

    /// Locale for recognition and the native fallback voice
    pub locale: String,

    /// STT provider
    pub stt_provider: SttProviderKind,

    /// STT model
    pub stt_model: String,

    /// Longest single capture
    pub max_capture: Duration,
}

/// API keys for speech recognition providers
#[derive(Debug, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper)
    pub openai: Option<SecretString>,

    /// `Deepgram` API key
    pub deepgram: Option<SecretString>,
}

impl ApiKeys {
    /// Key for the given STT provider, if configured and non-empty
    #[must_use]
    pub fn for_stt(&self, provider: SttProviderKind) -> Option<&SecretString> {
        let key = match provider {
            SttProviderKind::Whisper => self.openai.as_ref(),
            SttProviderKind::Deepgram => self.deepgram.as_ref(),
        };
        key.filter(|k| !k.expose_secret().is_empty())
    }
}

impl Config {
    /// Load configuration from the environment and config file
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is invalid
    pub fn load() -> Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with explicit voice disable option
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is invalid
    pub fn load_with_options(disable_voice: bool) -> Result<Self> {
        let fc = file::load_config_file();
        let config = Self::from_sources(fc, |key| std::env::var(key).ok(), disable_voice)?;

        if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
            tracing::warn!(
                path = %config.data_dir.display(),
                error = %e,
                "failed to create data directory"
            );
        }

        Ok(config)
    }

    /// Build configuration from a parsed config file and an env lookup
    ///
    /// Priority is env > toml > default.
    ///
    /// # Errors
    ///
    /// Returns error if the STT provider name is unknown
    pub fn from_sources<F>(fc: BolConfigFile, env: F, disable_voice: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = present(env("GEMINI_API_KEY"))
            .or_else(|| present(env("API_KEY")))
            .or_else(|| present(fc.gemini.api_key))
            .map(SecretString::from);

        if api_key.is_none() {
            tracing::warn!("no Gemini API key configured, remote tutor calls will fail");
        }

        let gemini = GeminiConfig {
            api_key,
            base_url: env("BOL_GEMINI_URL")
                .or(fc.gemini.base_url)
                .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            chat_model: env("BOL_CHAT_MODEL")
                .or(fc.gemini.chat_model)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            tts_model: env("BOL_TTS_MODEL")
                .or(fc.gemini.tts_model)
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            tts_voice: env("BOL_TTS_VOICE")
                .or(fc.gemini.tts_voice)
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
        };

        let stt_provider = match env("BOL_STT_PROVIDER").or(fc.voice.stt_provider) {
            Some(name) => SttProviderKind::parse(&name)
                .ok_or_else(|| Error::Config(format!("unknown STT provider: {name}")))?,
            None => SttProviderKind::default(),
        };

        let enabled = if disable_voice {
            tracing::info!("voice explicitly disabled via --disable-voice");
            false
        } else {
            fc.voice.enabled.unwrap_or(true)
        };

        let voice = VoiceConfig {
            enabled,
            locale: env("BOL_LOCALE")
                .or(fc.voice.locale)
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            stt_provider,
            stt_model: env("BOL_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| stt_provider.default_model().to_string()),
            max_capture: Duration::from_secs(fc.voice.max_capture_secs.unwrap_or(15)),
        };

        let api_keys = ApiKeys {
            openai: present(env("OPENAI_API_KEY"))
                .or_else(|| present(fc.api_keys.openai))
                .map(SecretString::from),
            deepgram: present(env("DEEPGRAM_API_KEY"))
                .or_else(|| present(fc.api_keys.deepgram))
                .map(SecretString::from),
        };

        // ~/.local/share/bol-india on Linux
        let data_dir = env("BOL_DATA_DIR")
            .or(fc.storage.data_dir)
            .map_or_else(default_data_dir, PathBuf::from);

        Ok(Self {
            data_dir,
            gemini,
            voice,
            api_keys,
            success_delay: Duration::from_secs(3),
        })
    }
}

/// A configured value, treating an empty string as unset
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Default data directory
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".local/share/bol-india"),
        |d| d.data_dir().join("bol-india"),
    )
}
