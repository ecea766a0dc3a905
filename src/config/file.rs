//! TOML configuration file loading
//!
//! Supports `~/.config/bol-india/config.toml` as a persistent config source.
//! All fields are optional, the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BolConfigFile {
    /// Generative model configuration
    #[serde(default)]
    pub gemini: GeminiFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for speech recognition providers
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageFileConfig,
}

/// Gemini API configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiFileConfig {
    /// API key (prefer the `GEMINI_API_KEY` env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the generative language API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model used for feedback and chat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_model: Option<String>,

    /// Model used for speech synthesis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_model: Option<String>,

    /// Prebuilt voice name (e.g. "Kore")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// Enable microphone and speaker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Recognition and fallback voice locale (e.g. "en-US")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// STT provider ("whisper" or "deepgram")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1", "nova-2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_model: Option<String>,

    /// Longest single capture in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capture_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepgram: Option<String>,
}

/// Storage configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageFileConfig {
    /// Directory holding the progress record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `BolConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> BolConfigFile {
    let Some(path) = config_file_path() else {
        return BolConfigFile::default();
    };

    if !path.exists() {
        return BolConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config file, using defaults"
            );
            BolConfigFile::default()
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            BolConfigFile::default()
        }
    }
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the TOML is malformed
pub fn parse_config(content: &str) -> crate::Result<BolConfigFile> {
    let config = toml::from_str(content)?;
    tracing::debug!("parsed config file");
    Ok(config)
}

/// Return the config file path: `~/.config/bol-india/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("bol-india").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.gemini.api_key.is_none());
        assert!(config.voice.enabled.is_none());
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn partial_sections_parse() {
        let config = parse_config(
            r#"
            [gemini]
            tts_voice = "Puck"

            [voice]
            enabled = false
            stt_provider = "deepgram"
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.tts_voice.as_deref(), Some("Puck"));
        assert_eq!(config.voice.enabled, Some(false));
        assert_eq!(config.voice.stt_provider.as_deref(), Some("deepgram"));
        assert!(config.gemini.chat_model.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_config("[voice\nenabled = ").is_err());
    }
}
