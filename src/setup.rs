//! Interactive first-run setup wizard (`bol setup`)

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Select};

use crate::config::file::{
    ApiKeysFileConfig, BolConfigFile, GeminiFileConfig, VoiceFileConfig, config_file_path,
    load_config_file,
};
use crate::config::{DEFAULT_LOCALE, DEFAULT_TTS_VOICE, SttProviderKind};

/// Prebuilt voices offered by the wizard
const VOICES: [&str; 5] = ["Kore", "Puck", "Charon", "Fenrir", "Aoede"];

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Bol India Setup\n");

    let existing = load_config_file();
    let config_path = config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/bol-india/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Gemini key
    let existing_key = existing.gemini.api_key.as_deref();
    let gemini_key = prompt_key("Gemini API key", "GEMINI_API_KEY", existing_key)?;

    // 2. Tutor voice
    let default_voice = existing
        .gemini
        .tts_voice
        .as_deref()
        .unwrap_or(DEFAULT_TTS_VOICE);
    let voice_idx = Select::new()
        .with_prompt("Tutor voice")
        .items(&VOICES)
        .default(VOICES.iter().position(|&v| v == default_voice).unwrap_or(0))
        .interact()?;

    // 3. Speech recognition
    let voice_default = existing.voice.enabled.unwrap_or(true);
    let enable_voice = Confirm::new()
        .with_prompt("Use microphone and speaker?")
        .default(voice_default)
        .interact()?;

    let mut api_keys = ApiKeysFileConfig {
        openai: existing.api_keys.openai.clone(),
        deepgram: existing.api_keys.deepgram.clone(),
    };

    let voice = if enable_voice {
        let providers = ["Whisper (OpenAI)", "Deepgram"];
        let default_provider = existing
            .voice
            .stt_provider
            .as_deref()
            .and_then(SttProviderKind::parse)
            .map_or(0, |p| usize::from(p == SttProviderKind::Deepgram));

        let provider_idx = Select::new()
            .with_prompt("Speech recognition provider")
            .items(&providers)
            .default(default_provider)
            .interact()?;

        let provider = if provider_idx == 1 {
            SttProviderKind::Deepgram
        } else {
            SttProviderKind::Whisper
        };

        match provider {
            SttProviderKind::Whisper => {
                api_keys.openai =
                    prompt_key("OpenAI API key", "OPENAI_API_KEY", api_keys.openai.as_deref())?;
            }
            SttProviderKind::Deepgram => {
                api_keys.deepgram = prompt_key(
                    "Deepgram API key",
                    "DEEPGRAM_API_KEY",
                    api_keys.deepgram.as_deref(),
                )?;
            }
        }

        let locale: String = Input::new()
            .with_prompt("Speech locale")
            .default(
                existing
                    .voice
                    .locale
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            )
            .interact_text()?;

        VoiceFileConfig {
            enabled: Some(true),
            locale: Some(locale),
            stt_provider: Some(
                match provider {
                    SttProviderKind::Whisper => "whisper",
                    SttProviderKind::Deepgram => "deepgram",
                }
                .to_string(),
            ),
            stt_model: existing.voice.stt_model.clone(),
            max_capture_secs: existing.voice.max_capture_secs,
        }
    } else {
        VoiceFileConfig {
            enabled: Some(false),
            ..VoiceFileConfig::default()
        }
    };

    let config_file = BolConfigFile {
        gemini: GeminiFileConfig {
            api_key: gemini_key,
            tts_voice: Some(VOICES[voice_idx].to_string()),
            ..existing.gemini
        },
        voice,
        api_keys,
        storage: existing.storage,
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `bol` to start learning.");

    Ok(())
}

/// Ask for a secret, keeping the current one on blank input
fn prompt_key(
    label: &str,
    env_hint: &str,
    current: Option<&str>,
) -> anyhow::Result<Option<String>> {
    let prompt = match current.map(mask_key) {
        Some(masked) => format!("{label} (current: {masked}, leave blank to keep)"),
        None => format!("{label} ({env_hint})"),
    };

    let input: String = Input::new()
        .with_prompt(&prompt)
        .allow_empty(true)
        .interact_text()?;

    Ok(if input.trim().is_empty() {
        current.map(str::to_string)
    } else {
        Some(input.trim().to_string())
    })
}

/// Show only the ends of a key
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Serialize and write the config file
fn write_config(path: &Path, config: &BolConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}
