//! Audio and chat client for the remote tutor
//!
//! Three single-shot remote calls: speech synthesis, pronunciation feedback,
//! and structured chat replies. None of them retry.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{Config, GeminiConfig};
use crate::genai::{
    Content, GeminiClient, GenerateContentRequest, GenerationConfig, Modality, Part, Role,
    SpeechConfig,
};
use crate::voice::{AudioOutput, DeviceOutput, SilentOutput, TTS_SAMPLE_RATE, decode_pcm16_base64};
use crate::{Error, Result, prompt};

/// Structured tutor reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// Reply in the target language
    pub text: String,
    /// Translation into the learner's language
    pub translation: String,
    /// Grammar or vocabulary note, empty outside tutor mode
    pub note: String,
}

#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    english: Option<String>,
    #[serde(default)]
    hindi: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

impl ChatReply {
    /// Parse the model's JSON reply
    ///
    /// Anything that is not a JSON object degrades to the raw text with an
    /// empty translation and note.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<WireReply>(raw) {
            Ok(wire) => Self {
                text: wire.english.unwrap_or_default(),
                translation: wire.hindi.unwrap_or_default(),
                note: wire.explanation.unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "chat reply is not JSON, using raw text");
                Self {
                    text: raw.to_string(),
                    ..Self::default()
                }
            }
        }
    }
}

/// Remote feedback and chat endpoints
#[async_trait]
pub trait Tutor: Send + Sync {
    /// Short evaluation of `transcript` against `target`, in the learner's script
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails
    async fn analyze_speech(&self, transcript: &str, target: &str) -> Result<String>;

    /// Next tutor turn for a conversation history
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails; malformed replies are not errors
    async fn chat_reply(&self, history: &[Content], tutor_mode: bool) -> Result<ChatReply>;
}

/// Speaks text aloud
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, falling back to the platform voice on any failure
    async fn speak(&self, text: &str);
}

/// Production tutor backed by the generative language API
pub struct TutorClient {
    gemini: Option<GeminiClient>,
    chat_model: String,
    tts_model: String,
    tts_voice: String,
    output: Box<dyn AudioOutput>,
}

impl TutorClient {
    /// Create a client
    ///
    /// Without a `GeminiClient` every remote call fails, so speech always
    /// uses the platform voice.
    #[must_use]
    pub fn new(
        gemini: Option<GeminiClient>,
        config: &GeminiConfig,
        output: Box<dyn AudioOutput>,
    ) -> Self {
        Self {
            gemini,
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
            output,
        }
    }

    /// Create a client from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let gemini = match GeminiClient::from_config(&config.gemini) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "remote tutor unavailable");
                None
            }
        };

        let output: Box<dyn AudioOutput> = if config.voice.enabled {
            Box::new(DeviceOutput::new(&config.voice.locale))
        } else {
            Box::new(SilentOutput)
        };

        Self::new(gemini, &config.gemini, output)
    }

    fn gemini(&self) -> Result<&GeminiClient> {
        self.gemini
            .as_ref()
            .ok_or_else(|| Error::Config("Gemini API key not configured".to_string()))
    }

    /// Synthesize speech for `text` as 24kHz mono samples
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the reply holds no audio
    pub async fn synthesize(&self, text: &str) -> Result<Vec<f32>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(text)],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec![Modality::Audio]),
                speech_config: Some(SpeechConfig::prebuilt(&self.tts_voice)),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .gemini()?
            .generate_content(&self.tts_model, &request)
            .await?;
        let blob = response
            .inline_data()
            .ok_or_else(|| Error::Tts("response held no audio".to_string()))?;

        let samples = decode_pcm16_base64(&blob.data)?;
        tracing::debug!(samples = samples.len(), mime = %blob.mime_type, "synthesized speech");
        Ok(samples)
    }

    async fn speak_native(&self, text: &str) {
        if let Err(e) = self.output.speak_native(text).await {
            tracing::warn!(error = %e, "platform voice failed");
        }
    }
}

#[async_trait]
impl Speaker for TutorClient {
    async fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        match self.synthesize(text).await {
            Ok(samples) => {
                if let Err(e) = self.output.play(samples, TTS_SAMPLE_RATE).await {
                    tracing::warn!(error = %e, "playback failed, using platform voice");
                    self.speak_native(text).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech generation failed, using platform voice");
                self.speak_native(text).await;
            }
        }
    }
}

#[async_trait]
impl Tutor for TutorClient {
    async fn analyze_speech(&self, transcript: &str, target: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(
                Role::User,
                prompt::analysis_prompt(transcript, target),
            )],
            ..GenerateContentRequest::default()
        };

        let response = self
            .gemini()?
            .generate_content(&self.chat_model, &request)
            .await?;
        Ok(response.text().unwrap_or_default())
    }

    async fn chat_reply(&self, history: &[Content], tutor_mode: bool) -> Result<ChatReply> {
        let request = GenerateContentRequest {
            contents: history.to_vec(),
            system_instruction: Some(Content::instruction(prompt::chat_instruction(tutor_mode))),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompt::chat_response_schema()),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .gemini()?
            .generate_content(&self.chat_model, &request)
            .await?;
        let raw = response.text().unwrap_or_default();
        Ok(ChatReply::parse(&raw))
    }
}
