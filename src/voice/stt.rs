//! Speech-to-text (STT) processing

use secrecy::{ExposeSecret, SecretString};

use crate::config::{ApiKeys, SttProviderKind, VoiceConfig};
use crate::{Error, Result};

/// `OpenAI` API base URL
pub const WHISPER_BASE_URL: &str = "https://api.openai.com";

/// Deepgram API base URL
pub const DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from Deepgram transcription API
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// Transcribes one recorded utterance to text
pub struct SpeechToText {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    locale: String,
    provider: SttProviderKind,
}

impl SpeechToText {
    /// Create a transcriber for a provider and locale
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the API key is empty
    pub fn new(
        provider: SttProviderKind,
        api_key: SecretString,
        model: String,
        locale: String,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            let name = match provider {
                SttProviderKind::Whisper => "OpenAI",
                SttProviderKind::Deepgram => "Deepgram",
            };
            return Err(Error::Unsupported(format!(
                "{name} API key required for speech recognition"
            )));
        }

        let base_url = match provider {
            SttProviderKind::Whisper => WHISPER_BASE_URL,
            SttProviderKind::Deepgram => DEEPGRAM_BASE_URL,
        };

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key,
            model,
            locale,
            provider,
        })
    }

    /// Create a transcriber from voice configuration
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the selected provider has no key
    pub fn from_config(voice: &VoiceConfig, keys: &ApiKeys) -> Result<Self> {
        let key = keys
            .for_stt(voice.stt_provider)
            .map_or_else(String::new, |k| k.expose_secret().to_string());
        Self::new(
            voice.stt_provider,
            SecretString::from(key),
            voice.stt_model.clone(),
            voice.locale.clone(),
        )
    }

    /// Point the transcriber at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Transcribe WAV audio to text
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match self.provider {
            SttProviderKind::Whisper => self.transcribe_whisper(audio).await,
            SttProviderKind::Deepgram => self.transcribe_deepgram(audio).await,
        }
    }

    /// Transcribe using `OpenAI` Whisper
    async fn transcribe_whisper(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", language_code(&self.locale).to_string());

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    /// Transcribe using Deepgram
    async fn transcribe_deepgram(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Deepgram transcription");

        let url = format!(
            "{}/v1/listen?model={}&language={}&punctuate=true",
            self.base_url, self.model, self.locale
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Token {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Deepgram request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Deepgram API error");
            return Err(Error::Stt(format!("Deepgram API error {status}: {body}")));
        }

        let result: DeepgramResponse = response.json().await?;

        let transcript = result
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.transcript.clone())
            .unwrap_or_default();

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

/// ISO-639-1 language code of a BCP-47 locale ("en-US" -> "en")
#[must_use]
pub fn language_code(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_strips_region() {
        assert_eq!(language_code("en-US"), "en");
        assert_eq!(language_code("hi_IN"), "hi");
        assert_eq!(language_code("en"), "en");
    }

    #[test]
    fn missing_key_means_unsupported() {
        let result = SpeechToText::new(
            SttProviderKind::Deepgram,
            SecretString::from(String::new()),
            "nova-2".to_string(),
            "en-US".to_string(),
        );
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }
}
