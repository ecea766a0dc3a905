//! Client for the generative language `generateContent` API

mod types;

pub use types::{
    Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Modality, Part, PrebuiltVoiceConfig, Role, SpeechConfig, VoiceConfig,
};

use secrecy::{ExposeSecret, SecretString};

use crate::config::GeminiConfig;
use crate::{Error, Result};

/// Sends single `generateContent` requests
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GeminiClient {
    /// Create a client for the given base URL
    ///
    /// # Errors
    ///
    /// Returns error if API key is empty
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Gemini API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let key = config
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;
        Self::new(
            &config.base_url,
            SecretString::from(key.expose_secret().to_string()),
        )
    }

    /// Generate content with a model
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API returns an error status
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        tracing::debug!(model, turns = request.contents.len(), "sending generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "generateContent request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(Error::Chat(format!("Gemini API error {status}: {body}")));
        }

        let result: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        Ok(result)
    }
}
