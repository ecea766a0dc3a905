//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use bol_india::config::GeminiConfig;
use bol_india::genai::{Content, GeminiClient};
use bol_india::voice::{AudioOutput, SpeechRecognizer};
use bol_india::{ChatReply, Error, Result, Speaker, Tutor, TutorClient};
use secrecy::SecretString;
use serde_json::{Value, json};

/// Tutor with scripted answers that records every request
#[derive(Clone, Default)]
pub struct RecordingTutor {
    analysis: Arc<Mutex<VecDeque<Result<String>>>>,
    replies: Arc<Mutex<VecDeque<Result<ChatReply>>>>,
    pub chat_calls: Arc<Mutex<Vec<(Vec<Content>, bool)>>>,
    pub analysis_calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingTutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(self, result: Result<String>) -> Self {
        self.analysis.lock().unwrap().push_back(result);
        self
    }

    pub fn with_reply(self, result: Result<ChatReply>) -> Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn chat_calls(&self) -> Vec<(Vec<Content>, bool)> {
        self.chat_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tutor for RecordingTutor {
    async fn analyze_speech(&self, transcript: &str, target: &str) -> Result<String> {
        self.analysis_calls
            .lock()
            .unwrap()
            .push((transcript.to_string(), target.to_string()));
        self.analysis
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn chat_reply(&self, history: &[Content], tutor_mode: bool) -> Result<ChatReply> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((history.to_vec(), tutor_mode));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Chat("no scripted reply".to_string())))
    }
}

/// Speaker that remembers what it was asked to say
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Recognizer returning queued results, then silence
#[derive(Default)]
pub struct ScriptedRecognizer {
    results: Mutex<VecDeque<Result<Option<String>>>>,
}

impl ScriptedRecognizer {
    pub fn saying(text: &str) -> Self {
        Self::with(Ok(Some(text.to_string())))
    }

    pub fn with(result: Result<Option<String>>) -> Self {
        let recognizer = Self::default();
        recognizer.results.lock().unwrap().push_back(result);
        recognizer
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize_once(&self) -> Result<Option<String>> {
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Audio sink recording played buffers and platform-voice requests
#[derive(Clone, Default)]
pub struct RecordingOutput {
    pub played: Arc<Mutex<Vec<(usize, u32)>>>,
    pub native: Arc<Mutex<Vec<String>>>,
    pub fail_play: bool,
}

#[async_trait]
impl AudioOutput for RecordingOutput {
    async fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        if self.fail_play {
            return Err(Error::Audio("no output device".to_string()));
        }
        self.played.lock().unwrap().push((samples.len(), sample_rate));
        Ok(())
    }

    async fn speak_native(&self, text: &str) -> Result<()> {
        self.native.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A request seen by the fake API
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub raw: Vec<u8>,
    pub body: Value,
}

impl SeenRequest {
    /// Raw body as lossy UTF-8, for multipart assertions
    pub fn raw_text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

type Responder = Arc<dyn Fn(&Value) -> (StatusCode, String) + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    respond: Responder,
}

/// In-process stand-in for the `generateContent` and transcription APIs
pub struct FakeGemini {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeGemini {
    /// Serve every request with `respond`
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Value) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            seen: seen.clone(),
            respond: Arc::new(respond),
        };

        let app = axum::Router::new().fallback(handle).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }

    /// Always answer with one candidate holding `text`
    pub async fn replying_text(text: &str) -> Self {
        let body = text_response(text);
        Self::start(move |_| (StatusCode::OK, body.clone())).await
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Tutor client pointed at this server, with a recording output
    pub fn tutor(&self, output: RecordingOutput) -> TutorClient {
        let client = GeminiClient::new(&self.base_url, SecretString::from("test-key".to_string()))
            .unwrap();
        TutorClient::new(Some(client), &gemini_config(&self.base_url), Box::new(output))
    }
}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let (status, reply) = (state.respond)(&json);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        api_key: header("x-goog-api-key"),
        authorization: header("authorization"),
        content_type: header("content-type"),
        raw: body.to_vec(),
        body: json,
    });

    (status, [("content-type", "application/json")], reply)
}

/// Gemini settings used by test clients
pub fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: Some(SecretString::from("test-key".to_string())),
        base_url: base_url.to_string(),
        chat_model: "chat-model".to_string(),
        tts_model: "tts-model".to_string(),
        tts_voice: "Kore".to_string(),
    }
}

/// A `generateContent` response with one text part
pub fn text_response(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// A `generateContent` response with one inline audio part
pub fn audio_response(base64_pcm: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "inlineData": { "mimeType": "audio/L16;rate=24000", "data": base64_pcm } }]
            }
        }]
    })
    .to_string()
}
