//! Tutor client tests against an in-process generative API

use axum::http::StatusCode;
use base64::Engine;
use bol_india::genai::{Content, Role};
use bol_india::prompt::chat_instruction;
use bol_india::voice::TTS_SAMPLE_RATE;
use bol_india::{Speaker, Tutor};

mod common;
use common::{FakeGemini, RecordingOutput, audio_response, text_response};

fn pcm_base64(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test]
async fn test_chat_request_shape() {
    let server = FakeGemini::replying_text(
        r#"{"english": "Hello!", "hindi": "नमस्ते!", "explanation": ""}"#,
    )
    .await;
    let tutor = server.tutor(RecordingOutput::default());

    let history = vec![Content::text(Role::User, "Hi")];
    let reply = tutor.chat_reply(&history, false).await.unwrap();
    assert_eq!(reply.text, "Hello!");
    assert_eq!(reply.translation, "नमस्ते!");
    assert!(reply.note.is_empty());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/v1beta/models/chat-model:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let body = &request.body;
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Hi");
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        chat_instruction(false)
    );
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        serde_json::json!(["english", "hindi", "explanation"])
    );
}

#[tokio::test]
async fn test_tutor_mode_changes_only_instruction() {
    let server = FakeGemini::replying_text(r#"{"english": "Ok"}"#).await;
    let tutor = server.tutor(RecordingOutput::default());
    let history = vec![
        Content::text(Role::Model, "Hello!"),
        Content::text(Role::User, "Correct my grammar"),
    ];

    tutor.chat_reply(&history, false).await.unwrap();
    tutor.chat_reply(&history, true).await.unwrap();

    let requests = server.requests();
    let (plain, teaching) = (&requests[0].body, &requests[1].body);
    assert_eq!(plain["contents"], teaching["contents"]);
    assert_eq!(plain["generationConfig"], teaching["generationConfig"]);
    assert_ne!(plain["systemInstruction"], teaching["systemInstruction"]);
    assert_eq!(
        teaching["systemInstruction"]["parts"][0]["text"],
        chat_instruction(true)
    );
}

#[tokio::test]
async fn test_non_json_reply_degrades_to_raw_text() {
    let server = FakeGemini::replying_text("Let's talk about cricket!").await;
    let tutor = server.tutor(RecordingOutput::default());

    let reply = tutor.chat_reply(&[], false).await.unwrap();
    assert_eq!(reply.text, "Let's talk about cricket!");
    assert!(reply.translation.is_empty());
    assert!(reply.note.is_empty());
}

#[tokio::test]
async fn test_chat_error_status_propagates() {
    let server =
        FakeGemini::start(|_| (StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string())).await;
    let tutor = server.tutor(RecordingOutput::default());

    assert!(tutor.chat_reply(&[], true).await.is_err());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_analyze_speech_returns_text() {
    let server = FakeGemini::replying_text("90% सही! 'are' पर ध्यान दें।").await;
    let tutor = server.tutor(RecordingOutput::default());

    let feedback = tutor
        .analyze_speech("how you are", "How are you?")
        .await
        .unwrap();
    assert_eq!(feedback, "90% सही! 'are' पर ध्यान दें।");

    let body = &server.requests()[0].body;
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("how you are"));
    assert!(prompt.contains("How are you?"));
    assert!(body.get("systemInstruction").is_none());
}

#[tokio::test]
async fn test_speak_plays_synthesized_audio() {
    let data = pcm_base64(&[0, 1000, -1000, i16::MAX]);
    let server = FakeGemini::start(move |_| (StatusCode::OK, audio_response(&data))).await;
    let output = RecordingOutput::default();
    let tutor = server.tutor(output.clone());

    tutor.speak("Good morning").await;

    assert_eq!(*output.played.lock().unwrap(), vec![(4, TTS_SAMPLE_RATE)]);
    assert!(output.native.lock().unwrap().is_empty());

    let request = &server.requests()[0];
    assert_eq!(request.path, "/v1beta/models/tts-model:generateContent");
    assert_eq!(
        request.body["generationConfig"]["responseModalities"],
        serde_json::json!(["AUDIO"])
    );
    assert_eq!(
        request.body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
            ["voiceName"],
        "Kore"
    );
}

#[tokio::test]
async fn test_speak_falls_back_without_audio() {
    let server = FakeGemini::start(|_| (StatusCode::OK, text_response("no audio here"))).await;
    let output = RecordingOutput::default();
    let tutor = server.tutor(output.clone());

    tutor.speak("Thank you").await;

    assert!(output.played.lock().unwrap().is_empty());
    assert_eq!(*output.native.lock().unwrap(), vec!["Thank you".to_string()]);
}

#[tokio::test]
async fn test_speak_falls_back_on_server_error() {
    let server = FakeGemini::start(|_| (StatusCode::SERVICE_UNAVAILABLE, String::new())).await;
    let output = RecordingOutput::default();
    let tutor = server.tutor(output.clone());

    tutor.speak("Please").await;

    assert_eq!(*output.native.lock().unwrap(), vec!["Please".to_string()]);
}

#[tokio::test]
async fn test_speak_falls_back_when_playback_fails() {
    let data = pcm_base64(&[0, 1, 2]);
    let server = FakeGemini::start(move |_| (StatusCode::OK, audio_response(&data))).await;
    let output = RecordingOutput {
        fail_play: true,
        ..RecordingOutput::default()
    };
    let tutor = server.tutor(output.clone());

    tutor.speak("Sorry").await;

    assert_eq!(*output.native.lock().unwrap(), vec!["Sorry".to_string()]);
}
