//! Instruction templates sent to the generative model
//!
//! The tutoring behavior lives here: every remote call is one of these
//! templates plus the learner's words.

/// Seed turn that asks the model for an opening line
pub const GREETING_SEED: &str = "Start our conversation with a warm greeting.";

/// Canned questions offered in tutor mode
pub const TUTOR_SUGGESTIONS: [&str; 4] = [
    "What does 'Beautiful' mean?",
    "How to use 'have' and 'has'?",
    "Correct my grammar",
    "Explain 'Past Tense'",
];

const TUTOR_MODE: &str = "You are in TUTOR MODE. Your primary goal is to teach:
1. If the user makes a grammar mistake in their English input, correct it and explain the grammatical rule in simple Hindi.
2. If the user asks \"What does [word] mean?\" or similar vocabulary questions using voice, provide a clear meaning, usage example, and Hindi explanation.
3. If asked about grammar (e.g., \"When to use 'have'?\"), provide a structured explanation in Hindi.
4. Always maintain a friendly, encouraging tone.
5. Use simple Hindi script for all teaching points.";

const CONVERSATION_MODE: &str = "You are in CONVERSATION MODE. Focus on keeping a natural flow. \
Respond in simple English and provide a direct Hindi translation.";

const REPLY_FORMAT: &str = r#"Format your response as a JSON object with keys "english", "hindi", and "explanation".
"english": Your conversational response or direct answer in English.
"hindi": The Hindi translation of your English response.
"explanation": In Tutor Mode, use this for the grammatical correction or word meaning in Hindi. In Conversation Mode, leave this empty.
Example Tutor Response: {"english": "The correct sentence is 'He goes to school' because 'He' is third person singular.", "hindi": "सही वाक्य 'He goes to school' है क्योंकि 'He' के साथ 'goes' का प्रयोग होता है।", "explanation": "Grammar Tip: Third person singular (He/She/It) के साथ verb में 's' या 'es' लगता है।"}"#;

/// System instruction for the chat endpoint
#[must_use]
pub fn chat_instruction(tutor_mode: bool) -> String {
    let mode = if tutor_mode {
        TUTOR_MODE
    } else {
        CONVERSATION_MODE
    };

    format!(
        "You are an English speaking partner and teacher for beginners in India.\n{mode}\n{REPLY_FORMAT}"
    )
}

/// JSON schema the chat reply must follow
#[must_use]
pub fn chat_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "english": { "type": "STRING" },
            "hindi": { "type": "STRING" },
            "explanation": { "type": "STRING" }
        },
        "required": ["english", "hindi", "explanation"]
    })
}

/// Prompt asking for short pronunciation feedback in Hindi
#[must_use]
pub fn analysis_prompt(transcript: &str, target: &str) -> String {
    format!(
        "Compare the user's spoken text: \"{transcript}\" with the target text: \"{target}\".
Provide feedback in simple Hindi (written in Hindi script).
Focus on encouraging the user.
1. Accuracy percentage.
2. One tip for improvement in easy Hindi.
Keep the feedback very short and beginner-friendly."
    )
}
