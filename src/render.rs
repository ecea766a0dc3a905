//! Plain-text screens for the terminal
//!
//! Every function returns a `String`; printing is the caller's job.

use std::fmt::Write as _;

use crate::content::Catalog;
use crate::conversation::{ChatRole, ConversationSession};
use crate::practice::{PracticeSession, PracticeState};
use crate::progress::UserProgress;
use crate::shell::{Shell, View};

const RULE: &str = "────────────────────────────────────────";

/// App header with the points badge
#[must_use]
pub fn header(points: u32) -> String {
    format!("Bol India  बोल इंडिया{:>18}\n{RULE}\n", format!("★ {points}"))
}

/// Bottom navigation bar, active screen bracketed
#[must_use]
pub fn nav(active: View) -> String {
    let items: Vec<String> = View::ALL
        .iter()
        .map(|&v| {
            if v == active {
                format!("[{}]", v.label())
            } else {
                format!(" {} ", v.label())
            }
        })
        .collect();
    format!("{RULE}\n{}\n", items.join("  "))
}

#[must_use]
pub fn dashboard(catalog: &Catalog, progress: &UserProgress) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "नमस्ते! आज कुछ नया सीखें");
    let _ = writeln!(out, "Master daily English conversations.\n");
    let _ = writeln!(out, "  Total Points: {}", progress.total_points);
    let _ = writeln!(out, "  Streak:       {} Day\n", progress.streak);

    let _ = writeln!(out, "Quick Practice");
    for lesson in catalog.quick_practice() {
        let _ = writeln!(out, "  {} {}  {}", lesson.icon, lesson.title, lesson.hindi_title);
    }

    let _ = writeln!(out, "\nAI Speaking Partner");
    let _ = writeln!(
        out,
        "  Practice real-life conversations with our AI teacher. It's safe and helpful!"
    );
    out
}

#[must_use]
pub fn lessons(catalog: &Catalog) -> String {
    let mut out = String::from("Daily Lessons\n");
    for lesson in catalog.lessons() {
        let _ = writeln!(
            out,
            "\n{} {}  {}",
            lesson.icon, lesson.title, lesson.hindi_title
        );
        for phrase in &lesson.phrases {
            let _ = writeln!(out, "  [{}] {}", phrase.id, phrase.english);
            let _ = writeln!(out, "       {}", phrase.hindi);
        }
    }
    out
}

#[must_use]
pub fn vocabulary(catalog: &Catalog) -> String {
    let mut out = String::from("Daily Vocabulary\n");
    for word in catalog.vocabulary() {
        let _ = writeln!(out, "\n ({}) {}", word.badge(), word.english);
        let _ = writeln!(out, "     {}", word.hindi);
        let _ = writeln!(out, "     Example: \"{}\"", word.example);
    }
    out
}

/// Practice overlay
#[must_use]
pub fn practice(session: &PracticeSession) -> String {
    let phrase = session.phrase();
    let mut out = String::from("Speaking Practice\n\n");
    let _ = writeln!(out, "  {}", phrase.hindi);
    let _ = writeln!(out, "  {}", phrase.english);
    if !phrase.explanation.is_empty() {
        let _ = writeln!(out, "  ({})", phrase.explanation);
    }

    if let Some(transcript) = session.transcript() {
        let _ = writeln!(out, "\nYou said:\n  \"{transcript}\"");
    }

    if let Some(feedback) = session.feedback() {
        let mark = if session.state() == PracticeState::Success {
            "✓"
        } else {
            "!"
        };
        let _ = writeln!(out, "\n{mark} {feedback}");
    }

    if let Some(notice) = session.notice() {
        let _ = writeln!(out, "\n{notice}");
    }

    let _ = writeln!(out, "\n{}", session.state().caption());
    out
}

/// Conversation transcript with status and suggestions
#[must_use]
pub fn conversation(session: &ConversationSession) -> String {
    let mode = if session.tutor_mode() {
        "TUTOR MODE ON"
    } else {
        "CONVERSATION"
    };
    let mut out = format!("Bol India AI  [{mode}]\n");
    if session.tutor_mode() {
        let _ = writeln!(out, "  Speak to ask about words or grammar!");
    }

    for message in session.messages() {
        match message.role {
            ChatRole::User => {
                let _ = writeln!(out, "\n{:>40}", format!("You: {}", message.text));
            }
            ChatRole::Assistant => {
                let _ = writeln!(out, "\nAI: {}", message.text);
                if let Some(translation) = &message.translation {
                    let _ = writeln!(out, "    {translation}");
                }
                if let Some(note) = &message.note {
                    let _ = writeln!(out, "    Teacher's Note: {note}");
                }
            }
        }
    }

    if let Some(label) = session.thinking_label() {
        let _ = writeln!(out, "\n{label}");
    }

    let suggestions = session.suggestions();
    if !suggestions.is_empty() {
        let _ = writeln!(out, "\nTry asking:");
        for suggestion in suggestions {
            let _ = writeln!(out, "  • {suggestion}");
        }
    }
    out
}

/// Full screen for the shell's current state
#[must_use]
pub fn screen(shell: &Shell) -> String {
    let body = if let Some(session) = shell.practice() {
        practice(session)
    } else {
        match shell.view() {
            View::Dashboard => dashboard(shell.catalog(), shell.progress()),
            View::Lessons => lessons(shell.catalog()),
            View::Vocabulary => vocabulary(shell.catalog()),
            View::Conversation => shell
                .conversation()
                .map(conversation)
                .unwrap_or_default(),
        }
    };

    format!("{}{body}\n{}", header(shell.points()), nav(shell.view()))
}
