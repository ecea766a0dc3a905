//! Lesson and vocabulary content
//!
//! Content is compiled into the binary as JSON and parsed once at startup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of lessons shown in the dashboard quick-practice grid
pub const QUICK_PRACTICE_LESSONS: usize = 4;

const EMBEDDED_LESSONS: &str = include_str!("../content/lessons.json");
const EMBEDDED_VOCABULARY: &str = include_str!("../content/vocabulary.json");

/// A single phrase the learner practices saying
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    pub id: String,
    /// Target-language text
    pub english: String,
    /// Native-language text
    pub hindi: String,
    /// When to use the phrase, in Hindi
    pub explanation: String,
}

/// A themed group of phrases
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub hindi_title: String,
    pub icon: String,
    pub phrases: Vec<Phrase>,
}

/// A vocabulary card
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabWord {
    pub id: String,
    pub hindi: String,
    pub english: String,
    pub example: String,
}

impl VocabWord {
    /// Uppercased first letter of the English word, shown as the card badge
    #[must_use]
    pub fn badge(&self) -> String {
        self.english
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// All static content shown by the app
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    vocabulary: Vec<VocabWord>,
}

impl Catalog {
    /// Load the content compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns error if the embedded JSON is malformed
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_LESSONS, EMBEDDED_VOCABULARY)
    }

    /// Parse content from lesson and vocabulary JSON arrays
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or a phrase id repeats
    pub fn from_json(lessons_json: &str, vocabulary_json: &str) -> Result<Self> {
        let lessons: Vec<Lesson> = serde_json::from_str(lessons_json)
            .map_err(|e| Error::Content(format!("failed to parse lessons: {e}")))?;
        let vocabulary: Vec<VocabWord> = serde_json::from_str(vocabulary_json)
            .map_err(|e| Error::Content(format!("failed to parse vocabulary: {e}")))?;

        let mut seen = HashSet::new();
        for phrase in lessons.iter().flat_map(|l| &l.phrases) {
            if !seen.insert(phrase.id.as_str()) {
                return Err(Error::Content(format!("duplicate phrase id: {}", phrase.id)));
            }
        }

        tracing::debug!(
            lessons = lessons.len(),
            phrases = seen.len(),
            words = vocabulary.len(),
            "loaded content"
        );

        Ok(Self {
            lessons,
            vocabulary,
        })
    }

    /// All lessons in display order
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// All vocabulary cards in display order
    #[must_use]
    pub fn vocabulary(&self) -> &[VocabWord] {
        &self.vocabulary
    }

    /// Lessons featured on the dashboard
    #[must_use]
    pub fn quick_practice(&self) -> &[Lesson] {
        &self.lessons[..self.lessons.len().min(QUICK_PRACTICE_LESSONS)]
    }

    /// Find a lesson by id
    #[must_use]
    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Find a phrase by id across all lessons
    #[must_use]
    pub fn phrase(&self, id: &str) -> Option<&Phrase> {
        self.lessons
            .iter()
            .flat_map(|l| &l.phrases)
            .find(|p| p.id == id)
    }

    /// Find a phrase by id, failing with `NotFound`
    ///
    /// # Errors
    ///
    /// Returns error if no lesson contains the phrase
    pub fn require_phrase(&self, id: &str) -> Result<&Phrase> {
        self.phrase(id)
            .ok_or_else(|| Error::NotFound(format!("phrase {id}")))
    }
}
