//! Typed payloads returned by the generation facade

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::{GenerationError, Result};

/// Topic identifier paired with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: String,
    pub name: String,
}

impl TopicRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSection {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    /// Injected from the request; the model is not authoritative for it
    #[serde(default)]
    pub topic_id: Option<String>,
    pub title: String,
    pub introduction: String,
    pub sections: Vec<LessonSection>,
    pub key_points: Vec<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default)]
    pub topic_id: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
    pub difficulty: Difficulty,
}

/// Diagnostic question tagged with the topic it probes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticQuestion {
    pub topic_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayPrompt {
    pub prompt: String,
    pub guidelines: Vec<String>,
    pub suggested_word_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayFeedback {
    /// 1 to 10
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDay {
    pub day: u32,
    pub focus_topic: String,
    pub activities: Vec<String>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub title: String,
    pub days: Vec<StudyDay>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

fn check_choices(question: &str, options: &[String], correct: usize) -> Result<()> {
    if options.len() < 2 {
        return Err(GenerationError::MalformedResponse(format!(
            "question '{}' has fewer than two options",
            question
        )));
    }
    if correct >= options.len() {
        return Err(GenerationError::MalformedResponse(format!(
            "question '{}' points at option {} of {}",
            question,
            correct,
            options.len()
        )));
    }
    Ok(())
}

impl QuizQuestion {
    pub(crate) fn validate(&self) -> Result<()> {
        check_choices(&self.question, &self.options, self.correct_answer_index)
    }
}

impl DiagnosticQuestion {
    pub(crate) fn validate(&self) -> Result<()> {
        check_choices(&self.question, &self.options, self.correct_answer_index)
    }
}

impl EssayFeedback {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.overall_score) {
            return Err(GenerationError::MalformedResponse(format!(
                "essay score {} out of range",
                self.overall_score
            )));
        }
        Ok(())
    }
}
