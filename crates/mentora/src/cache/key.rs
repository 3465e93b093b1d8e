use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

use crate::profile::ClassLevel;

/// Kind of generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Lesson,
    Quiz,
    DiagnosticQuiz,
    Flashcards,
    EssayPrompt,
    EssayFeedback,
    Summary,
    StudyPlan,
    Image,
    Explanation,
}

impl ContentKind {
    /// Whether generated content of this kind is shared between requests.
    /// Personalized kinds are never cached.
    pub fn is_cacheable(self) -> bool {
        matches!(
            self,
            ContentKind::Lesson
                | ContentKind::Quiz
                | ContentKind::DiagnosticQuiz
                | ContentKind::Flashcards
        )
    }
}

/// Deterministic cache key
///
/// Rendered as `kind::topic::class_level[::extra]` with the topic normalized,
/// so identical requests always land on the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(kind: ContentKind, topic: &str, class_level: &ClassLevel) -> Self {
        Self(format!(
            "{}::{}::{}",
            kind,
            normalize_topic(topic),
            class_level
        ))
    }

    /// Append a quantity or other request parameter
    pub fn with_extra(self, extra: impl fmt::Display) -> Self {
        Self(format!("{}::{}", self.0, extra))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase and collapse whitespace in a free-text topic name
pub fn normalize_topic(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
