pub mod content;
pub mod diagnostic;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod schema;
pub mod service;

pub use content::{
    DiagnosticQuestion, Difficulty, EssayFeedback, EssayPrompt, Flashcard, GeneratedImage,
    LessonContent, LessonSection, QuizQuestion, StudyDay, StudyPlan, Summary, TopicRef,
};
pub use diagnostic::{DiagnosticAnalysis, DiagnosticAnswer, analyze};
pub use error::{GenerationError, Result};
pub use service::{GenerationModels, GenerationService, MAX_ITEMS};
