use mentora_core::{ContentPart, GenerationOutput, GenerationRequest, SharedGenerator};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use super::content::{
    DiagnosticQuestion, EssayFeedback, EssayPrompt, Flashcard, GeneratedImage, LessonContent,
    QuizQuestion, StudyPlan, Summary, TopicRef,
};
use super::{GenerationError, Result, parse, prompt, schema};
use crate::cache::{CacheKey, ContentCache, ContentKind};
use crate::profile::ClassLevel;

/// Upper bound on questions or cards per request
pub const MAX_ITEMS: usize = 20;

/// Model identifiers used by the facade
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationModels {
    pub text: String,
    pub image: String,
}

impl Default for GenerationModels {
    fn default() -> Self {
        Self {
            text: "gemini-2.0-flash".to_string(),
            image: "gemini-2.0-flash-preview-image-generation".to_string(),
        }
    }
}

/// Generation facade: prompt, call, parse, cache
#[derive(Clone)]
pub struct GenerationService {
    generator: SharedGenerator,
    cache: Arc<dyn ContentCache>,
    models: GenerationModels,
}

impl GenerationService {
    /// Create a new GenerationService
    pub fn new(
        generator: SharedGenerator,
        cache: Arc<dyn ContentCache>,
        models: GenerationModels,
    ) -> Self {
        Self {
            generator,
            cache,
            models,
        }
    }

    /// Lesson content for a topic
    pub async fn lesson_content(
        &self,
        topic: &TopicRef,
        subject: &str,
        class_level: &ClassLevel,
    ) -> Result<LessonContent> {
        let key = CacheKey::new(ContentKind::Lesson, &topic.name, class_level);
        let mut lesson: LessonContent = match self.lookup(&key).await {
            Some(cached) => cached,
            None => {
                let request = self
                    .text_request(prompt::lesson(topic, subject, class_level))
                    .with_schema(schema::lesson());
                let lesson: LessonContent =
                    self.generate_json(ContentKind::Lesson, request).await?;
                require_items(ContentKind::Lesson, &lesson.sections)?;
                self.store(key, ContentKind::Lesson, &lesson);
                lesson
            }
        };

        lesson.topic_id = Some(topic.id.clone());
        Ok(lesson)
    }

    /// Multiple-choice quiz for a topic
    pub async fn quiz(
        &self,
        topic: &TopicRef,
        class_level: &ClassLevel,
        count: usize,
    ) -> Result<Vec<QuizQuestion>> {
        let count = count.clamp(1, MAX_ITEMS);
        let key = CacheKey::new(ContentKind::Quiz, &topic.name, class_level).with_extra(count);
        let mut questions: Vec<QuizQuestion> = match self.lookup(&key).await {
            Some(cached) => cached,
            None => {
                let request = self
                    .text_request(prompt::quiz(topic, class_level, count))
                    .with_schema(schema::quiz());
                let questions: Vec<QuizQuestion> =
                    self.generate_json(ContentKind::Quiz, request).await?;
                require_items(ContentKind::Quiz, &questions)?;
                for question in &questions {
                    question.validate()?;
                }
                self.store(key, ContentKind::Quiz, &questions);
                questions
            }
        };

        for question in &mut questions {
            question.topic_id = Some(topic.id.clone());
        }
        Ok(questions)
    }

    /// Diagnostic quiz spanning several topics of one subject
    ///
    /// Every question must be tagged with a topic ID from `topics`.
    pub async fn diagnostic_quiz(
        &self,
        subject: &str,
        topics: &[TopicRef],
        class_level: &ClassLevel,
        count: usize,
    ) -> Result<Vec<DiagnosticQuestion>> {
        if topics.is_empty() {
            return Err(GenerationError::Generic(
                "diagnostic quiz needs at least one topic".to_string(),
            ));
        }

        let count = count.clamp(1, MAX_ITEMS);
        let key =
            CacheKey::new(ContentKind::DiagnosticQuiz, subject, class_level).with_extra(count);
        if let Some(cached) = self.lookup::<Vec<DiagnosticQuestion>>(&key).await {
            if cached
                .iter()
                .all(|q| topics.iter().any(|t| t.id == q.topic_id))
            {
                return Ok(cached);
            }
            debug!(cache_key = %key, "cached diagnostic quiz references other topics, regenerating");
        }

        let topic_ids: Vec<&str> = topics.iter().map(|t| t.id.as_str()).collect();
        let request = self
            .text_request(prompt::diagnostic_quiz(subject, topics, class_level, count))
            .with_schema(schema::diagnostic_quiz(&topic_ids));
        let questions: Vec<DiagnosticQuestion> = self
            .generate_json(ContentKind::DiagnosticQuiz, request)
            .await?;
        require_items(ContentKind::DiagnosticQuiz, &questions)?;

        for question in &questions {
            question.validate()?;
            if !topic_ids.contains(&question.topic_id.as_str()) {
                return Err(GenerationError::MalformedResponse(format!(
                    "question '{}' tagged with unknown topic '{}'",
                    question.question, question.topic_id
                )));
            }
        }

        self.store(key, ContentKind::DiagnosticQuiz, &questions);
        Ok(questions)
    }

    /// Flashcards for a topic
    pub async fn flashcards(
        &self,
        topic: &TopicRef,
        class_level: &ClassLevel,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        let count = count.clamp(1, MAX_ITEMS);
        let key =
            CacheKey::new(ContentKind::Flashcards, &topic.name, class_level).with_extra(count);
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let request = self
            .text_request(prompt::flashcards(topic, class_level, count))
            .with_schema(schema::flashcards());
        let cards: Vec<Flashcard> = self.generate_json(ContentKind::Flashcards, request).await?;
        require_items(ContentKind::Flashcards, &cards)?;
        self.store(key, ContentKind::Flashcards, &cards);
        Ok(cards)
    }

    /// Essay assignment; not cached
    pub async fn essay_prompt(&self, topic: &str, class_level: &ClassLevel) -> Result<EssayPrompt> {
        let request = self
            .text_request(prompt::essay_prompt(topic, class_level))
            .with_schema(schema::essay_prompt());
        self.generate_json(ContentKind::EssayPrompt, request).await
    }

    /// Feedback on a student's essay; not cached
    pub async fn essay_feedback(
        &self,
        essay_prompt: &str,
        essay: &str,
        class_level: &ClassLevel,
    ) -> Result<EssayFeedback> {
        let request = self
            .text_request(prompt::essay_feedback(essay_prompt, essay, class_level))
            .with_schema(schema::essay_feedback());
        let feedback: EssayFeedback = self
            .generate_json(ContentKind::EssayFeedback, request)
            .await?;
        feedback.validate()?;
        Ok(feedback)
    }

    /// Summary of arbitrary text; not cached
    pub async fn summary(&self, text: &str, class_level: &ClassLevel) -> Result<Summary> {
        let request = self
            .text_request(prompt::summary(text, class_level))
            .with_schema(schema::summary());
        self.generate_json(ContentKind::Summary, request).await
    }

    /// Multi-day plan targeting the student's weak topics; not cached
    pub async fn study_plan(
        &self,
        weaknesses: &[String],
        class_level: &ClassLevel,
        days: u32,
    ) -> Result<StudyPlan> {
        let request = self
            .text_request(prompt::study_plan(weaknesses, class_level, days.clamp(1, 14)))
            .with_schema(schema::study_plan());
        self.generate_json(ContentKind::StudyPlan, request).await
    }

    /// Educational illustration; not cached
    pub async fn image(&self, description: &str) -> Result<GeneratedImage> {
        let request = GenerationRequest::image(&self.models.image, prompt::image(description));
        let response = self.call(ContentKind::Image, request).await?;

        match response {
            GenerationOutput::Image { mime_type, data } => Ok(GeneratedImage { mime_type, data }),
            GenerationOutput::Text { .. } => Err(GenerationError::MalformedResponse(
                "expected image output, got text".to_string(),
            )),
        }
    }

    /// Free-form explanation, optionally about an attached photo; not cached
    pub async fn explanation(
        &self,
        question: &str,
        class_level: &ClassLevel,
        attachment: Option<ContentPart>,
    ) -> Result<String> {
        let mut request = self.text_request(prompt::explanation(question, class_level));
        if let Some(part) = attachment {
            request = request.with_part(part);
        }

        match self.call(ContentKind::Explanation, request).await? {
            GenerationOutput::Text { text } => {
                let text = parse::strip_code_fences(&text);
                if text.is_empty() {
                    return Err(GenerationError::MalformedResponse(
                        "empty explanation".to_string(),
                    ));
                }
                Ok(text.to_string())
            }
            GenerationOutput::Image { .. } => Err(GenerationError::MalformedResponse(
                "expected text output, got an image".to_string(),
            )),
        }
    }

    fn text_request(&self, instruction: String) -> GenerationRequest {
        GenerationRequest::text(&self.models.text, instruction)
            .with_system_instruction(prompt::TUTOR_SYSTEM_INSTRUCTION)
    }

    async fn call(&self, kind: ContentKind, request: GenerationRequest) -> Result<GenerationOutput> {
        debug!(kind = %kind, model = %request.model, request_id = %request.id, "calling generator");
        self.generator
            .generate(request)
            .await
            .map(|response| response.output)
            .map_err(|e| {
                let err = GenerationError::from(e);
                warn!(kind = %kind, error = %err, "generation failed");
                err
            })
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        kind: ContentKind,
        request: GenerationRequest,
    ) -> Result<T> {
        match self.call(kind, request).await? {
            GenerationOutput::Text { text } => parse::parse_json(&text).inspect_err(|e| {
                warn!(kind = %kind, error = %e, "could not parse generated content")
            }),
            GenerationOutput::Image { .. } => Err(GenerationError::MalformedResponse(
                "expected JSON text, got an image".to_string(),
            )),
        }
    }

    /// Cache lookup; every failure degrades to a miss
    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(payload) => {
                    debug!(cache_key = %key, "cache hit");
                    Some(payload)
                }
                Err(e) => {
                    warn!(cache_key = %key, error = %e, "ignoring unreadable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(cache_key = %key, "cache miss");
                None
            }
            Err(e) => {
                warn!(cache_key = %key, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Fire-and-forget write; the caller never waits on it
    fn store<T: Serialize>(&self, key: CacheKey, kind: ContentKind, payload: &T) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "could not serialize content for cache");
                return;
            }
        };

        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            if let Err(e) = cache.set(&key, kind, &value).await {
                warn!(cache_key = %key, error = %e, "cache write failed");
            }
        });
    }
}

/// Empty content is never returned or cached
fn require_items<T>(kind: ContentKind, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(GenerationError::MalformedResponse(format!(
            "{kind} response contained no items"
        )));
    }
    Ok(())
}
