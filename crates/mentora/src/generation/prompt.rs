//! Instruction builders for each content kind

use super::TopicRef;
use crate::profile::ClassLevel;

pub const TUTOR_SYSTEM_INSTRUCTION: &str = "You are a patient tutor for school students. \
Explain ideas clearly, use age-appropriate vocabulary and examples, and never include \
content that is unsafe for children.";

pub fn lesson(topic: &TopicRef, subject: &str, class_level: &ClassLevel) -> String {
    format!(
        "Write a lesson on \"{topic}\" in {subject} for a grade {class_level} student. \
         Start with a short introduction, then split the material into 3 to 5 sections \
         with headings, list the key points to remember, and add one fun fact.",
        topic = topic.name.trim(),
    )
}

pub fn quiz(topic: &TopicRef, class_level: &ClassLevel, count: usize) -> String {
    format!(
        "Create {count} multiple-choice questions about \"{topic}\" for a grade {class_level} \
         student. Each question has four options, exactly one correct answer given by its \
         zero-based index, a one-sentence explanation, and a difficulty of easy, medium or \
         hard. Mix the difficulties.",
        topic = topic.name.trim(),
    )
}

pub fn diagnostic_quiz(
    subject: &str,
    topics: &[TopicRef],
    class_level: &ClassLevel,
    count: usize,
) -> String {
    let topic_list = topics
        .iter()
        .map(|t| format!("- {} (id: {})", t.name.trim(), t.id))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create a diagnostic quiz of {count} multiple-choice questions in {subject} for a \
         grade {class_level} student. Spread the questions across these topics:\n\
         {topic_list}\n\
         Tag every question with the id of the topic it tests, copied exactly from the list. \
         Each question has four options, the zero-based index of the correct one, and a \
         difficulty of easy, medium or hard."
    )
}

pub fn flashcards(topic: &TopicRef, class_level: &ClassLevel, count: usize) -> String {
    format!(
        "Create {count} flashcards for studying \"{topic}\" at grade {class_level}. \
         Each card has a short term on the front and a one or two sentence definition \
         on the back.",
        topic = topic.name.trim(),
    )
}

pub fn essay_prompt(topic: &str, class_level: &ClassLevel) -> String {
    format!(
        "Write an essay assignment about \"{topic}\" for a grade {class_level} student. \
         Give the prompt, 3 to 5 guidelines, and a suggested word count suitable for the grade.",
        topic = topic.trim(),
    )
}

pub fn essay_feedback(prompt: &str, essay: &str, class_level: &ClassLevel) -> String {
    format!(
        "A grade {class_level} student answered this essay prompt:\n\"{prompt}\"\n\n\
         Essay:\n{essay}\n\n\
         Score the essay from 1 to 10, list its strengths and the most useful improvements, \
         and give encouraging detailed feedback addressed to the student."
    )
}

pub fn summary(text: &str, class_level: &ClassLevel) -> String {
    format!(
        "Summarize the following text for a grade {class_level} student in a short paragraph \
         and list its key points.\n\n{text}"
    )
}

pub fn study_plan(weaknesses: &[String], class_level: &ClassLevel, days: u32) -> String {
    let focus = if weaknesses.is_empty() {
        "a general review of the grade's core subjects".to_string()
    } else {
        weaknesses.join(", ")
    };

    format!(
        "Plan {days} days of study for a grade {class_level} student who needs practice in: \
         {focus}. For each day give the focus topic, 2 to 4 concrete activities, and a \
         duration in minutes between 15 and 60."
    )
}

pub fn image(description: &str) -> String {
    format!(
        "Draw a clear, colorful educational illustration for school students: {}",
        description.trim()
    )
}

pub fn explanation(question: &str, class_level: &ClassLevel) -> String {
    format!(
        "A grade {class_level} student asks: \"{question}\". Explain the answer step by step \
         in plain language, and finish with a short check-your-understanding question.",
        question = question.trim(),
    )
}
