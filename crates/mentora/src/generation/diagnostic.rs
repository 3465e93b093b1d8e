//! Per-topic analysis of diagnostic quiz answers

use serde::{Deserialize, Serialize};

/// One answered diagnostic question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticAnswer {
    pub topic_id: String,
    pub correct: bool,
}

impl DiagnosticAnswer {
    pub fn new(topic_id: impl Into<String>, correct: bool) -> Self {
        Self {
            topic_id: topic_id.into(),
            correct,
        }
    }
}

/// Topics the student has mastered and topics that need work.
/// The two lists never share a topic ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Aggregate correctness per topic ID
///
/// A topic with any incorrect answer is a weakness; otherwise it is a
/// strength. Both lists keep the order in which topics first appear.
pub fn analyze(answers: &[DiagnosticAnswer]) -> DiagnosticAnalysis {
    let mut order: Vec<&str> = Vec::new();
    let mut missed: Vec<&str> = Vec::new();

    for answer in answers {
        let topic = answer.topic_id.as_str();
        if !order.contains(&topic) {
            order.push(topic);
        }
        if !answer.correct && !missed.contains(&topic) {
            missed.push(topic);
        }
    }

    let (weaknesses, strengths): (Vec<&str>, Vec<&str>) =
        order.into_iter().partition(|topic| missed.contains(topic));

    DiagnosticAnalysis {
        strengths: strengths.into_iter().map(String::from).collect(),
        weaknesses: weaknesses.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_topic_is_weakness() {
        let answers = vec![
            DiagnosticAnswer::new("algebra", true),
            DiagnosticAnswer::new("geometry", true),
            DiagnosticAnswer::new("algebra", false),
            DiagnosticAnswer::new("geometry", true),
            DiagnosticAnswer::new("statistics", false),
        ];
        let analysis = analyze(&answers);

        assert_eq!(analysis.strengths, vec!["geometry".to_string()]);
        assert_eq!(
            analysis.weaknesses,
            vec!["algebra".to_string(), "statistics".to_string()]
        );
        for topic in &analysis.strengths {
            assert!(!analysis.weaknesses.contains(topic));
        }
    }

    #[test]
    fn test_empty_answers() {
        assert_eq!(analyze(&[]), DiagnosticAnalysis::default());
    }
}
