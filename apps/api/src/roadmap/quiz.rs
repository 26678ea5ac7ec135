//! Adaptive quiz — a fixed three-question self-assessment whose answers
//! nudge the roadmap.
//!
//! Submission is blocked locally until every question is answered; an
//! incomplete quiz must never reach the model.

use serde::Serialize;

use crate::errors::AppError;

pub const INCOMPLETE_QUIZ: &str = "Incomplete Quiz";

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: [&'static str; 4],
}

pub const QUIZ_QUESTIONS: [QuizQuestion; 3] = [
    QuizQuestion {
        question: "How would you rate your confidence in Python programming?",
        options: ["Beginner", "Intermediate", "Advanced", "Expert"],
    },
    QuizQuestion {
        question: "Have you ever deployed a web application to a cloud provider like AWS, GCP, or Azure?",
        options: [
            "Never",
            "Once or twice with a tutorial",
            "Multiple times",
            "I do it regularly",
        ],
    },
    QuizQuestion {
        question: "How familiar are you with database concepts like SQL and NoSQL?",
        options: [
            "Not familiar at all",
            "I know the basics",
            "I'm comfortable with both",
            "I can design and optimize complex databases",
        ],
    },
];

/// Rejects any submission that does not answer all questions.
pub fn validate_answers(answers: &[String]) -> Result<(), AppError> {
    if answers.len() != QUIZ_QUESTIONS.len() || answers.iter().any(|a| a.trim().is_empty()) {
        return Err(AppError::Validation(INCOMPLETE_QUIZ.to_string()));
    }
    Ok(())
}

/// Builds the newline-joined "question: answer" transcript sent to the
/// Adaptive Roadmap template.
pub fn transcript(answers: &[String]) -> String {
    QUIZ_QUESTIONS
        .iter()
        .zip(answers)
        .map(|(q, a)| format!("{}: {}", q.question, a))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(n: usize) -> Vec<String> {
        QUIZ_QUESTIONS
            .iter()
            .take(n)
            .map(|q| q.options[1].to_string())
            .collect()
    }

    #[test]
    fn test_complete_answers_pass() {
        assert!(validate_answers(&answers(3)).is_ok());
    }

    #[test]
    fn test_scenario_b_two_of_three_answers_are_rejected() {
        let err = validate_answers(&answers(2)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == INCOMPLETE_QUIZ));
    }

    #[test]
    fn test_blank_answer_counts_as_unanswered() {
        let mut a = answers(3);
        a[1] = "   ".to_string();
        assert!(validate_answers(&a).is_err());
    }

    #[test]
    fn test_transcript_pairs_questions_with_answers_in_order() {
        let a = vec![
            "Advanced".to_string(),
            "Never".to_string(),
            "I know the basics".to_string(),
        ];
        let t = transcript(&a);
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "How would you rate your confidence in Python programming?: Advanced"
        );
        assert!(lines[1].ends_with(": Never"));
        assert!(lines[2].ends_with(": I know the basics"));
    }
}
