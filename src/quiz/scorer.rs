use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::question::models::Question;

/// Counts answers that match the question's correct answer.
pub fn score(questions: &[Question], answers: &HashMap<usize, String>) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(idx, question)| is_correct(question, answers.get(idx)))
        .count()
}

fn is_correct(question: &Question, picked: Option<&String>) -> bool {
    match (picked, question.correct_answer()) {
        (Some(picked), Some(correct)) => *picked == correct.text,
        _ => false,
    }
}

/// Whole percent, rounded half away from zero. An empty quiz counts as one question.
pub fn percent(score: usize, total: usize) -> u32 {
    let ratio = 100.0 * score as f64 / total.max(1) as f64;
    ratio.round() as u32
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Perfect,
    Positive,
    Retry,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Perfect => "Well done, a perfect score!",
            Feedback::Positive => "Very nice!",
            Feedback::Retry => "It happens to everyone, maybe try again?",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackPolicy {
    pub positive_from: u32,
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self { positive_from: 61 }
    }
}

impl FeedbackPolicy {
    pub fn new(positive_from: u32) -> Self {
        Self { positive_from }
    }

    pub fn feedback(&self, percent: u32) -> Feedback {
        if percent >= 100 {
            Feedback::Perfect
        } else if percent >= self.positive_from {
            Feedback::Positive
        } else {
            Feedback::Retry
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResultLine {
    pub question: String,
    pub picked: Option<String>,
    pub correct: Option<String>,
    pub ok: bool,
}

/// What the player picked next to the right answer, question by question.
pub fn breakdown(questions: &[Question], answers: &HashMap<usize, String>) -> Vec<ResultLine> {
    questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let picked = answers.get(&idx);
            ResultLine {
                question: question.question.clone(),
                picked: picked.cloned(),
                correct: question.correct_answer().map(|a| a.text.clone()),
                ok: is_correct(question, picked),
            }
        })
        .collect()
}
