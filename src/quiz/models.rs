use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    question::models::QuestionView,
    quiz::scorer::{Feedback, ResultLine},
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Welcome,
    Quiz,
    Review,
    Result,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Welcome => write!(f, "welcome"),
            Phase::Quiz => write!(f, "quiz"),
            Phase::Review => write!(f, "review"),
            Phase::Result => write!(f, "result"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuizAction {
    Start,
    Select { answer: String },
    Next,
    Previous,
    ReviewNext,
    ReviewPrevious,
    BackToQuiz,
    Check,
    PlayAgain,
    Reset,
    Home,
}

impl QuizAction {
    /// Actions that sample a fresh game from the question store.
    pub fn needs_questions(&self) -> bool {
        matches!(self, QuizAction::Start | QuizAction::PlayAgain)
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuizAction::Start => "start",
            QuizAction::Select { .. } => "select",
            QuizAction::Next => "next",
            QuizAction::Previous => "previous",
            QuizAction::ReviewNext => "review_next",
            QuizAction::ReviewPrevious => "review_previous",
            QuizAction::BackToQuiz => "back_to_quiz",
            QuizAction::Check => "check",
            QuizAction::PlayAgain => "play_again",
            QuizAction::Reset => "reset",
            QuizAction::Home => "home",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("There are no questions in the store right now")]
    EmptyStore,

    #[error("Action {action} is not available in the {phase} phase")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("Question {0} has not been answered yet")]
    NotAnswered(usize),

    #[error("Answer is not one of the options: {0}")]
    UnknownAnswer(String),

    #[error("The game is suspended while the admin console is open")]
    Suspended,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizView {
    Welcome,
    Quiz {
        index: usize,
        total: usize,
        question: QuestionView,
        picked: Option<String>,
        can_go_previous: bool,
        can_go_next: bool,
    },
    Review {
        index: usize,
        total: usize,
        question: QuestionView,
        picked: Option<String>,
        answered: usize,
    },
    Result {
        score: usize,
        total: usize,
        percent: u32,
        feedback: Feedback,
        message: String,
        breakdown: Vec<ResultLine>,
    },
}
