use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    question::models::{Question, QuestionView},
    quiz::{
        models::{Phase, QuizAction, QuizError, QuizView},
        sampler,
        scorer::{self, FeedbackPolicy},
    },
};

/// One play-through for a single tab. Holds a snapshot of the sampled
/// questions, so later store edits never reach a running game.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    phase: Phase,
    questions: Vec<Question>,
    current_idx: usize,
    review_idx: usize,
    answers: HashMap<usize, String>,
    score: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_idx(&self) -> usize {
        self.current_idx
    }

    pub fn review_idx(&self) -> usize {
        self.review_idx
    }

    pub fn answers(&self) -> &HashMap<usize, String> {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn apply(
        &mut self,
        action: QuizAction,
        pool: &[Question],
        n: usize,
    ) -> Result<(), QuizError> {
        let mut rng = ChaCha8Rng::from_os_rng();
        self.apply_with_rng(action, pool, n, &mut rng)
    }

    /// `pool` is the current store content, only read by `start` and `play_again`.
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &mut self,
        action: QuizAction,
        pool: &[Question],
        n: usize,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        match (self.phase, action) {
            (Phase::Welcome, QuizAction::Start) => self.start(pool, n, rng),
            (Phase::Quiz | Phase::Review, QuizAction::Select { answer }) => self.select(answer),
            (Phase::Quiz, QuizAction::Next) => self.next(),
            (Phase::Quiz, QuizAction::Previous) => {
                self.current_idx = self.current_idx.saturating_sub(1);
                Ok(())
            }
            (Phase::Review, QuizAction::ReviewNext) => {
                if self.review_idx + 1 < self.questions.len() {
                    self.review_idx += 1;
                }
                Ok(())
            }
            (Phase::Review, QuizAction::ReviewPrevious) => {
                self.review_idx = self.review_idx.saturating_sub(1);
                Ok(())
            }
            (Phase::Review, QuizAction::BackToQuiz) => {
                self.phase = Phase::Quiz;
                Ok(())
            }
            (Phase::Review, QuizAction::Check) => {
                self.score = scorer::score(&self.questions, &self.answers);
                self.phase = Phase::Result;
                Ok(())
            }
            (Phase::Result, QuizAction::PlayAgain) => {
                self.clear();
                self.start(pool, n, rng)
            }
            (Phase::Quiz | Phase::Review | Phase::Result, QuizAction::Reset)
            | (_, QuizAction::Home) => {
                self.clear();
                Ok(())
            }
            (phase, action) => Err(QuizError::InvalidTransition {
                action: action.name(),
                phase,
            }),
        }
    }

    fn start<R: Rng + ?Sized>(
        &mut self,
        pool: &[Question],
        n: usize,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        if pool.is_empty() {
            return Err(QuizError::EmptyStore);
        }

        if self.questions.is_empty() {
            self.questions = sampler::pick(pool, n, rng);
            self.current_idx = 0;
            self.review_idx = 0;
            self.answers.clear();
            self.score = 0;
        }

        self.phase = Phase::Quiz;
        Ok(())
    }

    fn select(&mut self, answer: String) -> Result<(), QuizError> {
        let idx = match self.phase {
            Phase::Review => self.review_idx,
            _ => self.current_idx,
        };

        let Some(question) = self.questions.get(idx) else {
            return Err(QuizError::InvalidTransition {
                action: "select",
                phase: self.phase,
            });
        };

        if !question.has_answer(&answer) {
            return Err(QuizError::UnknownAnswer(answer));
        }

        self.answers.insert(idx, answer);
        Ok(())
    }

    fn next(&mut self) -> Result<(), QuizError> {
        if !self.answers.contains_key(&self.current_idx) {
            return Err(QuizError::NotAnswered(self.current_idx));
        }

        if self.current_idx + 1 >= self.questions.len() {
            self.phase = Phase::Review;
            self.review_idx = 0;
        } else {
            self.current_idx += 1;
        }

        Ok(())
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Question on screen in the current phase, if any.
    pub fn displayed_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Quiz => self.questions.get(self.current_idx),
            Phase::Review => self.questions.get(self.review_idx),
            Phase::Welcome | Phase::Result => None,
        }
    }

    pub fn view(&self, media_url: Option<String>, policy: &FeedbackPolicy) -> QuizView {
        let total = self.questions.len();

        match (self.phase, self.displayed_question()) {
            (Phase::Quiz, Some(question)) => QuizView::Quiz {
                index: self.current_idx,
                total,
                question: QuestionView::from_question(question, media_url),
                picked: self.answers.get(&self.current_idx).cloned(),
                can_go_previous: self.current_idx > 0,
                can_go_next: self.answers.contains_key(&self.current_idx),
            },
            (Phase::Review, Some(question)) => QuizView::Review {
                index: self.review_idx,
                total,
                question: QuestionView::from_question(question, media_url),
                picked: self.answers.get(&self.review_idx).cloned(),
                answered: self.answers.len(),
            },
            (Phase::Result, _) => {
                let percent = scorer::percent(self.score, total);
                let feedback = policy.feedback(percent);
                QuizView::Result {
                    score: self.score,
                    total,
                    percent,
                    feedback,
                    message: feedback.message().to_string(),
                    breakdown: scorer::breakdown(&self.questions, &self.answers),
                }
            }
            _ => QuizView::Welcome,
        }
    }
}
