use rand::{Rng, seq::IndexedRandom, seq::SliceRandom};

use crate::question::models::Question;

pub const DEFAULT_QUESTIONS_PER_GAME: usize = 15;

/// Draws up to `n` distinct questions and shuffles each one's answers.
pub fn pick<R: Rng + ?Sized>(all: &[Question], n: usize, rng: &mut R) -> Vec<Question> {
    if all.is_empty() {
        return Vec::new();
    }

    let k = n.min(all.len());
    let mut chosen: Vec<Question> = all.choose_multiple(rng, k).cloned().collect();
    for question in chosen.iter_mut() {
        question.answers.shuffle(rng);
    }

    chosen
}
