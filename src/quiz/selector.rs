use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::repository::SentenceRepository;
use crate::quiz::{Difficulty, Sentence};

/// Upper bound on sentences in one play-through.
pub const SESSION_SIZE: usize = 10;

/// Picks the sentences for one play-through: every sentence of the tier,
/// shuffled (Fisher-Yates), cut down to `SESSION_SIZE`.
///
/// A tier with fewer sentences yields a shorter session; an empty tier yields
/// an empty one.
pub fn sample_session<R: Rng + ?Sized>(
    repository: &SentenceRepository,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Sentence> {
    let mut sentences: Vec<Sentence> = repository.by_difficulty(difficulty).cloned().collect();
    sentences.shuffle(rng);
    sentences.truncate(SESSION_SIZE);
    sentences
}
