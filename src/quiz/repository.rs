use std::collections::HashSet;
use std::io::Read;

use crate::error::DatasetError;
use crate::quiz::{Difficulty, Sentence};

const BUILTIN_SENTENCES: &str = include_str!("../../data/sentences.json");

/// The fixed collection of exercise sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceRepository {
    sentences: Vec<Sentence>,
}

impl SentenceRepository {
    /// Dataset compiled into the binary.
    pub fn builtin() -> Result<Self, DatasetError> {
        let sentences: Vec<Sentence> = serde_json::from_str(BUILTIN_SENTENCES)?;
        Self::new(sentences)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let sentences: Vec<Sentence> = serde_json::from_reader(reader)?;
        Self::new(sentences)
    }

    pub fn new(sentences: Vec<Sentence>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::new();
        for sentence in &sentences {
            if !seen.insert(sentence.id) {
                return Err(DatasetError::DuplicateId(sentence.id));
            }
            let placeholders = sentence.placeholder_count();
            if placeholders != sentence.correct_signs.len() {
                return Err(DatasetError::SignCountMismatch {
                    id: sentence.id,
                    placeholders,
                    signs: sentence.correct_signs.len(),
                });
            }
        }
        Ok(Self { sentences })
    }

    pub fn all(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Sentence> {
        self.sentences
            .iter()
            .filter(move |s| s.difficulty == difficulty)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
