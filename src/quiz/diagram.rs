use std::fmt;

use crate::error::ExerciseError;
use crate::quiz::{PunctuationSign, Sentence};

pub const MIN_TOKENS: usize = 3;
pub const MAX_TOKENS: usize = 25;

const CLAUSE: &str = "[ ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeToken {
    /// A clause block, `[ ]`.
    Clause,
    Sign(PunctuationSign),
}

impl SchemeToken {
    pub const ALL: [SchemeToken; 5] = [
        SchemeToken::Clause,
        SchemeToken::Sign(PunctuationSign::Comma),
        SchemeToken::Sign(PunctuationSign::Semicolon),
        SchemeToken::Sign(PunctuationSign::Colon),
        SchemeToken::Sign(PunctuationSign::Dash),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SchemeToken::Clause => CLAUSE,
            SchemeToken::Sign(PunctuationSign::Dash) => "—",
            SchemeToken::Sign(sign) => sign.symbol(),
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == CLAUSE || text == "[]" {
            return Some(SchemeToken::Clause);
        }
        PunctuationSign::from_symbol(text).map(SchemeToken::Sign)
    }
}

impl fmt::Display for SchemeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unifies dash variants to `-` and drops all whitespace.
pub fn normalize_scheme(scheme: &str) -> String {
    scheme
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '—' | '–' => '-',
            other => other,
        })
        .collect()
}

/// Free-form assembly of a sentence scheme.
///
/// The verdict is a literal comparison of the normalised strings; a scheme
/// with the right symbols in a different order is wrong.
#[derive(Debug, Clone)]
pub struct DiagramExercise {
    sentence: Sentence,
    tokens: Vec<SchemeToken>,
    confirmed: bool,
}

impl DiagramExercise {
    pub fn new(sentence: Sentence) -> Self {
        Self {
            sentence,
            tokens: Vec::new(),
            confirmed: false,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    pub fn tokens(&self) -> &[SchemeToken] {
        &self.tokens
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn can_confirm(&self) -> bool {
        !self.confirmed && self.tokens.len() >= MIN_TOKENS
    }

    pub fn push(&mut self, token: SchemeToken) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if self.tokens.len() >= MAX_TOKENS {
            return Err(ExerciseError::TooLong { max: MAX_TOKENS });
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Option<SchemeToken>, ExerciseError> {
        self.ensure_open()?;
        Ok(self.tokens.pop())
    }

    pub fn clear(&mut self) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        self.tokens.clear();
        Ok(())
    }

    pub fn assembled(&self) -> String {
        self.tokens.iter().map(SchemeToken::label).collect()
    }

    pub fn confirm(&mut self) -> Result<bool, ExerciseError> {
        self.ensure_open()?;
        if self.tokens.len() < MIN_TOKENS {
            return Err(ExerciseError::TooShort { min: MIN_TOKENS });
        }
        self.confirmed = true;
        Ok(self.is_correct())
    }

    pub fn verdict(&self) -> Option<bool> {
        self.confirmed.then(|| self.is_correct())
    }

    fn is_correct(&self) -> bool {
        normalize_scheme(&self.assembled()) == normalize_scheme(&self.sentence.scheme)
    }

    fn ensure_open(&self) -> Result<(), ExerciseError> {
        if self.confirmed {
            Err(ExerciseError::Locked)
        } else {
            Ok(())
        }
    }
}
