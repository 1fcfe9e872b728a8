use thiserror::Error;

use crate::quiz::session::Stage;

/// Errors raised while loading the sentence dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// The number of `[?]` markers differs from the number of correct marks.
    #[error("sentence {id}: {placeholders} placeholders but {signs} correct signs")]
    SignCountMismatch {
        id: u32,
        placeholders: usize,
        signs: usize,
    },

    #[error("duplicate sentence id: {0}")]
    DuplicateId(u32),
}

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
}

/// An action that is not legal in the current session stage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while in {from:?}")]
    InvalidTransition { from: Stage, action: &'static str },
}

/// A rejected exercise interaction. The exercise state is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("the answer is already confirmed")]
    Locked,

    #[error("the answer is not confirmed yet")]
    NotConfirmed,

    #[error("every slot must be filled before confirming")]
    Incomplete,

    #[error("the scheme needs at least {min} blocks")]
    TooShort { min: usize },

    #[error("the scheme is limited to {max} blocks")]
    TooLong { max: usize },

    #[error("no inventory entry #{0}")]
    NoSuchEntry(usize),

    /// The pressed button shows a different mark than the entry now holds.
    #[error("inventory entry #{0} no longer holds the pressed mark")]
    EntryChanged(usize),

    #[error("no slot #{0}")]
    NoSuchSlot(usize),

    #[error("slot #{0} is empty")]
    EmptySlot(usize),

    #[error("an explanation is only offered after a wrong answer")]
    HintUnavailable,
}

/// Clipboard write failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("clipboard is not available")]
    Unavailable,
}
