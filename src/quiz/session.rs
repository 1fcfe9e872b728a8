use log::{debug, info};
use rand::Rng;

use crate::error::SessionError;
use crate::quiz::repository::SentenceRepository;
use crate::quiz::selector::sample_session;
use crate::quiz::{Difficulty, ExerciseMode, Sentence};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Menu,
    ModeSelect,
    DifficultySelect,
    Playing,
    Result,
}

/// What happened after a verdict was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved on to the sentence at this position.
    Next(usize),
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    stage: Stage,
    mode: ExerciseMode,
    difficulty: Difficulty,
    sentences: Vec<Sentence>,
    position: usize,
    score: usize,
    round: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn mode(&self) -> ExerciseMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.sentences.len()
    }

    #[cfg(test)]
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn current_sentence(&self) -> Option<&Sentence> {
        match self.stage {
            Stage::Playing => self.sentences.get(self.position),
            _ => None,
        }
    }

    /// Rounded share of correct answers; 0 for an empty session.
    pub fn percentage(&self) -> u32 {
        if self.sentences.is_empty() {
            return 0;
        }
        (self.score as f64 / self.sentences.len() as f64 * 100.0).round() as u32
    }

    /// Menu → ModeSelect.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect(&[Stage::Menu], "start")?;
        self.enter(Stage::ModeSelect);
        Ok(())
    }

    /// ModeSelect → DifficultySelect.
    pub fn choose_mode(&mut self, mode: ExerciseMode) -> Result<(), SessionError> {
        self.expect(&[Stage::ModeSelect], "choose a mode")?;
        self.mode = mode;
        self.enter(Stage::DifficultySelect);
        Ok(())
    }

    /// DifficultySelect → Playing, sampling a fresh sentence list.
    ///
    /// An empty tier goes straight to `Result` with nothing to play.
    pub fn choose_difficulty<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        repository: &SentenceRepository,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        self.expect(&[Stage::DifficultySelect], "choose a difficulty")?;
        self.difficulty = difficulty;
        self.sentences = sample_session(repository, difficulty, rng);
        self.round += 1;
        info!(
            "round {}: sampled {} {:?} sentences for {:?}",
            self.round,
            self.sentences.len(),
            difficulty,
            self.mode
        );
        if self.sentences.is_empty() {
            self.enter(Stage::Result);
        } else {
            self.enter(Stage::Playing);
        }
        Ok(())
    }

    /// Counts the verdict for the current sentence and advances.
    pub fn record_verdict(&mut self, correct: bool) -> Result<Progress, SessionError> {
        self.expect(&[Stage::Playing], "record an answer")?;
        if correct {
            self.score += 1;
        }
        debug!(
            "sentence {}/{} answered, correct: {correct}",
            self.position + 1,
            self.sentences.len()
        );
        if self.position + 1 < self.sentences.len() {
            self.position += 1;
            Ok(Progress::Next(self.position))
        } else {
            self.stage = Stage::Result;
            info!(
                "round {} finished: {}/{}",
                self.round,
                self.score,
                self.sentences.len()
            );
            Ok(Progress::Finished)
        }
    }

    /// Back to mode selection; allowed anywhere but the menu.
    pub fn back_to_modes(&mut self) -> Result<(), SessionError> {
        self.expect(
            &[
                Stage::ModeSelect,
                Stage::DifficultySelect,
                Stage::Playing,
                Stage::Result,
            ],
            "return to mode selection",
        )?;
        self.enter(Stage::ModeSelect);
        Ok(())
    }

    pub fn to_menu(&mut self) -> Result<(), SessionError> {
        self.expect(&[Stage::ModeSelect, Stage::Result], "return to the menu")?;
        self.enter(Stage::Menu);
        Ok(())
    }

    fn expect(&self, allowed: &[Stage], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    // Every stage change resets progress; the sampled list is only replaced
    // by `choose_difficulty`.
    fn enter(&mut self, stage: Stage) {
        debug!("stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.score = 0;
        self.position = 0;
    }
}
