use rand::Rng;

use crate::error::ExerciseError;
use crate::quiz::ai_helper::HintState;
use crate::quiz::{PunctuationSign, Sentence};

/// Shown in place of the tested placeholder.
pub const BLANK: &str = " ...";

/// One blank, four marks to choose from. The other blanks are pre-filled
/// with their correct marks.
#[derive(Debug, Clone)]
pub struct SelectionExercise {
    sentence: Sentence,
    tested_index: usize,
    selected: Option<PunctuationSign>,
    hint: HintState,
}

impl SelectionExercise {
    pub fn new<R: Rng + ?Sized>(sentence: Sentence, rng: &mut R) -> Self {
        let count = sentence.placeholder_count();
        let tested_index = if count > 0 { rng.gen_range(0..count) } else { 0 };
        Self {
            sentence,
            tested_index,
            selected: None,
            hint: HintState::Idle,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    #[cfg(test)]
    pub fn tested_index(&self) -> usize {
        self.tested_index
    }

    /// Correct mark for the tested blank; `None` for a sentence without blanks.
    pub fn target_sign(&self) -> Option<PunctuationSign> {
        self.sentence.correct_signs.get(self.tested_index).copied()
    }

    pub fn selected(&self) -> Option<PunctuationSign> {
        self.selected
    }

    pub fn render(&self) -> String {
        self.sentence.render_with(|i| {
            if i == self.tested_index {
                BLANK.to_string()
            } else {
                self.sentence
                    .correct_signs
                    .get(i)
                    .map(|sign| sign.inline().to_string())
                    .unwrap_or_default()
            }
        })
    }

    /// Takes the answer and locks the exercise.
    pub fn choose(&mut self, sign: PunctuationSign) -> Result<bool, ExerciseError> {
        if self.selected.is_some() {
            return Err(ExerciseError::Locked);
        }
        self.selected = Some(sign);
        Ok(self.target_sign() == Some(sign))
    }

    pub fn verdict(&self) -> Option<bool> {
        self.selected.map(|sign| self.target_sign() == Some(sign))
    }

    pub fn hint(&self) -> &HintState {
        &self.hint
    }

    /// Marks a hint request as in flight. Returns the request parameters
    /// only when a new request should actually be made.
    pub fn begin_hint(&mut self) -> Result<Option<HintRequest>, ExerciseError> {
        let (Some(chosen), Some(correct)) = (self.selected, self.target_sign()) else {
            return Err(ExerciseError::HintUnavailable);
        };
        if chosen == correct {
            return Err(ExerciseError::HintUnavailable);
        }
        if !self.hint.begin() {
            return Ok(None);
        }
        Ok(Some(HintRequest {
            sentence: self.sentence.text.clone(),
            chosen,
            correct,
        }))
    }

    pub fn finish_hint(&mut self, text: String) {
        self.hint.finish(text);
    }
}

/// Everything the hint provider needs to explain a wrong answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub sentence: String,
    pub chosen: PunctuationSign,
    pub correct: PunctuationSign,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn three_blanks() -> Sentence {
        fixtures::sentence(
            5,
            "a[?] b[?] c[?] d",
            &[
                PunctuationSign::Comma,
                PunctuationSign::Colon,
                PunctuationSign::Dash,
            ],
            "[ ], [ ]: [ ] — [ ]",
        )
    }

    #[test]
    fn mother_came_scenario() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut wrong = SelectionExercise::new(fixtures::mother_came(), &mut rng);
        assert_eq!(wrong.tested_index(), 0);
        assert_eq!(wrong.choose(PunctuationSign::Comma), Ok(false));

        let mut right = SelectionExercise::new(fixtures::mother_came(), &mut rng);
        assert_eq!(right.choose(PunctuationSign::Colon), Ok(true));
        assert_eq!(right.verdict(), Some(true));
    }

    #[test]
    fn only_the_tested_blank_is_hidden() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let exercise = SelectionExercise::new(three_blanks(), &mut rng);
            let rendered = exercise.render();
            assert_eq!(rendered.matches(BLANK).count(), 1);
            let expected = match exercise.tested_index() {
                0 => "a ... b: c — d",
                1 => "a, b ... c — d",
                2 => "a, b: c ... d",
                other => panic!("tested index out of range: {other}"),
            };
            assert_eq!(rendered, expected);
        }
    }

    #[test]
    fn every_blank_gets_tested_eventually() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[SelectionExercise::new(three_blanks(), &mut rng).tested_index()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn locks_after_first_choice() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut exercise = SelectionExercise::new(fixtures::mother_came(), &mut rng);
        assert!(exercise.verdict().is_none());
        exercise.choose(PunctuationSign::Dash).unwrap();
        assert_eq!(exercise.choose(PunctuationSign::Colon), Err(ExerciseError::Locked));
        assert_eq!(exercise.selected(), Some(PunctuationSign::Dash));
        assert_eq!(exercise.verdict(), Some(false));
    }

    #[test]
    fn sentence_without_blanks_never_matches() {
        let mut rng = StdRng::seed_from_u64(3);
        let plain = fixtures::sentence(6, "Просто текст.", &[], "[ ]");
        let mut exercise = SelectionExercise::new(plain, &mut rng);
        assert_eq!(exercise.target_sign(), None);
        assert_eq!(exercise.render(), "Просто текст.");
        assert_eq!(exercise.choose(PunctuationSign::Comma), Ok(false));
    }

    #[test]
    fn hint_is_requested_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut exercise = SelectionExercise::new(fixtures::mother_came(), &mut rng);
        assert_eq!(exercise.begin_hint(), Err(ExerciseError::HintUnavailable));

        exercise.choose(PunctuationSign::Semicolon).unwrap();
        let request = exercise.begin_hint().unwrap().expect("first request goes out");
        assert_eq!(request.chosen, PunctuationSign::Semicolon);
        assert_eq!(request.correct, PunctuationSign::Colon);

        // still loading
        assert_eq!(exercise.begin_hint(), Ok(None));
        exercise.finish_hint("Потому что пояснение.".to_string());
        assert_eq!(exercise.begin_hint(), Ok(None));
        assert_eq!(exercise.hint().text(), Some("Потому что пояснение."));
    }

    #[test]
    fn no_hint_after_correct_answer() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut exercise = SelectionExercise::new(fixtures::mother_came(), &mut rng);
        exercise.choose(PunctuationSign::Colon).unwrap();
        assert_eq!(exercise.begin_hint(), Err(ExerciseError::HintUnavailable));
    }
}
