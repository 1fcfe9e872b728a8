use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ExerciseError;
use crate::quiz::{PunctuationSign, Sentence};

/// The inventory is padded with distractors up to this size.
pub const MIN_INVENTORY: usize = 4;

/// Fill every blank from an inventory of marks that includes distractors.
///
/// Pick an inventory entry with [`select`](Self::select), then a slot with
/// [`place`](Self::place). A slot that already holds a mark swaps it back into
/// the inventory; placing on a filled slot with nothing selected takes its
/// mark back out. Inventory length plus filled slots never changes.
#[derive(Debug, Clone)]
pub struct PlacementExercise {
    sentence: Sentence,
    inventory: Vec<PunctuationSign>,
    slots: Vec<Option<PunctuationSign>>,
    selected: Option<usize>,
    confirmed: bool,
}

impl PlacementExercise {
    pub fn new<R: Rng + ?Sized>(sentence: Sentence, rng: &mut R) -> Self {
        let mut inventory = sentence.correct_signs.clone();
        while inventory.len() < MIN_INVENTORY {
            if let Some(distractor) = PunctuationSign::ALL.choose(rng) {
                inventory.push(*distractor);
            }
        }
        inventory.shuffle(rng);

        let slots = vec![None; sentence.placeholder_count()];
        Self {
            sentence,
            inventory,
            slots,
            selected: None,
            confirmed: false,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    pub fn inventory(&self) -> &[PunctuationSign] {
        &self.inventory
    }

    pub fn slots(&self) -> &[Option<PunctuationSign>] {
        &self.slots
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn select(&mut self, index: usize) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if index >= self.inventory.len() {
            return Err(ExerciseError::NoSuchEntry(index));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn place(&mut self, slot: usize) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if slot >= self.slots.len() {
            return Err(ExerciseError::NoSuchSlot(slot));
        }
        let Some(index) = self.selected else {
            return self.revert(slot);
        };

        let sign = self.inventory[index];
        match self.slots[slot].replace(sign) {
            Some(previous) => self.inventory[index] = previous,
            None => {
                self.inventory.remove(index);
                self.selected = None;
            }
        }
        Ok(())
    }

    /// Empties a slot, returning its mark to the end of the inventory.
    pub fn revert(&mut self, slot: usize) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        let previous = self
            .slots
            .get_mut(slot)
            .ok_or(ExerciseError::NoSuchSlot(slot))?
            .take()
            .ok_or(ExerciseError::EmptySlot(slot))?;
        self.inventory.push(previous);
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<bool, ExerciseError> {
        self.ensure_open()?;
        if !self.is_complete() {
            return Err(ExerciseError::Incomplete);
        }
        self.confirmed = true;
        self.selected = None;
        Ok(self.is_correct())
    }

    pub fn verdict(&self) -> Option<bool> {
        self.confirmed.then(|| self.is_correct())
    }

    /// Per-slot correctness, used to highlight feedback.
    pub fn slot_results(&self) -> Vec<bool> {
        self.slots
            .iter()
            .zip(&self.sentence.correct_signs)
            .map(|(slot, correct)| slot.as_ref() == Some(correct))
            .collect()
    }

    pub fn render(&self) -> String {
        self.sentence.render_with(|i| match self.slots.get(i).copied().flatten() {
            Some(sign) => format!("[{}:{}]", i + 1, sign),
            None => format!("[{}:?]", i + 1),
        })
    }

    // All-or-nothing: every slot must hold its correct mark.
    fn is_correct(&self) -> bool {
        self.slots.len() == self.sentence.correct_signs.len()
            && self.slot_results().into_iter().all(|ok| ok)
    }

    fn ensure_open(&self) -> Result<(), ExerciseError> {
        if self.confirmed {
            Err(ExerciseError::Locked)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use PunctuationSign::*;

    fn two_blanks() -> Sentence {
        fixtures::sentence(1, "a[?] b[?] c", &[Colon, Comma], "[ ]: [ ], [ ]")
    }

    fn index_of(exercise: &PlacementExercise, sign: PunctuationSign) -> usize {
        exercise
            .inventory()
            .iter()
            .position(|s| *s == sign)
            .expect("sign in inventory")
    }

    fn occupied(exercise: &PlacementExercise) -> usize {
        exercise.slots().iter().filter(|s| s.is_some()).count()
    }

    #[test]
    fn inventory_holds_correct_signs_and_padding() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let exercise = PlacementExercise::new(two_blanks(), &mut rng);
            assert_eq!(exercise.inventory().len(), MIN_INVENTORY);
            assert!(exercise.inventory().contains(&Colon));
            assert!(exercise.inventory().contains(&Comma));
            assert_eq!(exercise.slots(), &[None, None]);
        }
    }

    #[test]
    fn large_sentences_get_no_padding() {
        let mut rng = StdRng::seed_from_u64(1);
        let sentence = fixtures::sentence(
            2,
            "a[?] b[?] c[?] d[?] e[?] f",
            &[Comma, Comma, Semicolon, Colon, Dash],
            "",
        );
        let exercise = PlacementExercise::new(sentence, &mut rng);
        let mut inventory = exercise.inventory().to_vec();
        inventory.sort_by_key(|s| s.symbol());
        let mut expected = vec![Comma, Comma, Semicolon, Colon, Dash];
        expected.sort_by_key(|s| s.symbol());
        assert_eq!(inventory, expected);
    }

    #[test]
    fn correct_placement_wins() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        exercise.select(index_of(&exercise, Colon)).unwrap();
        exercise.place(0).unwrap();
        exercise.select(index_of(&exercise, Comma)).unwrap();
        exercise.place(1).unwrap();
        assert_eq!(exercise.inventory().len(), 2);
        assert_eq!(exercise.confirm(), Ok(true));
        assert_eq!(exercise.slot_results(), vec![true, true]);
        assert_eq!(exercise.render(), "a[1::] b[2:,] c");
    }

    #[test]
    fn one_wrong_slot_fails_the_whole_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        exercise.select(index_of(&exercise, Comma)).unwrap();
        exercise.place(0).unwrap();
        exercise.select(index_of(&exercise, Colon)).unwrap();
        exercise.place(1).unwrap();
        assert_eq!(exercise.confirm(), Ok(false));
        assert_eq!(exercise.slot_results(), vec![false, false]);
        assert_eq!(exercise.verdict(), Some(false));
    }

    #[test]
    fn swapping_returns_the_old_mark() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        exercise.select(index_of(&exercise, Comma)).unwrap();
        exercise.place(0).unwrap();
        let colon = index_of(&exercise, Colon);
        exercise.select(colon).unwrap();
        exercise.place(0).unwrap();

        assert_eq!(exercise.slots()[0], Some(Colon));
        assert_eq!(exercise.inventory()[colon], Comma);
        assert_eq!(exercise.selected(), Some(colon));
        assert_eq!(exercise.inventory().len() + occupied(&exercise), MIN_INVENTORY);
    }

    #[test]
    fn revert_without_selection() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        assert_eq!(exercise.place(1), Err(ExerciseError::EmptySlot(1)));
        exercise.select(0).unwrap();
        exercise.place(1).unwrap();
        exercise.place(1).unwrap();
        assert_eq!(exercise.slots(), &[None, None]);
        assert_eq!(exercise.inventory().len(), MIN_INVENTORY);
    }

    #[test]
    fn size_is_invariant_under_random_play() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        let initial = exercise.inventory().len();
        for _ in 0..200 {
            if rng.gen_bool(0.5) && !exercise.inventory().is_empty() {
                let index = rng.gen_range(0..exercise.inventory().len());
                exercise.select(index).unwrap();
            }
            let _ = exercise.place(rng.gen_range(0..2));
            assert_eq!(exercise.inventory().len() + occupied(&exercise), initial);
        }
    }

    #[test]
    fn confirm_needs_every_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        exercise.select(0).unwrap();
        exercise.place(0).unwrap();
        assert_eq!(exercise.confirm(), Err(ExerciseError::Incomplete));
        assert!(!exercise.is_confirmed());
        assert_eq!(exercise.verdict(), None);
    }

    #[test]
    fn locked_after_confirm() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        exercise.select(0).unwrap();
        exercise.place(0).unwrap();
        exercise.select(0).unwrap();
        exercise.place(1).unwrap();
        exercise.confirm().unwrap();
        assert_eq!(exercise.select(0), Err(ExerciseError::Locked));
        assert_eq!(exercise.place(0), Err(ExerciseError::Locked));
        assert_eq!(exercise.revert(0), Err(ExerciseError::Locked));
        assert_eq!(exercise.confirm(), Err(ExerciseError::Locked));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut exercise = PlacementExercise::new(two_blanks(), &mut rng);
        assert_eq!(exercise.select(4), Err(ExerciseError::NoSuchEntry(4)));
        assert_eq!(exercise.place(2), Err(ExerciseError::NoSuchSlot(2)));
    }
}
