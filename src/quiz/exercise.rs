use rand::Rng;

use crate::quiz::diagram::DiagramExercise;
use crate::quiz::placement::PlacementExercise;
use crate::quiz::selection::SelectionExercise;
use crate::quiz::{ExerciseMode, Sentence};

/// What every exercise engine reports back to the session.
pub trait ExerciseEngine {
    fn sentence(&self) -> &Sentence;

    /// `None` until the answer is confirmed.
    fn verdict(&self) -> Option<bool>;
}

impl ExerciseEngine for SelectionExercise {
    fn sentence(&self) -> &Sentence {
        SelectionExercise::sentence(self)
    }

    fn verdict(&self) -> Option<bool> {
        SelectionExercise::verdict(self)
    }
}

impl ExerciseEngine for PlacementExercise {
    fn sentence(&self) -> &Sentence {
        PlacementExercise::sentence(self)
    }

    fn verdict(&self) -> Option<bool> {
        PlacementExercise::verdict(self)
    }
}

impl ExerciseEngine for DiagramExercise {
    fn sentence(&self) -> &Sentence {
        DiagramExercise::sentence(self)
    }

    fn verdict(&self) -> Option<bool> {
        DiagramExercise::verdict(self)
    }
}

/// The engine for the sentence on screen. A new value is built for every
/// sentence, so nothing carries over between sentences.
#[derive(Debug, Clone)]
pub enum Exercise {
    Selection(SelectionExercise),
    Placement(PlacementExercise),
    Diagram(DiagramExercise),
}

impl Exercise {
    pub fn new<R: Rng + ?Sized>(mode: ExerciseMode, sentence: Sentence, rng: &mut R) -> Self {
        match mode {
            ExerciseMode::Selection => Exercise::Selection(SelectionExercise::new(sentence, rng)),
            ExerciseMode::Placement => Exercise::Placement(PlacementExercise::new(sentence, rng)),
            ExerciseMode::Diagram => Exercise::Diagram(DiagramExercise::new(sentence)),
        }
    }

    pub fn mode(&self) -> ExerciseMode {
        match self {
            Exercise::Selection(_) => ExerciseMode::Selection,
            Exercise::Placement(_) => ExerciseMode::Placement,
            Exercise::Diagram(_) => ExerciseMode::Diagram,
        }
    }

    fn engine(&self) -> &dyn ExerciseEngine {
        match self {
            Exercise::Selection(e) => e,
            Exercise::Placement(e) => e,
            Exercise::Diagram(e) => e,
        }
    }
}

impl ExerciseEngine for Exercise {
    fn sentence(&self) -> &Sentence {
        self.engine().sentence()
    }

    fn verdict(&self) -> Option<bool> {
        self.engine().verdict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixtures;
    use crate::quiz::PunctuationSign;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn builds_the_engine_for_each_mode() {
        let mut rng = StdRng::seed_from_u64(1);
        for mode in ExerciseMode::ALL {
            let exercise = Exercise::new(mode, fixtures::mother_came(), &mut rng);
            assert_eq!(exercise.mode(), mode);
            assert_eq!(exercise.sentence().id, 100);
            assert_eq!(exercise.verdict(), None);
        }
    }

    #[test]
    fn verdict_flows_through_the_enum() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut exercise = Exercise::new(ExerciseMode::Selection, fixtures::mother_came(), &mut rng);
        if let Exercise::Selection(selection) = &mut exercise {
            selection.choose(PunctuationSign::Colon).unwrap();
        }
        assert_eq!(exercise.verdict(), Some(true));
    }
}
