pub mod ai_helper;
pub mod diagram;
pub mod exercise;
pub mod placement;
pub mod repository;
pub mod selection;
pub mod selector;
pub mod session;

use std::fmt;

/// Marker for an omitted punctuation mark in `Sentence::text`.
pub const PLACEHOLDER: &str = "[?]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PunctuationSign {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = ":")]
    Colon,
    #[serde(rename = "-", alias = "—", alias = "–")]
    Dash,
}

impl PunctuationSign {
    pub const ALL: [PunctuationSign; 4] = [
        PunctuationSign::Comma,
        PunctuationSign::Semicolon,
        PunctuationSign::Colon,
        PunctuationSign::Dash,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            PunctuationSign::Comma => ",",
            PunctuationSign::Semicolon => ";",
            PunctuationSign::Colon => ":",
            PunctuationSign::Dash => "-",
        }
    }

    /// How the mark is written right after the preceding word.
    pub fn inline(&self) -> &'static str {
        match self {
            PunctuationSign::Dash => " —",
            other => other.symbol(),
        }
    }

    /// Accepts any dash variant as `Dash`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "," => Some(PunctuationSign::Comma),
            ";" => Some(PunctuationSign::Semicolon),
            ":" => Some(PunctuationSign::Colon),
            "-" | "—" | "–" => Some(PunctuationSign::Dash),
            _ => None,
        }
    }
}

impl fmt::Display for PunctuationSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Легко",
            Difficulty::Medium => "Средне",
            Difficulty::Hard => "Сложно",
        }
    }

    // Number of grammatical cores in a sentence of this tier
    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "3 основы",
            Difficulty::Medium => "4 основы",
            Difficulty::Hard => "5+ основ",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label.trim())
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExerciseMode {
    /// Pick the missing mark for one blank.
    #[default]
    Selection,
    /// Place marks from an inventory with distractors into every blank.
    Placement,
    /// Assemble the structural diagram of the sentence.
    Diagram,
}

impl ExerciseMode {
    pub const ALL: [ExerciseMode; 3] = [
        ExerciseMode::Selection,
        ExerciseMode::Placement,
        ExerciseMode::Diagram,
    ];

    pub fn number(&self) -> u8 {
        match self {
            ExerciseMode::Selection => 1,
            ExerciseMode::Placement => 2,
            ExerciseMode::Diagram => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ExerciseMode::Selection => "Тест",
            ExerciseMode::Placement => "Подстановка",
            ExerciseMode::Diagram => "Схема",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExerciseMode::Selection => "Укажи пропущенный знак",
            ExerciseMode::Placement => "Установи знак в текст",
            ExerciseMode::Diagram => "Построй структуру БСП",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub id: u32,
    pub text: String,
    pub full_text: String,
    pub correct_signs: Vec<PunctuationSign>,
    pub explanation: String,
    pub scheme: String,
    pub difficulty: Difficulty,
}

impl Sentence {
    pub fn placeholder_count(&self) -> usize {
        self.text.matches(PLACEHOLDER).count()
    }

    /// Text fragments around the placeholders; always one more than the
    /// placeholder count.
    pub fn text_parts(&self) -> Vec<&str> {
        self.text.split(PLACEHOLDER).collect()
    }

    /// Rebuilds the text, asking `fill` what to put at each placeholder.
    pub fn render_with<F>(&self, mut fill: F) -> String
    where
        F: FnMut(usize) -> String,
    {
        let parts = self.text_parts();
        let mut rendered = String::with_capacity(self.text.len());
        for (i, part) in parts.iter().enumerate() {
            rendered.push_str(part);
            if i + 1 < parts.len() {
                rendered.push_str(&fill(i));
            }
        }
        rendered
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Difficulty, PunctuationSign, Sentence};

    pub fn sentence(id: u32, text: &str, signs: &[PunctuationSign], scheme: &str) -> Sentence {
        Sentence {
            id,
            text: text.to_string(),
            full_text: text.replace("[?]", ","),
            correct_signs: signs.to_vec(),
            explanation: "Объяснение".to_string(),
            scheme: scheme.to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    pub fn mother_came() -> Sentence {
        Sentence {
            id: 100,
            text: "Мама пришла[?]дочь обрадовалась".to_string(),
            full_text: "Мама пришла: дочь обрадовалась".to_string(),
            correct_signs: vec![PunctuationSign::Colon],
            explanation: "Вторая часть раскрывает содержание первой.".to_string(),
            scheme: "[ ]: [ ]".to_string(),
            difficulty: Difficulty::Easy,
        }
    }
}
