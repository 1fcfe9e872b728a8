use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::error::ExerciseError;
use crate::quiz::diagram::{DiagramExercise, SchemeToken, MAX_TOKENS, MIN_TOKENS};
use crate::quiz::exercise::{Exercise, ExerciseEngine};
use crate::quiz::placement::PlacementExercise;
use crate::quiz::selection::{HintRequest, SelectionExercise, BLANK};
use crate::quiz::session::{Session, Stage};
use crate::quiz::{Difficulty, ExerciseMode, PunctuationSign};
use crate::report::Authorship;

pub const START: &str = "СТАРТ";
pub const DOWNLOAD_TASKS: &str = "💾 Скачать список заданий";
pub const SHARE: &str = "🔗 Поделиться";
pub const TO_MENU: &str = "← В главное меню";
pub const BACK_TO_MODES: &str = "← К выбору типа игры";
pub const DOWNLOAD_REPORT: &str = "📄 Скачать результат";
pub const HINT: &str = "💡 Почему так?";
pub const NEXT_SENTENCE: &str = "Следующее предложение →";
pub const NEXT: &str = "Далее →";
pub const CONFIRM_ANSWER: &str = "Проверить ответ";
pub const CONFIRM_SCHEME: &str = "Проверить схему";
pub const REMOVE_LAST: &str = "← Удалить";
pub const CLEAR: &str = "Сброс";

pub const GREETING_TEXT: &str = "ИНТЕРАКТИВНЫЙ ТРЕНАЖЕР: бессоюзные сложные предложения (БСП).\n\nНажми «СТАРТ», чтобы начать, или скачай список всех заданий.";
pub const USE_KEYBOARD_TEXT: &str = "Пожалуйста, выберите один из вариантов на клавиатуре";
pub const HINT_LOADING_TEXT: &str = "Анализирую...";

pub type Rows = Vec<Vec<String>>;

pub fn keyboard(rows: Rows) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

fn row<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Into::into).collect()
}

pub fn mode_label(mode: ExerciseMode) -> String {
    format!("Уровень {}: {}", mode.number(), mode.title())
}

pub fn parse_mode(text: &str) -> Option<ExerciseMode> {
    ExerciseMode::ALL
        .into_iter()
        .find(|mode| mode_label(*mode) == text.trim())
}

pub fn inventory_label(index: usize, sign: PunctuationSign) -> String {
    format!("Знак {}: {}", index + 1, sign)
}

pub fn slot_label(index: usize) -> String {
    format!("Место {}", index + 1)
}

// "Знак 2: ;" -> (1, Semicolon)
fn parse_inventory(text: &str) -> Option<(usize, PunctuationSign)> {
    let (number, sign) = text.strip_prefix("Знак ")?.split_once(':')?;
    let index = number.trim().parse::<usize>().ok()?.checked_sub(1)?;
    Some((index, PunctuationSign::from_symbol(sign.trim())?))
}

fn parse_slot(text: &str) -> Option<usize> {
    text.strip_prefix("Место ")?
        .trim()
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

pub fn menu_keyboard() -> Rows {
    vec![row([START]), row([DOWNLOAD_TASKS]), row([SHARE])]
}

pub fn mode_keyboard() -> Rows {
    let mut rows: Rows = ExerciseMode::ALL
        .into_iter()
        .map(|mode| vec![mode_label(mode)])
        .collect();
    rows.push(row([TO_MENU, SHARE]));
    rows
}

pub fn difficulty_keyboard() -> Rows {
    vec![
        row(Difficulty::ALL.map(|d| d.label())),
        row([BACK_TO_MODES, SHARE]),
    ]
}

pub fn result_keyboard() -> Rows {
    vec![row([BACK_TO_MODES, SHARE]), row([DOWNLOAD_REPORT, TO_MENU])]
}

pub fn menu_text(authorship: &Authorship) -> String {
    if authorship.authors.is_empty() {
        return GREETING_TEXT.to_string();
    }
    format!(
        "{GREETING_TEXT}\n\nАвторы проекта • {} класс\n{}",
        authorship.class_label,
        authorship.authors.join("\n")
    )
}

pub fn mode_select_text() -> String {
    let mut text = String::from("Выбери тип игры:\n");
    for mode in ExerciseMode::ALL {
        text.push_str(&format!("\n{} — {}", mode_label(mode), mode.description()));
    }
    text
}

pub fn difficulty_select_text(session: &Session) -> String {
    let mut text = format!(
        "{}\n\nВыбери сложность. Сложность определяет количество грамматических основ:\n",
        header(session)
    );
    for difficulty in Difficulty::ALL {
        text.push_str(&format!("\n{} — {}", difficulty.label(), difficulty.description()));
    }
    text
}

pub fn header(session: &Session) -> String {
    format!(
        "Уровень {} · Счёт: {}/{}",
        session.mode().number(),
        session.score(),
        session.total()
    )
}

pub fn result_text(session: &Session) -> String {
    if session.total() == 0 {
        return format!(
            "{}\n\nДля сложности «{}» пока нет заданий.",
            header(session),
            session.difficulty().label()
        );
    }
    format!(
        "{}\n\nФиниш! Твой результат: {}/{} ({}%)",
        header(session),
        session.score(),
        session.total(),
        session.percentage()
    )
}

pub fn exercise_text(session: &Session, exercise: &Exercise) -> String {
    let mut text = format!(
        "{}\nСложность: {} ({})\nЗадание {} из {}\n\n",
        header(session),
        session.difficulty().label(),
        session.difficulty().description(),
        session.position() + 1,
        session.total()
    );
    match exercise {
        Exercise::Selection(e) => selection_text(e, &mut text),
        Exercise::Placement(e) => placement_text(e, &mut text),
        Exercise::Diagram(e) => diagram_text(e, &mut text),
    }
    text
}

fn selection_text(exercise: &SelectionExercise, text: &mut String) {
    text.push_str(&format!(
        "Прочитайте предложение и выберите знак для места «{}»:\n\n«{}»",
        BLANK.trim(),
        exercise.render()
    ));
    let (Some(correct), Some(chosen)) = (exercise.verdict(), exercise.selected()) else {
        return;
    };
    text.push_str(&format!("\n\nТвой ответ: {chosen}"));
    text.push_str(if correct { "\n✅ ПРАВИЛЬНО!" } else { "\n❌ ОШИБКА" });
    text.push_str(&format!("\n{}", exercise.sentence().explanation));
    if let Some(hint) = exercise.hint().text() {
        text.push_str(&format!("\n\nИИ-Помощник: {hint}"));
    }
}

fn placement_text(exercise: &PlacementExercise, text: &mut String) {
    text.push_str(&format!(
        "Выберите знак из набора и нажмите на место в тексте. В наборе могут быть лишние знаки!\n\n«{}»",
        exercise.render()
    ));

    if let Some(correct) = exercise.verdict() {
        text.push_str(if correct { "\n\n🌟 ВЕРНО!" } else { "\n\n🧐 ЕСТЬ ОШИБКИ" });
        for (i, ok) in exercise.slot_results().into_iter().enumerate() {
            let mark = if ok { "✅" } else { "❌" };
            text.push_str(&format!("\n{}: {mark}", slot_label(i)));
        }
        if !correct {
            text.push_str(&format!("\nВерный вариант: {}", exercise.sentence().full_text));
        }
        text.push_str(&format!("\n{}", exercise.sentence().explanation));
        return;
    }

    if exercise.inventory().is_empty() {
        text.push_str("\n\nВсе знаки распределены! Можно проверять.");
    } else {
        let entries = exercise
            .inventory()
            .iter()
            .enumerate()
            .map(|(i, sign)| {
                let marker = if exercise.selected() == Some(i) { "👉" } else { "" };
                format!("{marker}{}) {sign}", i + 1)
            })
            .collect::<Vec<_>>()
            .join("   ");
        text.push_str(&format!("\n\nТвой набор знаков: {entries}"));
    }
}

fn diagram_text(exercise: &DiagramExercise, text: &mut String) {
    text.push_str(&format!(
        "Составьте схему данного предложения. Используйте блоки [ ] для грамматических основ и знаки препинания.\n\n«{}»\n\n",
        exercise.sentence().full_text
    ));
    if exercise.tokens().is_empty() {
        text.push_str("Блоки появятся здесь...");
    } else {
        let blocks = exercise
            .tokens()
            .iter()
            .map(SchemeToken::label)
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&format!("Схема: {blocks}"));
    }

    if let Some(correct) = exercise.verdict() {
        text.push_str(if correct { "\n\n🏆 ИДЕАЛЬНО!" } else { "\n\n🔍 ЕСТЬ НЕДОЧЕТЫ" });
        if !correct {
            text.push_str(&format!("\nВерная схема: {}", exercise.sentence().scheme));
        }
        text.push_str(&format!("\n{}", exercise.sentence().explanation));
    }
}

pub fn exercise_keyboard(exercise: &Exercise) -> Rows {
    let mut rows = match exercise {
        Exercise::Selection(e) => selection_keyboard(e),
        Exercise::Placement(e) => placement_keyboard(e),
        Exercise::Diagram(e) => diagram_keyboard(e),
    };
    rows.push(row([BACK_TO_MODES, SHARE]));
    rows
}

fn selection_keyboard(exercise: &SelectionExercise) -> Rows {
    match exercise.verdict() {
        None => vec![row(PunctuationSign::ALL.map(|s| s.symbol()))],
        Some(false) if exercise.hint().text().is_none() => {
            vec![row([HINT]), row([NEXT_SENTENCE])]
        }
        Some(_) => vec![row([NEXT_SENTENCE])],
    }
}

fn placement_keyboard(exercise: &PlacementExercise) -> Rows {
    if exercise.is_confirmed() {
        return vec![row([NEXT])];
    }
    let mut rows = Vec::new();
    if !exercise.inventory().is_empty() {
        rows.push(
            exercise
                .inventory()
                .iter()
                .enumerate()
                .map(|(i, sign)| inventory_label(i, *sign))
                .collect(),
        );
    }
    rows.push((0..exercise.slots().len()).map(slot_label).collect());
    if exercise.is_complete() {
        rows.push(row([CONFIRM_ANSWER]));
    }
    rows
}

fn diagram_keyboard(exercise: &DiagramExercise) -> Rows {
    if exercise.is_confirmed() {
        return vec![row([NEXT])];
    }
    let mut rows = vec![
        row(SchemeToken::ALL.map(|t| t.label())),
        row([REMOVE_LAST, CLEAR]),
    ];
    if exercise.can_confirm() {
        rows.push(row([CONFIRM_SCHEME]));
    }
    rows
}

/// Text and keyboard for the session's current stage. A playing session
/// without an exercise falls back to the result screen.
pub fn stage_screen(
    session: &Session,
    exercise: Option<&Exercise>,
    authorship: &Authorship,
) -> (String, Rows) {
    match (session.stage(), exercise) {
        (Stage::Menu, _) => (menu_text(authorship), menu_keyboard()),
        (Stage::ModeSelect, _) => (mode_select_text(), mode_keyboard()),
        (Stage::DifficultySelect, _) => (difficulty_select_text(session), difficulty_keyboard()),
        (Stage::Playing, Some(exercise)) => (
            exercise_text(session, exercise),
            exercise_keyboard(exercise),
        ),
        (Stage::Playing, None) | (Stage::Result, _) => (result_text(session), result_keyboard()),
    }
}

/// Result of feeding one button press to the active exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The exercise changed; redraw it.
    Updated,
    /// The answer was confirmed with this verdict.
    Answered(bool),
    /// The user wants the next sentence; carries the confirmed verdict.
    Advance(bool),
    /// A hint was asked for; `None` when one is loading or already shown.
    Hint(Option<HintRequest>),
}

/// Applies a button press. `None` means the text is not a button of this
/// exercise.
pub fn apply_input(exercise: &mut Exercise, text: &str) -> Option<Result<Outcome, ExerciseError>> {
    let text = text.trim();
    if text == NEXT || text == NEXT_SENTENCE {
        return Some(
            exercise
                .verdict()
                .map(Outcome::Advance)
                .ok_or(ExerciseError::NotConfirmed),
        );
    }

    match exercise {
        Exercise::Selection(e) => {
            if text == HINT {
                return Some(e.begin_hint().map(Outcome::Hint));
            }
            let sign = PunctuationSign::from_symbol(text)?;
            Some(e.choose(sign).map(Outcome::Answered))
        }
        Exercise::Placement(e) => {
            if text == CONFIRM_ANSWER {
                return Some(e.confirm().map(Outcome::Answered));
            }
            if let Some((index, sign)) = parse_inventory(text) {
                // Buttons from an older keyboard may point at a shifted entry
                if e.inventory().get(index).is_some_and(|&entry| entry != sign) {
                    return Some(Err(ExerciseError::EntryChanged(index)));
                }
                return Some(e.select(index).map(|_| Outcome::Updated));
            }
            let slot = parse_slot(text)?;
            Some(e.place(slot).map(|_| Outcome::Updated))
        }
        Exercise::Diagram(e) => {
            let result = match text {
                CONFIRM_SCHEME => return Some(e.confirm().map(Outcome::Answered)),
                REMOVE_LAST => e.pop().map(|_| ()),
                CLEAR => e.clear(),
                other => e.push(SchemeToken::parse(other)?),
            };
            Some(result.map(|_| Outcome::Updated))
        }
    }
}

pub fn exercise_error_text(err: &ExerciseError) -> String {
    match err {
        ExerciseError::Locked => "Ответ уже принят. Нажми «Далее».".to_string(),
        ExerciseError::NotConfirmed => "Сначала ответь на задание.".to_string(),
        ExerciseError::Incomplete => "Заполни все места, прежде чем проверять.".to_string(),
        ExerciseError::TooShort { .. } => {
            format!("В схеме должно быть не меньше {MIN_TOKENS} блоков.")
        }
        ExerciseError::TooLong { .. } => format!("В схеме не может быть больше {MAX_TOKENS} блоков."),
        ExerciseError::NoSuchEntry(_) => "Такого знака нет в наборе.".to_string(),
        ExerciseError::EntryChanged(_) => {
            "Набор знаков изменился. Выбери знак на новой клавиатуре.".to_string()
        }
        ExerciseError::NoSuchSlot(_) => "Такого места в предложении нет.".to_string(),
        ExerciseError::EmptySlot(_) => "Сначала выбери знак из набора.".to_string(),
        ExerciseError::HintUnavailable => {
            "Объяснение доступно только после ошибки.".to_string()
        }
    }
}
