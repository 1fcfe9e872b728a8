use chrono::NaiveDate;

use crate::quiz::repository::SentenceRepository;
use crate::quiz::session::Session;

pub const TASK_LIST_FILE_NAME: &str = "bsp_tasks_list.txt";

const SEPARATOR: &str = "====================================================";
const RULE: &str = "----------------------------------------------------";

/// Who made the trainer; printed in both exports.
#[derive(Debug, Clone, Default)]
pub struct Authorship {
    pub authors: Vec<String>,
    pub class_label: String,
}

/// A generated text file ready to be sent as a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub content: String,
}

pub fn task_list(repository: &SentenceRepository, authorship: &Authorship) -> Export {
    let mut content = String::from("СПИСОК ЗАДАНИЙ: БСП (БЕССОЮЗНЫЕ СЛОЖНЫЕ ПРЕДЛОЖЕНИЯ)\n");
    content.push_str(&format!("Авторы: {}\n", authorship.authors.join(", ")));
    content.push_str(&format!("Класс: {}\n", authorship.class_label));
    content.push_str(SEPARATOR);
    content.push_str("\n\n");

    for (i, sentence) in repository.all().iter().enumerate() {
        content.push_str(&format!(
            "{}. [{}] {}\n",
            i + 1,
            sentence.difficulty.tag(),
            sentence.full_text
        ));
        content.push_str(&format!("   Схема: {}\n", sentence.scheme));
        content.push_str(&format!("   Объяснение: {}\n\n", sentence.explanation));
    }

    Export {
        file_name: TASK_LIST_FILE_NAME.to_string(),
        content,
    }
}

pub fn session_report(session: &Session, date: NaiveDate, authorship: &Authorship) -> Export {
    let date = date.format("%d.%m.%Y").to_string();

    let mut content = String::from("ОТЧЕТ О ПРОХОЖДЕНИИ ТРЕНАЖЕРА БСП\n");
    content.push_str(&format!("Дата: {date}\n"));
    content.push_str(RULE);
    content.push('\n');
    content.push_str(&format!("Тип игры: Уровень {}\n", session.mode().number()));
    content.push_str(&format!("Сложность: {}\n", session.difficulty().label()));
    content.push_str(&format!(
        "Результат: {} из {}\n",
        session.score(),
        session.total()
    ));
    content.push_str(&format!("Процент успеха: {}%\n", session.percentage()));
    content.push_str(RULE);
    content.push('\n');
    content.push_str(&format!(
        "Проект выполнен учениками {} класса:\n{}\n",
        authorship.class_label,
        authorship.authors.join("\n")
    ));

    Export {
        file_name: format!("bsp_result_report_{}.txt", date.replace('.', "_")),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixtures;
    use crate::quiz::{Difficulty, ExerciseMode, PunctuationSign};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn authorship() -> Authorship {
        Authorship {
            authors: vec!["Иванова А.".to_string(), "Петров Б.".to_string()],
            class_label: "11 \"Д\"".to_string(),
        }
    }

    #[test]
    fn task_list_covers_every_sentence() {
        let repo = SentenceRepository::builtin().unwrap();
        let export = task_list(&repo, &authorship());
        assert_eq!(export.file_name, "bsp_tasks_list.txt");
        assert!(export.content.starts_with("СПИСОК ЗАДАНИЙ"));
        assert!(export.content.contains("Авторы: Иванова А., Петров Б.\n"));
        for sentence in repo.all() {
            assert!(export.content.contains(&sentence.full_text));
        }
        assert!(export.content.contains("1. [EASY] "));
        assert_eq!(export.content.matches("   Схема: ").count(), repo.len());
    }

    #[test]
    fn report_for_a_finished_round() {
        let mut sentence = fixtures::sentence(1, "a[?] b", &[PunctuationSign::Comma], "[ ], [ ]");
        sentence.difficulty = Difficulty::Medium;
        let mut second = sentence.clone();
        second.id = 2;
        let mut third = sentence.clone();
        third.id = 3;
        let repo = SentenceRepository::new(vec![sentence, second, third]).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::new();
        session.start().unwrap();
        session.choose_mode(ExerciseMode::Diagram).unwrap();
        session.choose_difficulty(Difficulty::Medium, &repo, &mut rng).unwrap();
        session.record_verdict(true).unwrap();
        session.record_verdict(false).unwrap();
        session.record_verdict(false).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let export = session_report(&session, date, &authorship());
        assert_eq!(export.file_name, "bsp_result_report_19_10_2026.txt");
        assert!(export.content.contains("Дата: 19.10.2026\n"));
        assert!(export.content.contains("Тип игры: Уровень 3\n"));
        assert!(export.content.contains("Сложность: Средне\n"));
        assert!(export.content.contains("Результат: 1 из 3\n"));
        assert!(export.content.contains("Процент успеха: 33%\n"));
        assert!(export.content.ends_with("Иванова А.\nПетров Б.\n"));
    }

    #[test]
    fn report_for_an_empty_round() {
        let repo = SentenceRepository::new(Vec::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::new();
        session.start().unwrap();
        session.choose_mode(ExerciseMode::Selection).unwrap();
        session.choose_difficulty(Difficulty::Hard, &repo, &mut rng).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let export = session_report(&session, date, &authorship());
        assert!(export.content.contains("Результат: 0 из 0\n"));
        assert!(export.content.contains("Процент успеха: 0%\n"));
    }
}
