mod config;
mod error;
mod quiz;
mod report;
mod screens;
mod share;


use std::{fmt::Display, fs::File, sync::Arc};

use chrono::Local;
use config::Config;
use dotenv::dotenv;
use log::{debug, error, info, warn};
use quiz::{
    ai_helper::QuizHelper,
    exercise::{Exercise, ExerciseEngine},
    repository::SentenceRepository,
    session::{Session, Stage},
    Difficulty,
};
use report::{Authorship, Export};
use screens::{keyboard, Outcome};
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatAction, InputFile},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Quiz {
        session: Session,
        exercise: Option<Exercise>,
    },
}

type DialogueStorage = Arc<ErasedStorage<State>>;

/// Read-only services shared by every chat.
struct Trainer {
    repository: SentenceRepository,
    helper: QuizHelper,
    authorship: Authorship,
    share_url: String,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    if let Err(err) = run().await {
        error!("BSP trainer stopped: {err}");
        std::process::exit(1);
    }
}

async fn run() -> HandlerResult {
    info!("Starting BSP trainer bot...");
    let config = Config::from_env()?;

    let repository = match &config.sentences_path {
        Some(path) => {
            info!("Loading sentences from {}", path.display());
            SentenceRepository::from_reader(File::open(path)?)?
        }
        None => SentenceRepository::builtin()?,
    };
    info!("Loaded {} sentences", repository.len());

    let token = config
        .telegram_token
        .clone()
        .ok_or(error::ConfigError::Missing("TELOXIDE_TOKEN"))?;
    let bot = Bot::new(token);

    let share_url = match &config.share_url {
        Some(url) => url.clone(),
        None => share::bot_link(bot.get_me().await?.username()),
    };

    let trainer = Arc::new(Trainer {
        repository,
        helper: QuizHelper::from_config(&config),
        authorship: Authorship {
            authors: config.authors.clone(),
            class_label: config.class_label.clone(),
        },
        share_url,
    });

    let storage: DialogueStorage = InMemStorage::<State>::new().erase();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Quiz { session, exercise }].endpoint(quiz_step)),
    )
    .dependencies(dptree::deps![storage, trainer])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    trainer: Arc<Trainer>,
    msg: Message,
) -> HandlerResult {
    info!("New session in chat {}", msg.chat.id);
    commit(&bot, &dialogue, &trainer, msg.chat.id, Session::new(), None).await
}

async fn quiz_step(
    bot: Bot,
    dialogue: QuizDialogue,
    trainer: Arc<Trainer>,
    (session, exercise): (Session, Option<Exercise>),
    msg: Message,
) -> HandlerResult {
    let chat = msg.chat.id;
    let Some(text) = msg.text() else {
        bot.send_message(chat, screens::USE_KEYBOARD_TEXT).await?;
        return Ok(());
    };

    if text.starts_with("/start") {
        return start(bot, dialogue, trainer, msg).await;
    }
    if text == screens::SHARE {
        let outcome = share::share(&trainer.share_url, None);
        bot.send_message(chat, outcome.message()).await?;
        return Ok(());
    }

    debug!("chat {chat} in {:?}: {text:?}", session.stage());
    match session.stage() {
        Stage::Menu => menu_step(&bot, &dialogue, &trainer, chat, session, text).await,
        Stage::ModeSelect => mode_step(&bot, &dialogue, &trainer, chat, session, text).await,
        Stage::DifficultySelect => {
            difficulty_step(&bot, &dialogue, &trainer, chat, session, text).await
        }
        Stage::Playing => play_step(&bot, &dialogue, &trainer, chat, session, exercise, text).await,
        Stage::Result => result_step(&bot, &dialogue, &trainer, chat, session, text).await,
    }
}

async fn menu_step(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    mut session: Session,
    text: &str,
) -> HandlerResult {
    match text {
        screens::START => match session.start() {
            Ok(()) => commit(bot, dialogue, trainer, chat, session, None).await,
            Err(err) => reject(bot, chat, err).await,
        },
        screens::DOWNLOAD_TASKS => {
            send_export(bot, chat, report::task_list(&trainer.repository, &trainer.authorship)).await
        }
        _ => reject(bot, chat, "unknown menu button").await,
    }
}

async fn mode_step(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    mut session: Session,
    text: &str,
) -> HandlerResult {
    let result = match text {
        screens::TO_MENU => session.to_menu(),
        screens::BACK_TO_MODES => session.back_to_modes(),
        other => match screens::parse_mode(other) {
            Some(mode) => session.choose_mode(mode),
            None => return reject(bot, chat, "unknown mode").await,
        },
    };
    match result {
        Ok(()) => commit(bot, dialogue, trainer, chat, session, None).await,
        Err(err) => reject(bot, chat, err).await,
    }
}

async fn difficulty_step(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    mut session: Session,
    text: &str,
) -> HandlerResult {
    let result = if text == screens::BACK_TO_MODES {
        session.back_to_modes()
    } else {
        match Difficulty::from_label(text) {
            Some(difficulty) => begin_round(&mut session, difficulty, &trainer.repository),
            None => return reject(bot, chat, "unknown difficulty").await,
        }
    };
    match result {
        Ok(()) => commit(bot, dialogue, trainer, chat, session, None).await,
        Err(err) => reject(bot, chat, err).await,
    }
}

async fn play_step(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    mut session: Session,
    exercise: Option<Exercise>,
    text: &str,
) -> HandlerResult {
    if text == screens::BACK_TO_MODES {
        return match session.back_to_modes() {
            Ok(()) => commit(bot, dialogue, trainer, chat, session, None).await,
            Err(err) => reject(bot, chat, err).await,
        };
    }

    let Some(mut exercise) = exercise.or_else(|| exercise_for(&session)) else {
        return commit(bot, dialogue, trainer, chat, session, None).await;
    };

    debug!("chat {chat}: sentence {} gets {text:?}", exercise.sentence().id);
    match screens::apply_input(&mut exercise, text) {
        None => {
            bot.send_message(chat, screens::USE_KEYBOARD_TEXT)
                .reply_markup(keyboard(screens::exercise_keyboard(&exercise)))
                .await?;
            Ok(())
        }
        Some(Err(err)) => {
            debug!("chat {chat}: rejected exercise input: {err}");
            bot.send_message(chat, screens::exercise_error_text(&err))
                .reply_markup(keyboard(screens::exercise_keyboard(&exercise)))
                .await?;
            Ok(())
        }
        Some(Ok(Outcome::Updated | Outcome::Answered(_))) => {
            commit(bot, dialogue, trainer, chat, session, Some(exercise)).await
        }
        Some(Ok(Outcome::Advance(correct))) => match session.record_verdict(correct) {
            Ok(_) => commit(bot, dialogue, trainer, chat, session, None).await,
            Err(err) => reject(bot, chat, err).await,
        },
        Some(Ok(Outcome::Hint(None))) => {
            let Exercise::Selection(selection) = &exercise else {
                return Ok(());
            };
            let text = match selection.hint().text() {
                Some(hint) => format!("ИИ-Помощник: {hint}"),
                None if selection.hint().is_loading() => screens::HINT_LOADING_TEXT.to_string(),
                None => return Ok(()),
            };
            bot.send_message(chat, text).await?;
            Ok(())
        }
        Some(Ok(Outcome::Hint(Some(request)))) => {
            // Store the loading flag first so a repeated tap is a no-op
            dialogue
                .update(State::Quiz {
                    session: session.clone(),
                    exercise: Some(exercise.clone()),
                })
                .await?;

            // The typing indicator is cosmetic, its failure does not matter
            let _ = bot.send_chat_action(chat, ChatAction::Typing).await;

            let hint = trainer.helper.explain_wrong_sign(&request).await;
            if let Exercise::Selection(selection) = &mut exercise {
                selection.finish_hint(hint);
            }
            commit(bot, dialogue, trainer, chat, session, Some(exercise)).await
        }
    }
}

async fn result_step(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    mut session: Session,
    text: &str,
) -> HandlerResult {
    let result = match text {
        screens::BACK_TO_MODES => session.back_to_modes(),
        screens::TO_MENU => session.to_menu(),
        screens::DOWNLOAD_REPORT => {
            let today = Local::now().date_naive();
            let export = report::session_report(&session, today, &trainer.authorship);
            return send_export(bot, chat, export).await;
        }
        _ => return reject(bot, chat, "unknown result button").await,
    };
    match result {
        Ok(()) => commit(bot, dialogue, trainer, chat, session, None).await,
        Err(err) => reject(bot, chat, err).await,
    }
}

/// Chooses the difficulty and samples the round. Kept synchronous so the
/// thread-local RNG never lives across an `.await`.
fn begin_round(
    session: &mut Session,
    difficulty: Difficulty,
    repository: &SentenceRepository,
) -> Result<(), error::SessionError> {
    session.choose_difficulty(difficulty, repository, &mut rand::thread_rng())
}

fn exercise_for(session: &Session) -> Option<Exercise> {
    let sentence = session.current_sentence()?.clone();
    Some(Exercise::new(session.mode(), sentence, &mut rand::thread_rng()))
}

/// Stores the new state, then shows the screen for its stage.
async fn commit(
    bot: &Bot,
    dialogue: &QuizDialogue,
    trainer: &Trainer,
    chat: ChatId,
    session: Session,
    exercise: Option<Exercise>,
) -> HandlerResult {
    let exercise = match session.stage() {
        Stage::Playing => exercise.or_else(|| exercise_for(&session)),
        _ => None,
    };

    let (text, rows) = screens::stage_screen(&session, exercise.as_ref(), &trainer.authorship);

    dialogue.update(State::Quiz { session, exercise }).await?;
    bot.send_message(chat, text)
        .reply_markup(keyboard(rows))
        .await?;
    Ok(())
}

async fn send_export(bot: &Bot, chat: ChatId, export: Export) -> HandlerResult {
    info!("Sending {} to chat {chat}", export.file_name);
    bot.send_document(
        chat,
        InputFile::memory(export.content.into_bytes()).file_name(export.file_name),
    )
    .await?;
    Ok(())
}

async fn reject(bot: &Bot, chat: ChatId, reason: impl Display) -> HandlerResult {
    warn!("chat {chat}: ignored input ({reason})");
    bot.send_message(chat, screens::USE_KEYBOARD_TEXT).await?;
    Ok(())
}
