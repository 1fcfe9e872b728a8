use std::fmt::Display;

use chatgpt::client::ChatGPT;
use chatgpt::config::ChatGPTEngine;
use chatgpt::types::CompletionResponse;
use log::{debug, warn};

use crate::config::Config;
use crate::quiz::selection::HintRequest;

pub const EMPTY_REPLY_FALLBACK: &str = "Не удалось получить объяснение. Попробуйте позже.";
pub const ERROR_FALLBACK: &str = "Ошибка при получении объяснения от ИИ.";

/// Hint lifecycle for one sentence. Only `Idle` lets a new request through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HintState {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

impl HintState {
    /// Moves `Idle` to `Loading`; returns false if a request is in flight or
    /// the hint is already cached.
    pub fn begin(&mut self) -> bool {
        if *self == HintState::Idle {
            *self = HintState::Loading;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self, text: String) {
        *self = HintState::Ready(text);
    }

    pub fn is_loading(&self) -> bool {
        *self == HintState::Loading
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            HintState::Ready(text) => Some(text),
            _ => None,
        }
    }
}

/// Explains wrong answers with a short AI-written note.
///
/// Without an API key every request resolves to the error fallback.
pub struct QuizHelper {
    chat_gpt: Option<ChatGPT>,
}

impl QuizHelper {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self {
            chat_gpt: Some(chat_gpt),
        }
    }

    pub fn disabled() -> Self {
        Self { chat_gpt: None }
    }

    pub fn from_config(config: &Config) -> Self {
        let Some(api_key) = config.chatgpt_api_key.as_deref() else {
            warn!("CHATGPT_API_KEY is not set, AI explanations are disabled");
            return Self::disabled();
        };
        match ChatGPT::new(api_key) {
            Ok(mut gpt) => {
                gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
                gpt.config.timeout = config.hint_timeout;
                Self::new(gpt)
            }
            Err(err) => {
                warn!("Unable to set up ChatGPT client, AI explanations are disabled: {err}");
                Self::disabled()
            }
        }
    }

    /// Never fails: transport errors and empty replies become a fallback
    /// text that is shown like any other explanation.
    pub async fn explain_wrong_sign(&self, request: &HintRequest) -> String {
        let Some(chat_gpt) = &self.chat_gpt else {
            return ERROR_FALLBACK.to_string();
        };

        debug!(
            "Generating explanation for {:?}: chose {}, correct {}",
            request.sentence, request.chosen, request.correct
        );
        let reply = chat_gpt
            .send_message(build_prompt(request))
            .await
            .map(|response: CompletionResponse| response.message().content.clone());

        let text = resolve_reply(reply);
        debug!("Completion: {:?}", text);
        text
    }
}

pub fn build_prompt(request: &HintRequest) -> String {
    format!(
        "Предложение: \"{sentence}\"
        Пользователь выбрал знак: \"{chosen}\"
        Правильный знак: \"{correct}\"

        Объясни кратко и доступно для школьника 11 класса, почему в этом бессоюзном сложном предложении (БСП) ставится именно \"{correct}\".
        Используй правила русского языка. Ответ дай на русском языке, не более 3 предложений.",
        sentence = request.sentence,
        chosen = request.chosen,
        correct = request.correct,
    )
}

pub fn resolve_reply<E: Display>(reply: Result<String, E>) -> String {
    match reply {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => EMPTY_REPLY_FALLBACK.to_string(),
        Err(err) => {
            warn!("AI explanation failed: {err}");
            ERROR_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::PunctuationSign;

    fn request() -> HintRequest {
        HintRequest {
            sentence: "Мама пришла[?]дочь обрадовалась".to_string(),
            chosen: PunctuationSign::Comma,
            correct: PunctuationSign::Colon,
        }
    }

    #[test]
    fn prompt_carries_the_answer_pair() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Мама пришла[?]дочь обрадовалась"));
        assert!(prompt.contains("Пользователь выбрал знак: \",\""));
        assert!(prompt.contains("Правильный знак: \":\""));
        assert!(prompt.contains("не более 3 предложений"));
    }

    #[test]
    fn failures_resolve_to_fallback_text() {
        assert_eq!(resolve_reply::<String>(Ok("Ответ.".into())), "Ответ.");
        assert_eq!(resolve_reply::<String>(Ok("  ".into())), EMPTY_REPLY_FALLBACK);
        assert_eq!(resolve_reply::<String>(Err("timeout".into())), ERROR_FALLBACK);
    }

    #[test]
    fn hint_state_lets_one_request_through() {
        let mut state = HintState::default();
        assert!(state.begin());
        assert!(state.is_loading());
        assert!(!state.begin());
        state.finish("текст".to_string());
        assert!(!state.begin());
        assert_eq!(state.text(), Some("текст"));
    }

    #[tokio::test]
    async fn disabled_helper_falls_back() {
        let helper = QuizHelper::disabled();
        assert_eq!(helper.explain_wrong_sign(&request()).await, ERROR_FALLBACK);
    }
}
