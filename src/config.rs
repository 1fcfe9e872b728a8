use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_HINT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CLASS: &str = "11 \"Д\"";

#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token; required to run, checked at startup.
    pub telegram_token: Option<String>,
    pub chatgpt_api_key: Option<String>,
    pub hint_timeout: Duration,
    /// Overrides the `https://t.me/<bot>` link offered by the share action.
    pub share_url: Option<String>,
    pub authors: Vec<String>,
    pub class_label: String,
    pub sentences_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        let hint_timeout = match get("BSP_HINT_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    return Err(ConfigError::InvalidTimeout {
                        key: "BSP_HINT_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_HINT_TIMEOUT_SECS),
        };

        let authors = get("BSP_AUTHORS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            telegram_token: get("TELOXIDE_TOKEN"),
            chatgpt_api_key: get("CHATGPT_API_KEY"),
            hint_timeout,
            share_url: get("BSP_SHARE_URL"),
            authors,
            class_label: get("BSP_CLASS").unwrap_or_else(|| DEFAULT_CLASS.to_string()),
            sentences_path: get("BSP_SENTENCES_PATH").map(PathBuf::from),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
