use log::warn;

use crate::error::ShareError;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Copied,
    /// The link has to be copied by hand.
    Manual(String),
}

impl ShareOutcome {
    pub fn message(&self) -> String {
        match self {
            ShareOutcome::Copied => {
                "Ссылка скопирована! Теперь вы можете вставить её в браузере на интерактивной доске."
                    .to_string()
            }
            ShareOutcome::Manual(url) => {
                format!("Скопируйте эту ссылку вручную для интерактивной доски:\n{url}")
            }
        }
    }
}

/// One clipboard attempt; a missing clipboard or any failure falls back to
/// manual copying straight away.
pub fn share(url: &str, clipboard: Option<&mut dyn Clipboard>) -> ShareOutcome {
    let result = match clipboard {
        Some(clipboard) => clipboard.write_text(url),
        None => Err(ShareError::Unavailable),
    };
    match result {
        Ok(()) => ShareOutcome::Copied,
        Err(err) => {
            warn!("Falling back to manual link copy: {err}");
            ShareOutcome::Manual(url.to_string())
        }
    }
}

pub fn bot_link(username: &str) -> String {
    format!("https://t.me/{username}")
}
