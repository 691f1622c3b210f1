use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PanelError::Decode(err.to_string())
        } else {
            PanelError::Transport(err.to_string())
        }
    }
}
