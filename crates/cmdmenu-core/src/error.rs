use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
