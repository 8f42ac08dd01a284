use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("no candidate images to filter")]
    EmptyBaseSet,

    #[error("stale response for epoch {epoch} (current epoch {current})")]
    StaleResponse { epoch: u64, current: u64 },

    #[error("invalid filter category '{0}'")]
    InvalidFilterCategory(String),

    #[error("invalid value '{value}' for filter category '{category}'")]
    InvalidFilterValue { category: String, value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
