use thiserror::Error;

/// Failure of the text-generation collaborator, classified by cause so the
/// caller can render a specific message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("text model rate limit exceeded")]
    RateLimited,

    #[error("text model authentication failed")]
    Auth,

    #[error("network error reaching text model: {0}")]
    Network(String),

    #[error("text model request failed: {0}")]
    Unknown(String),
}

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("deck generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("card lookup request failed: {0}")]
    Lookup(#[from] reqwest::Error),

    #[error("model response contained no recognizable card lines")]
    EmptyResponse,

    #[error("none of the proposed cards could be resolved")]
    NothingResolved,

    #[error("normalized deck has {actual} cards, expected exactly {expected}")]
    SizeInvariant { expected: u32, actual: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("settings file error: {0}")]
    SettingsError(#[from] toml::de::Error),

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DeckError>;
