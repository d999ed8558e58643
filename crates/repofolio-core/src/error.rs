use thiserror::Error;

/// Which of the two sequential requests a load failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    User,
    Repos,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::User => write!(f, "user"),
            LoadStage::Repos => write!(f, "repos"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to load GitHub {stage}: {reason}")]
    LoadFailed { stage: LoadStage, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn load_failed(stage: LoadStage, source: impl std::fmt::Display) -> Self {
        Error::LoadFailed {
            stage,
            reason: source.to_string(),
        }
    }
}
