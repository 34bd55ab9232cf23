use thiserror::Error;

#[derive(Debug, Error)]
pub enum LadderError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid question {id}: {reason}")]
    InvalidQuestion { id: u32, reason: String },

    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u32, available: u32 },

    #[error("Logger setup failed: {0}")]
    Logger(String),
}

pub type LadderResult<T> = Result<T, LadderError>;
