use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopFinanceError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid asset record '{asset}': {reason}")]
    InvalidAsset { asset: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ShopFinanceError {
    fn from(e: serde_json::Error) -> Self {
        ShopFinanceError::SerializationError(e.to_string())
    }
}
