use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Day not found: {0}")]
    DayNotFound(NaiveDate),

    #[error("Invalid size code: {0} (expected 0-4)")]
    InvalidSize(u8),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl WardrobeError {
    /// True for errors caused by acting on an entity that no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WardrobeError::ItemNotFound(_)
                | WardrobeError::CategoryNotFound(_)
                | WardrobeError::DayNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WardrobeError>;
