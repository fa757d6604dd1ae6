use thiserror::Error;

use super::cart::ItemId;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Menu item {0} not found")]
    ItemNotFound(ItemId),
    #[error("Cart line {0} not found")]
    LineNotFound(ItemId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
