use thiserror::Error;

use supplybot_core::LookupError;

pub mod memory;
pub mod supply_chain;

pub use memory::InMemorySupplyChainRepository;
pub use supply_chain::SqlSupplyChainRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for LookupError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Database(error) => Self::Storage(error.to_string()),
            RepositoryError::Decode(message) => Self::Decode(message),
        }
    }
}
