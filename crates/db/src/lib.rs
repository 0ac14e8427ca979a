pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{connect_with_settings, DbPool};
pub use fixtures::{SampleDataset, SeedResult, VerificationResult};
pub use repositories::{InMemorySupplyChainRepository, RepositoryError, SqlSupplyChainRepository};
pub use store::{StoreInitError, SupplyChainStore};
