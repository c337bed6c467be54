pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, DbPool};
pub use fixtures::{SeedCatalog, SeedResult, VerificationResult};
pub use repositories::{
    CategoryRankQuery, InMemoryProductRepository, ProductRepository, RepositoryError,
    SqlProductRepository,
};
