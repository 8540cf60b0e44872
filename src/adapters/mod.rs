// Adapters layer: concrete implementations for external systems.

pub mod battlenet;
pub mod store;

pub use battlenet::{ApiEndpoints, BattleNetClient};
pub use store::{AuctionStore, InsertedBatch, StoreStats};
