pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{ApiEndpoints, AuctionStore, BattleNetClient, InsertedBatch, StoreStats};
pub use config::AppConfig;
pub use core::etl::{pull_auctions_and_update_db, run_pull, EtlEngine, PullSummary};
pub use core::ingest::{fetch_auctions, resolve_item, DEFAULT_REALM_ID};
pub use domain::model::{Auction, Item, TimeLeft};
pub use utils::error::{EtlError, Result};
