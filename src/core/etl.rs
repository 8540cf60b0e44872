use crate::adapters::battlenet::BattleNetClient;
use crate::adapters::store::{format_pull_datetime, AuctionStore, StoreStats};
use crate::config::AppConfig;
use crate::core::ingest::{fetch_auctions, DEFAULT_REALM_ID};
use crate::domain::ports::GameDataApi;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Outcome of one committed pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub pull_id: i64,
    pub pulled_at: DateTime<Utc>,
    pub auctions_fetched: usize,
    pub auctions_inserted: usize,
    pub store: StoreStats,
}

pub struct EtlEngine<A: GameDataApi> {
    api: A,
    realm_id: i64,
}

impl<A: GameDataApi> EtlEngine<A> {
    pub fn new(api: A) -> Self {
        Self::for_realm(api, DEFAULT_REALM_ID)
    }

    pub fn for_realm(api: A, realm_id: i64) -> Self {
        Self { api, realm_id }
    }

    /// Extracts the listing and loads it into `store` under `pulled_at`. Committing is
    /// left to the caller, who owns the store.
    pub async fn run(&self, store: &AuctionStore, pulled_at: DateTime<Utc>) -> Result<PullSummary> {
        tracing::info!("Starting auction pull at {}", format_pull_datetime(&pulled_at));

        // Extract + transform
        let auctions = fetch_auctions(&self.api, store, self.realm_id).await?;

        // Load
        tracing::info!("Loading {} auctions...", auctions.len());
        let batch = store.insert_auctions(&auctions, &pulled_at)?;
        let stats = store.stats()?;

        tracing::info!(
            "Pull {}: {} of {} auctions inserted (store: {} items, {} auctions, {} pulls)",
            batch.pull_id,
            batch.inserted,
            auctions.len(),
            stats.items,
            stats.auctions,
            stats.pulls
        );

        Ok(PullSummary {
            pull_id: batch.pull_id,
            pulled_at,
            auctions_fetched: auctions.len(),
            auctions_inserted: batch.inserted,
            store: stats,
        })
    }
}

/// One full pull-and-persist cycle against the store at `db_path`. Nothing is written
/// unless every step succeeds.
pub async fn run_pull<A: GameDataApi>(
    engine: &EtlEngine<A>,
    db_path: &std::path::Path,
    pulled_at: DateTime<Utc>,
) -> Result<PullSummary> {
    let store = AuctionStore::open(db_path)?;
    let summary = engine.run(&store, pulled_at).await?;
    store.commit()?;
    Ok(summary)
}

pub async fn pull_auctions_and_update_db(config: &AppConfig) -> Result<PullSummary> {
    let client = BattleNetClient::new(config.client_id.clone(), config.client_secret.clone())?;
    let engine = EtlEngine::new(client);
    let pulled_at = Utc::now();
    run_pull(&engine, &config.db_path, pulled_at).await
}
