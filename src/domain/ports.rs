use crate::domain::model::{AuctionListing, ItemDetail};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read side of the remote game-data API consumed by ingestion.
#[async_trait]
pub trait GameDataApi: Send + Sync {
    async fn item_detail(&self, item_id: i64) -> Result<ItemDetail>;
    async fn auctions(&self, connected_realm_id: i64) -> Result<AuctionListing>;
}
