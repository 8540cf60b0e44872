use crate::adapters::store::AuctionStore;
use crate::domain::model::{Auction, Item, ListingEntry};
use crate::domain::ports::GameDataApi;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Connected realm pulled when none is given (Tichondrius, US).
pub const DEFAULT_REALM_ID: i64 = 11;

/// Store first, then the remote API. A failed remote lookup degrades to an item with
/// empty metadata so one bad item cannot abort the pull; store errors still propagate.
pub async fn resolve_item<A>(item_id: i64, store: &AuctionStore, api: &A) -> Result<Item>
where
    A: GameDataApi + ?Sized,
{
    if let Some(item) = store.get_item(item_id)? {
        tracing::debug!("Item {} found in store", item_id);
        return Ok(item);
    }

    match api.item_detail(item_id).await {
        Ok(detail) => {
            tracing::debug!("Item {} fetched: {}", item_id, detail.name);
            Ok(Item::from_detail(item_id, detail))
        }
        Err(e) => {
            tracing::warn!("⚠️ Item {} lookup failed, keeping id only: {}", item_id, e);
            Ok(Item::placeholder(item_id))
        }
    }
}

pub fn listing_entry_to_auction(entry: ListingEntry, item: Item) -> Auction {
    Auction {
        id: entry.id,
        item,
        quantity: entry.quantity,
        unit_price: entry.unit_price,
        buyout: entry.buyout,
        time_left: entry.time_left,
    }
}

/// Pulls the realm's listing and normalizes it. Each distinct item id is resolved once.
pub async fn fetch_auctions<A>(api: &A, store: &AuctionStore, realm_id: i64) -> Result<Vec<Auction>>
where
    A: GameDataApi + ?Sized,
{
    tracing::info!("🚀 Fetching auctions for connected realm {}", realm_id);
    let listing = api.auctions(realm_id).await?;
    tracing::info!("Received {} listings", listing.auctions.len());

    let mut items: HashMap<i64, Item> = HashMap::new();
    let mut auctions = Vec::with_capacity(listing.auctions.len());

    for entry in listing.auctions {
        let item_id = entry.item.id;
        let item = match items.get(&item_id) {
            Some(item) => item.clone(),
            None => {
                let item = resolve_item(item_id, store, api).await?;
                items.insert(item_id, item.clone());
                item
            }
        };
        auctions.push(listing_entry_to_auction(entry, item));
    }

    tracing::info!(
        "Normalized {} auctions across {} distinct items",
        auctions.len(),
        items.len()
    );
    Ok(auctions)
}
