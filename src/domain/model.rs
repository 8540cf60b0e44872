use serde::{Deserialize, Serialize};

/// Item metadata. Stored once per item id and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub item_class: String,
    pub item_subclass: String,
    pub quality: String,
}

impl Item {
    /// Item with every metadata field empty, used when the remote lookup failed.
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            item_class: String::new(),
            item_subclass: String::new(),
            quality: String::new(),
        }
    }

    pub fn from_detail(id: i64, detail: ItemDetail) -> Self {
        Self {
            id,
            name: detail.name,
            item_class: detail.item_class.name,
            item_subclass: detail.item_subclass.name,
            quality: detail.quality.name,
        }
    }
}

/// One auction listing as observed in a single pull.
///
/// `id` is only unique within a pull. `quantity`, `unit_price` and `buyout` are in the
/// smallest currency unit; `None` means the field was absent from the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    pub id: i64,
    pub item: Item,
    pub quantity: Option<i64>,
    pub unit_price: Option<i64>,
    pub buyout: Option<i64>,
    pub time_left: String,
}

impl Auction {
    pub fn time_left_rank(&self) -> Option<u8> {
        TimeLeft::parse(&self.time_left).map(TimeLeft::rank)
    }
}

/// Coarse remaining-duration bucket, ordered shortest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeLeft {
    Short,
    Medium,
    Long,
    VeryLong,
}

impl TimeLeft {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SHORT" => Some(TimeLeft::Short),
            "MEDIUM" => Some(TimeLeft::Medium),
            "LONG" => Some(TimeLeft::Long),
            "VERY_LONG" => Some(TimeLeft::VeryLong),
            _ => None,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            TimeLeft::Short => 1,
            TimeLeft::Medium => 2,
            TimeLeft::Long => 3,
            TimeLeft::VeryLong => 4,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(TimeLeft::Short),
            2 => Some(TimeLeft::Medium),
            3 => Some(TimeLeft::Long),
            4 => Some(TimeLeft::VeryLong),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeLeft::Short => "SHORT",
            TimeLeft::Medium => "MEDIUM",
            TimeLeft::Long => "LONG",
            TimeLeft::VeryLong => "VERY_LONG",
        }
    }
}

// Raw game-data API payloads. Only the fields the pipeline reads are declared.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub name: String,
    pub item_class: NamedRef,
    pub item_subclass: NamedRef,
    pub quality: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub id: i64,
    pub item: ItemRef,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<i64>,
    #[serde(default)]
    pub buyout: Option<i64>,
    #[serde(default)]
    pub time_left: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionListing {
    #[serde(default)]
    pub auctions: Vec<ListingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auction_with(time_left: &str) -> Auction {
        Auction {
            id: 1,
            item: Item::placeholder(10),
            quantity: Some(1),
            unit_price: None,
            buyout: None,
            time_left: time_left.to_string(),
        }
    }

    #[test]
    fn test_time_left_rank() {
        assert_eq!(auction_with("SHORT").time_left_rank(), Some(1));
        assert_eq!(auction_with("MEDIUM").time_left_rank(), Some(2));
        assert_eq!(auction_with("LONG").time_left_rank(), Some(3));
        assert_eq!(auction_with("VERY_LONG").time_left_rank(), Some(4));

        assert_eq!(auction_with("short").time_left_rank(), None);
        assert_eq!(auction_with("").time_left_rank(), None);
        assert_eq!(auction_with("FOREVER").time_left_rank(), None);
    }

    #[test]
    fn test_time_left_rank_round_trip() {
        for bucket in [
            TimeLeft::Short,
            TimeLeft::Medium,
            TimeLeft::Long,
            TimeLeft::VeryLong,
        ] {
            assert_eq!(TimeLeft::from_rank(bucket.rank()), Some(bucket));
            assert_eq!(TimeLeft::parse(bucket.as_str()), Some(bucket));
        }
        assert_eq!(TimeLeft::from_rank(0), None);
        assert!(TimeLeft::Short < TimeLeft::VeryLong);
    }

    #[test]
    fn test_listing_entry_keeps_absent_distinct_from_zero() {
        let json = serde_json::json!({
            "auctions": [
                {"id": 1, "item": {"id": 7}, "quantity": 0, "unit_price": 0, "time_left": "LONG"},
                {"id": 2, "item": {"id": 7, "bonus_lists": [6654]}, "buyout": 1200, "time_left": "SHORT"}
            ]
        });

        let listing: AuctionListing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.auctions.len(), 2);

        let first = &listing.auctions[0];
        assert_eq!(first.quantity, Some(0));
        assert_eq!(first.unit_price, Some(0));
        assert_eq!(first.buyout, None);

        let second = &listing.auctions[1];
        assert_eq!(second.item.id, 7);
        assert_eq!(second.quantity, None);
        assert_eq!(second.unit_price, None);
        assert_eq!(second.buyout, Some(1200));
    }

    #[test]
    fn test_listing_without_auctions_key_is_empty() {
        let listing: AuctionListing =
            serde_json::from_value(serde_json::json!({"_links": {}})).unwrap();
        assert!(listing.auctions.is_empty());
    }

    #[test]
    fn test_item_from_detail() {
        let detail: ItemDetail = serde_json::from_value(serde_json::json!({
            "id": 19019,
            "name": "Thunderfury, Blessed Blade of the Windseeker",
            "quality": {"type": "LEGENDARY", "name": "Legendary"},
            "item_class": {"id": 2, "name": "Weapon"},
            "item_subclass": {"id": 7, "name": "Sword"}
        }))
        .unwrap();

        let item = Item::from_detail(19019, detail);
        assert_eq!(item.name, "Thunderfury, Blessed Blade of the Windseeker");
        assert_eq!(item.item_class, "Weapon");
        assert_eq!(item.item_subclass, "Sword");
        assert_eq!(item.quality, "Legendary");
    }
}
