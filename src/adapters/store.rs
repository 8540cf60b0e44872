//! SQLite-backed auction history.
//!
//! An [`AuctionStore`] is one unit of work: `open` begins a transaction and creates any
//! missing tables, [`AuctionStore::commit`] makes everything durable. A store dropped
//! without a commit rolls back, so an error propagated out of a run leaves the file as
//! it was. The connection closes when the store is dropped.

use crate::domain::model::{Auction, Item, TimeLeft};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

const ITEMS_TABLE_SQL: &str = r#"
CREATE TABLE items (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    item_class TEXT,
    item_subclass TEXT,
    quality TEXT
);
"#;

const AUCTIONS_TABLE_SQL: &str = r#"
CREATE TABLE auctions (
    id INTEGER NOT NULL,
    pull_id INTEGER NOT NULL,
    item_id INTEGER NOT NULL,
    quantity INTEGER,
    unit_price INTEGER,
    buyout INTEGER,
    time_left INTEGER,
    PRIMARY KEY (id, pull_id)
);
"#;

const PULLS_TABLE_SQL: &str = r#"
CREATE TABLE pulls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    datetime_utc TEXT NOT NULL
);
"#;

/// No declared foreign keys; `insert_auctions` writes items before auctions.
const TABLES: [(&str, &str); 3] = [
    ("items", ITEMS_TABLE_SQL),
    ("auctions", AUCTIONS_TABLE_SQL),
    ("pulls", PULLS_TABLE_SQL),
];

/// Pull timestamps are stored at whole-second precision without an offset suffix.
pub fn format_pull_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub items: usize,
    pub auctions: usize,
    pub pulls: usize,
}

/// Result of writing one batch: the pull it landed in and how many auction rows were new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedBatch {
    pub pull_id: i64,
    pub inserted: usize,
}

pub struct AuctionStore {
    conn: Connection,
    committed: bool,
}

impl AuctionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened auction store at {}", path.display());
        Self::begin(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::begin(Connection::open_in_memory()?)
    }

    fn begin(conn: Connection) -> Result<Self> {
        conn.execute_batch("BEGIN")?;
        let store = Self {
            conn,
            committed: false,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Commits the unit of work and closes the connection.
    pub fn commit(mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.committed = true;
        debug!("Auction store committed");
        Ok(())
    }

    pub fn tables(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(names)
    }

    /// Creates whichever of the three tables is missing. Existing tables are matched by
    /// name only and never altered.
    pub fn ensure_schema(&self) -> Result<()> {
        let existing = self.tables()?;
        for (name, ddl) in TABLES {
            if !existing.contains(name) {
                self.conn.execute_batch(ddl)?;
                info!("Created table {}", name);
            }
        }
        Ok(())
    }

    pub fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        let item = self
            .conn
            .prepare_cached(
                "SELECT id, name, item_class, item_subclass, quality FROM items WHERE id = ?1",
            )?
            .query_row(params![item_id], |row| {
                Ok(Item {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    item_class: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    item_subclass: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    quality: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                })
            })
            .optional()?;
        Ok(item)
    }

    /// Returns the number of rows written: 0 when the item id is already stored.
    pub fn insert_item(&self, item: &Item) -> Result<usize> {
        if self.get_item(item.id)?.is_some() {
            return Ok(0);
        }
        let written = self
            .conn
            .prepare_cached(
                "INSERT INTO items (id, name, item_class, item_subclass, quality)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?
            .execute(params![
                item.id,
                &item.name,
                &item.item_class,
                &item.item_subclass,
                &item.quality,
            ])?;
        Ok(written)
    }

    pub fn insert_items<'a, I>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut inserted = 0usize;
        for item in items {
            inserted += self.insert_item(item)?;
        }
        if inserted > 0 {
            debug!("Inserted {} new items", inserted);
        }
        Ok(inserted)
    }

    pub fn get_pull_id(&self, pulled_at: &DateTime<Utc>) -> Result<Option<i64>> {
        let id = self
            .conn
            .prepare_cached("SELECT id FROM pulls WHERE datetime_utc = ?1 ORDER BY id LIMIT 1")?
            .query_row(params![format_pull_datetime(pulled_at)], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    /// Returns the id of the pull for this second, creating the row only if none exists.
    pub fn insert_pull(&self, pulled_at: &DateTime<Utc>) -> Result<i64> {
        if let Some(id) = self.get_pull_id(pulled_at)? {
            debug!("Reusing pull {} for {}", id, format_pull_datetime(pulled_at));
            return Ok(id);
        }
        self.conn
            .prepare_cached("INSERT INTO pulls (datetime_utc) VALUES (?1)")?
            .execute(params![format_pull_datetime(pulled_at)])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_auction(&self, auction_id: i64, pull_id: i64) -> Result<Option<Auction>> {
        let row = self
            .conn
            .prepare_cached(
                "SELECT item_id, quantity, unit_price, buyout, time_left
                 FROM auctions WHERE id = ?1 AND pull_id = ?2",
            )?
            .query_row(params![auction_id, pull_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<u8>>(4)?,
                ))
            })
            .optional()?;

        let Some((item_id, quantity, unit_price, buyout, rank)) = row else {
            return Ok(None);
        };

        let item = self
            .get_item(item_id)?
            .ok_or_else(|| EtlError::DataIntegrityError {
                message: format!(
                    "auction {} in pull {} references missing item {}",
                    auction_id, pull_id, item_id
                ),
            })?;

        // Only the rank is stored, so an unrecognised bucket reads back as empty.
        let time_left = rank
            .and_then(TimeLeft::from_rank)
            .map(|bucket| bucket.as_str().to_string())
            .unwrap_or_default();

        Ok(Some(Auction {
            id: auction_id,
            item,
            quantity,
            unit_price,
            buyout,
            time_left,
        }))
    }

    fn auction_exists(&self, auction_id: i64, pull_id: i64) -> Result<bool> {
        let found = self
            .conn
            .prepare_cached("SELECT 1 FROM auctions WHERE id = ?1 AND pull_id = ?2")?
            .query_row(params![auction_id, pull_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    pub fn insert_auction(&self, auction: &Auction, pulled_at: &DateTime<Utc>) -> Result<bool> {
        let batch = self.insert_auctions(std::slice::from_ref(auction), pulled_at)?;
        Ok(batch.inserted == 1)
    }

    /// Writes a batch under the pull for `pulled_at`. Items go in first; auctions already
    /// stored for that pull are skipped.
    pub fn insert_auctions(
        &self,
        auctions: &[Auction],
        pulled_at: &DateTime<Utc>,
    ) -> Result<InsertedBatch> {
        let pull_id = self.insert_pull(pulled_at)?;
        self.insert_items(auctions.iter().map(|auction| &auction.item))?;

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO auctions (id, pull_id, item_id, quantity, unit_price, buyout, time_left)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        for auction in auctions {
            if self.auction_exists(auction.id, pull_id)? {
                skipped += 1;
                continue;
            }
            stmt.execute(params![
                auction.id,
                pull_id,
                auction.item.id,
                auction.quantity,
                auction.unit_price,
                auction.buyout,
                auction.time_left_rank(),
            ])?;
            inserted += 1;
        }

        if skipped > 0 {
            debug!("Skipped {} auctions already stored for pull {}", skipped, pull_id);
        }
        debug!("Inserted {} auctions for pull {}", inserted, pull_id);
        Ok(InsertedBatch { pull_id, inserted })
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?;
            Ok(n as usize)
        };
        Ok(StoreStats {
            items: count("items")?,
            auctions: count("auctions")?,
            pulls: count("pulls")?,
        })
    }
}

impl Drop for AuctionStore {
    fn drop(&mut self) {
        if self.committed || self.conn.is_autocommit() {
            return;
        }
        match self.conn.execute_batch("ROLLBACK") {
            Ok(()) => warn!("Auction store released without commit, changes rolled back"),
            Err(e) => warn!("Rollback of auction store failed: {}", e),
        }
    }
}
