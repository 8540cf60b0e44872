pub mod etl;
pub mod ingest;

pub use crate::domain::model::{Auction, Item, TimeLeft};
pub use crate::domain::ports::GameDataApi;
pub use crate::utils::error::Result;
