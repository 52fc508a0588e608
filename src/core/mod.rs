pub mod board;
pub mod events;
pub mod ingest;
pub mod keyboard;
pub mod session;

pub use crate::domain::model::{BoardSnapshot, ContainerId, CsvRow, DropTarget, ItemId, SeedVariant};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
