pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod view;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use config::{board_config::BoardConfig, cli::LocalStorage};
pub use core::{
    board::{BoardController, BoardState},
    events::BoardEvent,
    ingest::CsvOptions,
    session::BoardSession,
};
pub use utils::error::{BoardError, Result};
