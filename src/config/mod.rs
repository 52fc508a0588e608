pub mod board_config;
pub mod cli;

#[cfg(feature = "cli")]
use crate::domain::model::SeedVariant;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use board_config::BoardConfig;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "planning-board")]
#[command(about = "Production planning board: distribute orders across machines")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// CSV file whose rows replace the order pool (first row is a header)
    #[arg(long)]
    pub csv: Option<String>,

    /// JSON event script to replay against the board
    #[arg(long)]
    pub events: Option<String>,

    /// Initial board contents (overrides the config file)
    #[arg(long)]
    pub seed: Option<SeedVariant>,

    /// Text encoding of the CSV file (overrides the config file)
    #[arg(long)]
    pub encoding: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the rendered board to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut BoardConfig) {
        if let Some(seed) = self.seed {
            tracing::debug!("Seed overridden to {:?}", seed);
            config.board.seed = Some(seed);
        }
        if let Some(encoding) = &self.encoding {
            tracing::debug!("Encoding overridden to {}", encoding);
            config.import.encoding = Some(encoding.clone());
        }
    }

    pub fn load_board_config(&self) -> Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::from_file(path)?,
            None => BoardConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
            validation::validate_file_extension("config", path, &["toml"])?;
        }
        if let Some(path) = &self.csv {
            validation::validate_path("csv", path)?;
            validation::validate_file_extension("csv", path, &["csv", "txt", "tsv"])?;
        }
        if let Some(path) = &self.events {
            validation::validate_path("events", path)?;
            validation::validate_file_extension("events", path, &["json"])?;
        }
        if let Some(path) = &self.output {
            validation::validate_path("output", path)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_parse_cli_args() {
        let cli = CliConfig::try_parse_from([
            "planning-board",
            "--csv",
            "orders.csv",
            "--seed",
            "example",
            "--encoding",
            "UTF-8",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.csv.as_deref(), Some("orders.csv"));
        assert_eq!(cli.seed, Some(SeedVariant::Example));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.validate().is_ok());

        let config = cli.load_board_config().unwrap();
        assert_eq!(config.seed(), SeedVariant::Example);
        assert_eq!(config.encoding_label(), "UTF-8");
    }

    #[test]
    fn test_cli_validation_rejects_wrong_extensions() {
        let cli = CliConfig::try_parse_from(["planning-board", "--events", "script.yaml"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = CliConfig::try_parse_from(["planning-board", "--csv", "orders.xlsx"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_unknown_encoding_override_fails_load() {
        let cli = CliConfig::try_parse_from(["planning-board", "--encoding", "klingon"]).unwrap();
        assert!(cli.load_board_config().is_err());
    }
}
