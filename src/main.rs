use anyhow::Context;
use clap::Parser;
use planning_board::core::events::parse_script;
use planning_board::core::{ConfigProvider, Storage};
use planning_board::utils::error::{BoardError, ErrorSeverity};
use planning_board::utils::{logger, validation::Validate};
use planning_board::view::{self, BoardLabels};
use planning_board::{
    BoardController, BoardSession, CliConfig, CsvOptions, LocalStorage, OutputFormat,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting planning-board");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(rendered) => {
            print!("{}", rendered);
            Ok(())
        }
        Err(e) => exit_with(e),
    }
}

async fn run(cli: &CliConfig) -> Result<String, BoardError> {
    cli.validate()?;
    let config = cli.load_board_config()?;

    let options = CsvOptions::from_config(&config)?;
    let labels = BoardLabels::from_config(&config);
    let storage = LocalStorage::new(".");
    let board = BoardController::seeded(config.seed());
    let mut session = BoardSession::new(board, storage.clone(), options);

    if let Some(path) = &cli.csv {
        session.import_csv(path).await?;
    }

    if let Some(path) = &cli.events {
        let script = storage.read_file(path).await?;
        let events = parse_script(&String::from_utf8_lossy(&script))?;
        tracing::info!("▶️ Replaying {} events from {}", events.len(), path);
        let changes = session.run_script(&events).await?;
        tracing::info!("Board changed by {} of {} events", changes, events.len());
    }

    let board = session.into_board();
    let rendered = match cli.format {
        OutputFormat::Text => view::render_board(&board, &labels),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&view::snapshot(&board, &labels))?;
            json.push('\n');
            json
        }
    };

    if let Some(path) = &cli.output {
        storage.write_file(path, rendered.as_bytes()).await?;
        tracing::info!("📁 Board written to {}", path);
    }

    Ok(rendered)
}

fn exit_with(e: BoardError) -> anyhow::Result<()> {
    tracing::error!(
        "❌ planning-board failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Err(e).context("planning-board finished with warnings")
}
