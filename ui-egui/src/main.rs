// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main entry point for the egui UI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gomoku_core::engine::SearchEngine;
use gomoku_core::rules::FiveInRow;
use gomoku_core::service::ProcessService;
use gomoku_core::{MatchController, SessionConfig};
use gomoku_ui_egui::worker::Services;
use gomoku_ui_egui::{App, UiConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gomoku")]
#[command(about = "Play Gomoku against a move-decision service")]
struct Args {
    /// Session config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// UI config file (JSON)
    #[arg(long)]
    ui_config: Option<PathBuf>,

    /// Board size preselected in the chooser
    #[arg(long)]
    size: Option<u8>,

    /// Search depth sent with every decision request
    #[arg(long)]
    depth: Option<u32>,

    /// Service command speaking the line protocol, e.g. "gomoku-cli serve".
    /// Uses the built-in services when absent.
    #[arg(long)]
    engine: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn session_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(size) = args.size {
        config.default_board_size = size;
    }
    if let Some(depth) = args.depth {
        config.search_depth = depth;
    }
    config.validate().context("invalid session settings")?;
    Ok(config)
}

fn services(engine: Option<&str>) -> Result<Services> {
    let Some(command) = engine else {
        return Ok(Services {
            decision: Box::new(SearchEngine::new()),
            legality: Box::new(FiveInRow),
        });
    };

    let mut parts = command.split_whitespace();
    let program = parts.next().context("--engine is empty")?;
    let args: Vec<String> = parts.map(str::to_string).collect();
    let process = ProcessService::spawn(program, &args)
        .with_context(|| format!("starting engine `{command}`"))?;
    Ok(Services {
        decision: Box::new(process.clone()),
        legality: Box::new(process),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = session_config(&args)?;
    let ui_config = match &args.ui_config {
        Some(path) => UiConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => UiConfig::default(),
    };

    let controller = MatchController::new(config)?;
    let services = services(args.engine.as_deref())?;
    info!(engine = args.engine.as_deref().unwrap_or("built-in"), "Starting UI");

    let app = App::new(controller, &ui_config, services)?;

    let (width, height) = ui_config.window.initial_size;
    let (min_w, min_h) = ui_config.window.min_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(ui_config.window.title.clone())
            .with_inner_size([width, height])
            .with_min_inner_size([min_w, min_h]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        &ui_config.window.title,
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run eframe: {}", e))
}
