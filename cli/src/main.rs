// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gomoku CLI
//!
//! `serve` answers the decision/legality line protocol on stdin/stdout with
//! the built-in services, so it can be used as `--engine` for the desktop
//! client. `play` runs a match in the terminal.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gomoku_cli::{run, PlayOptions};
use gomoku_core::engine::SearchEngine;
use gomoku_core::rules::FiveInRow;
use gomoku_core::service::{serve_lines, ProcessService};
use gomoku_core::{Color, DecisionService, LegalityService, MatchController, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "gomoku-cli", about = "Gomoku service endpoint and terminal client")]
struct Args {
    /// Log filter used when RUST_LOG is not set
    #[clap(long, global = true, default_value = "info")]
    log_level: String,

    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Serve the line protocol on stdin/stdout
    Serve,
    /// Play a match in the terminal
    Play {
        /// Session config file (JSON)
        #[clap(long)]
        config: Option<PathBuf>,

        /// Board size
        #[clap(long)]
        size: Option<u8>,

        /// Your color
        #[clap(long, value_enum, default_value_t = Side::Black)]
        color: Side,

        /// Search depth sent with every decision request
        #[clap(long)]
        depth: Option<u32>,

        /// Service command speaking the line protocol
        #[clap(long)]
        engine: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::White => Color::White,
        }
    }
}

/// Logs go to stderr: stdout carries the protocol or the board.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Cmd::Serve => {
            info!("Serving on stdin/stdout");
            let stdin = io::stdin();
            let stdout = io::stdout();
            let handled = serve_lines(
                stdin.lock(),
                stdout.lock(),
                &mut SearchEngine::new(),
                &mut FiveInRow,
            )
            .context("serving line protocol")?;
            info!(handled, "Input closed");
            Ok(())
        }
        Cmd::Play {
            config,
            size,
            color,
            depth,
            engine,
        } => {
            let mut config = match config {
                Some(path) => SessionConfig::load_from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SessionConfig::default(),
            };
            if let Some(depth) = depth {
                config.search_depth = depth;
            }
            config.validate().context("invalid session settings")?;

            let options = PlayOptions {
                size: size.unwrap_or(config.default_board_size),
                human: color.into(),
            };
            let mut controller = MatchController::new(config)?;

            let mut decision: Box<dyn DecisionService>;
            let mut legality: Box<dyn LegalityService>;
            match engine {
                Some(command) => {
                    let mut parts = command.split_whitespace();
                    let program = parts.next().context("--engine is empty")?;
                    let rest: Vec<String> = parts.map(str::to_string).collect();
                    let process = ProcessService::spawn(program, &rest)
                        .with_context(|| format!("starting engine `{command}`"))?;
                    decision = Box::new(process.clone());
                    legality = Box::new(process);
                }
                None => {
                    decision = Box::new(SearchEngine::new());
                    legality = Box::new(FiveInRow);
                }
            }

            let stdin = io::stdin();
            run(
                stdin.lock(),
                io::stdout(),
                &mut controller,
                options,
                decision.as_mut(),
                legality.as_mut(),
            )
        }
    }
}
