// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal match loop

use std::io::{BufRead, Write};

use anyhow::Result;
use gomoku_core::{drive, Color, Coord, DecisionService, LegalityService, MatchController, Phase};
use tracing::debug;

use crate::render::render_board;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Place(Coord),
    Undo,
    NewGame,
    Retry,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let first = words.next()?;
        let command = match first {
            "u" | "undo" => Command::Undo,
            "n" | "new" => Command::NewGame,
            "r" | "retry" => Command::Retry,
            "q" | "quit" => Command::Quit,
            row => {
                let row = row.parse().ok()?;
                let col = words.next()?.parse().ok()?;
                Command::Place(Coord::new(row, col))
            }
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

/// Match settings for one terminal session
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    pub size: u8,
    pub human: Color,
}

/// Run a match reading commands from `input` until `q` or end of input.
/// New games reuse the same size and color.
pub fn run<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    controller: &mut MatchController,
    options: PlayOptions,
    decision: &mut dyn DecisionService,
    legality: &mut dyn LegalityService,
) -> Result<()> {
    let call = controller.start(options.size, options.human)?;
    drive(controller, call, decision, legality);

    loop {
        writeln!(output, "{}", render_board(&controller.view()))?;
        writeln!(output, "{}", controller.status())?;
        match controller.phase() {
            Phase::OpponentTurn => write!(output, "r to retry, n for a new game, q to quit > ")?,
            Phase::GameOver => write!(output, "n for a new game, q to quit > ")?,
            _ => write!(output, "row col, u to undo, n for a new game, q to quit > ")?,
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let Some(command) = Command::parse(&line) else {
            writeln!(output, "Unrecognized input: {}", line.trim())?;
            continue;
        };

        match command {
            Command::Place(coord) => match controller.play(coord) {
                Ok(call) => drive(controller, Some(call), decision, legality),
                Err(e) => {
                    debug!(error = %e, "Placement rejected");
                    writeln!(output, "{e}")?;
                }
            },
            Command::Undo => {
                if let Err(e) = controller.undo() {
                    writeln!(output, "{e}")?;
                }
            }
            Command::Retry => {
                let call = controller.retry_opponent();
                drive(controller, call, decision, legality);
            }
            Command::NewGame => {
                controller.new_game();
                let call = controller.start(options.size, options.human)?;
                drive(controller, call, decision, legality);
            }
            Command::Quit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("4 5\n"), Some(Command::Place(Coord::new(4, 5))));
        assert_eq!(Command::parse(" u "), Some(Command::Undo));
        assert_eq!(Command::parse("n"), Some(Command::NewGame));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("4"), None);
        assert_eq!(Command::parse("4 5 6"), None);
        assert_eq!(Command::parse("a b"), None);
        assert_eq!(Command::parse(""), None);
    }
}
