// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gomoku Core - Board Model, Match Controller and Service Contracts
//!
//! This crate provides the client-side session layer for Gomoku:
//! - Board representation, move records and the undo-capable history
//! - Typed request/response contracts for the decision and legality services
//! - The match controller state machine that sequences turns around them
//! - Reference in-process services and a line-delimited JSON transport

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod rules;
pub mod service;
pub mod session;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

pub use board::{Board, BoardSnapshot, BoardView, MoveHistory};
pub use config::{ConfigError, SessionConfig};
pub use service::{DecisionService, LegalityService, ServiceError};
pub use session::{
    drive, CallKind, CallOutcome, MatchController, MatchSession, Phase, ServiceCall, Status, Ticket,
};

/// Largest board the model will allocate, independent of configuration
pub const MAX_BOARD_SIZE: u8 = 25;

/// Stone color. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Color {
    /// Black player (moves first)
    Black = 1,
    /// White player
    White = 2,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Wire value (1 = Black, 2 = White)
    pub fn to_wire(self) -> u8 {
        self as u8
    }

    /// Parse a wire value
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            1 => Some(Color::Black),
            2 => Some(Color::White),
            _ => None,
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "Black",
            Color::White => "White",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Occupancy of a single intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Cell {
    /// No stone
    #[default]
    Empty = 0,
    /// Black stone
    Black = 1,
    /// White stone
    White = 2,
}

impl Cell {
    /// Cell holding a stone of the given color
    pub fn stone(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }

    /// Color of the stone in this cell, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Wire value (0 = empty, 1 = Black, 2 = White)
    pub fn to_wire(self) -> u8 {
        self as u8
    }

    /// Parse a wire value
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Black),
            2 => Some(Cell::White),
            _ => None,
        }
    }
}

/// Board coordinate of an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row, counted from the top edge
    pub row: u8,
    /// Column, counted from the left edge
    pub col: u8,
}

impl Coord {
    /// Create a new coordinate
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if coordinate is valid for a board of given size
    pub fn is_valid(&self, board_size: u8) -> bool {
        self.row < board_size && self.col < board_size
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A committed placement. Only produced when the target cell was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Where the stone was placed
    pub coord: Coord,
    /// Who placed it
    pub player: Color,
    /// Position in the move history (0-based)
    pub seq: usize,
}

/// Errors that can occur during game play
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Board side outside the accepted range
    #[error("Invalid board size {size} (expected {min}..={max})")]
    InvalidBoardSize { size: u8, min: u8, max: u8 },

    /// The coordinate is outside the board
    #[error("Coordinate {0} is outside the board")]
    OutOfRange(Coord),

    /// The position is already occupied
    #[error("Position {0} already occupied")]
    CellOccupied(Coord),

    /// Tried to clear a position that holds no stone
    #[error("Position {0} is empty")]
    CellEmpty(Coord),

    /// Move recorded out of turn order
    #[error("Expected {expected} to move, got {got}")]
    OutOfTurn { expected: Color, got: Color },

    /// Input arrived while it is not the human's turn
    #[error("Not the human player's turn")]
    NotHumanTurn,

    /// The session already has a winner
    #[error("Game is already over")]
    SessionOver,

    /// A service call is outstanding
    #[error("Waiting for a service response")]
    AwaitingService,

    /// No session has been started yet
    #[error("No game in progress")]
    NoSession,

    /// Undo precondition does not hold
    #[error("Nothing to undo")]
    UndoUnavailable,
}
