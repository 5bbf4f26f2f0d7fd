// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire contracts for the decision and legality services.
//!
//! Boards travel as an N×N grid of small integers (0 = empty, 1 = Black,
//! 2 = White). The same shapes are used in-process and over the
//! line-delimited JSON transport in [`crate::service`].

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardSnapshot};
use crate::service::ServiceError;
use crate::{Cell, Color, Coord, MAX_BOARD_SIZE};

/// Ask the decision service for a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Full grid
    pub board: Vec<Vec<u8>>,
    /// Color to move
    #[serde(alias = "currentPlayer")]
    pub current_player: u8,
    /// Search budget
    pub depth: u32,
}

impl DecisionRequest {
    pub fn new(snapshot: &BoardSnapshot, player: Color, depth: u32) -> Self {
        Self {
            board: snapshot.to_wire(),
            current_player: player.to_wire(),
            depth,
        }
    }

    /// Server-side decoding of the request
    pub fn decode(&self) -> Result<(Board, Color), ServiceError> {
        let board = decode_grid(&self.board)?;
        let player = Color::from_wire(self.current_player).ok_or_else(|| {
            ServiceError::Malformed(format!("invalid player {}", self.current_player))
        })?;
        Ok((board, player))
    }
}

/// Placement chosen by the decision service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub row: usize,
    pub col: usize,
}

impl DecisionResponse {
    pub fn new(coord: Coord) -> Self {
        Self {
            row: coord.row as usize,
            col: coord.col as usize,
        }
    }

    /// Check the chosen cell against the board the request was built from.
    /// The coordinate must be on the board and currently empty.
    pub fn validate(&self, snapshot: &BoardSnapshot) -> Result<Coord, ServiceError> {
        let size = snapshot.size() as usize;
        if self.row >= size || self.col >= size {
            return Err(ServiceError::Malformed(format!(
                "decision ({}, {}) outside {}x{} board",
                self.row, self.col, size, size
            )));
        }
        let coord = Coord::new(self.row as u8, self.col as u8);
        match snapshot.get(coord) {
            Some(Cell::Empty) => Ok(coord),
            _ => Err(ServiceError::Malformed(format!(
                "decision {} targets an occupied cell",
                coord
            ))),
        }
    }
}

/// Ask the legality service whether the stone just placed wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityRequest {
    pub board: Vec<Vec<u8>>,
    pub row: usize,
    pub col: usize,
}

impl LegalityRequest {
    pub fn new(snapshot: &BoardSnapshot, coord: Coord) -> Self {
        Self {
            board: snapshot.to_wire(),
            row: coord.row as usize,
            col: coord.col as usize,
        }
    }

    /// Server-side decoding of the request
    pub fn decode(&self) -> Result<(Board, Coord), ServiceError> {
        let board = decode_grid(&self.board)?;
        let size = board.size() as usize;
        if self.row >= size || self.col >= size {
            return Err(ServiceError::Remote("Invalid position".to_string()));
        }
        Ok((board, Coord::new(self.row as u8, self.col as u8)))
    }
}

/// Verdict of the legality service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityResponse {
    pub is_win: bool,
    #[serde(default)]
    pub winner: Option<u8>,
}

impl LegalityResponse {
    pub fn no_win() -> Self {
        Self {
            is_win: false,
            winner: None,
        }
    }

    pub fn win(color: Color) -> Self {
        Self {
            is_win: true,
            winner: Some(color.to_wire()),
        }
    }

    /// Interpret the verdict for the player who just moved. A reported win
    /// must name that player.
    pub fn validate(&self, mover: Color) -> Result<Option<Color>, ServiceError> {
        if !self.is_win {
            return Ok(None);
        }
        match self.winner.and_then(Color::from_wire) {
            Some(winner) if winner == mover => Ok(Some(winner)),
            Some(winner) => Err(ServiceError::Malformed(format!(
                "win reported for {} but {} just moved",
                winner, mover
            ))),
            None => Err(ServiceError::Malformed(
                "win reported without a winner".to_string(),
            )),
        }
    }
}

/// One request line of the stdio transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum ServiceRequest {
    /// `{"method":"decide","params":{...}}`
    Decide(DecisionRequest),
    /// `{"method":"check_win","params":{...}}`
    CheckWin(LegalityRequest),
}

/// One reply line of the stdio transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceReply {
    pub fn ok<T: Serialize>(value: &T) -> Result<Self, ServiceError> {
        let result = serde_json::to_value(value)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        Ok(Self {
            result: Some(result),
            error: None,
        })
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Unpack into the expected response type
    pub fn into_result<T: serde::de::DeserializeOwned>(self) -> Result<T, ServiceError> {
        if let Some(message) = self.error {
            return Err(ServiceError::Remote(message));
        }
        let value = self
            .result
            .ok_or_else(|| ServiceError::Malformed("reply has neither result nor error".into()))?;
        serde_json::from_value(value).map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}

/// Decode a wire grid into a board
pub fn decode_grid(grid: &[Vec<u8>]) -> Result<Board, ServiceError> {
    let size = grid.len();
    if size == 0 || size > MAX_BOARD_SIZE as usize {
        return Err(ServiceError::Malformed(format!("unsupported board size {size}")));
    }

    let mut cells = Vec::with_capacity(size * size);
    for (r, row) in grid.iter().enumerate() {
        if row.len() != size {
            return Err(ServiceError::Malformed(format!(
                "row {r} has {} cells, expected {size}",
                row.len()
            )));
        }
        for &value in row {
            let cell = Cell::from_wire(value)
                .ok_or_else(|| ServiceError::Malformed(format!("invalid cell value {value}")))?;
            cells.push(cell);
        }
    }

    Board::from_cells(size as u8, cells).map_err(|e| ServiceError::Malformed(e.to_string()))
}
