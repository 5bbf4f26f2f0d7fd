// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation, snapshots and the move history

use std::sync::Arc;

use crate::{Cell, Color, Coord, GameError, Move, MAX_BOARD_SIZE};

/// Square Gomoku board. The side length is fixed for the board's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Side length of the board
    size: u8,
    /// Row-major cell storage
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board with the specified size
    pub fn new(size: u8) -> Result<Self, GameError> {
        check_size(size)?;
        let cells = (size as usize) * (size as usize);
        Ok(Self {
            size,
            cells: vec![Cell::Empty; cells],
        })
    }

    /// Build a board from row-major cells
    pub fn from_cells(size: u8, cells: Vec<Cell>) -> Result<Self, GameError> {
        check_size(size)?;
        if cells.len() != (size as usize) * (size as usize) {
            return Err(GameError::InvalidBoardSize {
                size,
                min: 1,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(Self { size, cells })
    }

    /// Get the size of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get the cell at the specified coordinate, `None` when out of range
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if !coord.is_valid(self.size) {
            return None;
        }
        Some(self.cells[self.coord_to_index(coord)])
    }

    /// Place a stone. Fails without side effects if the cell is taken or
    /// the coordinate is off the board.
    pub fn place(&mut self, coord: Coord, color: Color) -> Result<(), GameError> {
        if !coord.is_valid(self.size) {
            return Err(GameError::OutOfRange(coord));
        }

        let idx = self.coord_to_index(coord);
        if !self.cells[idx].is_empty() {
            return Err(GameError::CellOccupied(coord));
        }

        self.cells[idx] = Cell::stone(color);
        Ok(())
    }

    /// Reset an occupied cell back to empty. Only undo calls this.
    pub fn clear(&mut self, coord: Coord) -> Result<(), GameError> {
        if !coord.is_valid(self.size) {
            return Err(GameError::OutOfRange(coord));
        }

        let idx = self.coord_to_index(coord);
        if self.cells[idx].is_empty() {
            return Err(GameError::CellEmpty(coord));
        }

        self.cells[idx] = Cell::Empty;
        Ok(())
    }

    /// Read-only copy of the committed grid
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            size: self.size,
            cells: Arc::from(self.cells.as_slice()),
        }
    }

    /// Number of occupied cells
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Convert a coordinate to a vector index
    fn coord_to_index(&self, coord: Coord) -> usize {
        (coord.row as usize) * (self.size as usize) + (coord.col as usize)
    }
}

fn check_size(size: u8) -> Result<(), GameError> {
    if size == 0 || size > MAX_BOARD_SIZE {
        return Err(GameError::InvalidBoardSize {
            size,
            min: 1,
            max: MAX_BOARD_SIZE,
        });
    }
    Ok(())
}

/// Immutable view of a board at one point in time. Cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    size: u8,
    cells: Arc<[Cell]>,
}

impl BoardSnapshot {
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get the cell at the specified coordinate, `None` when out of range
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if !coord.is_valid(self.size) {
            return None;
        }
        let idx = (coord.row as usize) * (self.size as usize) + (coord.col as usize);
        Some(self.cells[idx])
    }

    /// Iterate over occupied cells in row-major order
    pub fn stones(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        let size = self.size as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.color().map(|color| {
                let coord = Coord::new((idx / size) as u8, (idx % size) as u8);
                (coord, color)
            })
        })
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Grid of small integers (0 = empty, 1 = Black, 2 = White)
    pub fn to_wire(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size as usize)
            .map(|row| row.iter().map(|c| c.to_wire()).collect())
            .collect()
    }
}

/// Projection of a session handed to renderers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardView {
    /// Committed grid
    pub snapshot: BoardSnapshot,
    /// Most recent placement, if any
    pub last_move: Option<Move>,
    /// Bumped on every committed change; renderers compare it to decide
    /// whether their cached drawing is stale
    pub revision: u64,
}

impl BoardView {
    pub fn size(&self) -> u8 {
        self.snapshot.size()
    }
}

/// Ordered record of placements with tail-only removal
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement. The first move must be Black's and colors must
    /// alternate afterwards.
    pub fn push(&mut self, coord: Coord, player: Color) -> Result<Move, GameError> {
        let expected = self
            .moves
            .last()
            .map(|m| m.player.opposite())
            .unwrap_or(Color::Black);
        if player != expected {
            return Err(GameError::OutOfTurn {
                expected,
                got: player,
            });
        }

        let mv = Move {
            coord,
            player,
            seq: self.moves.len(),
        };
        self.moves.push(mv);
        Ok(mv)
    }

    /// Remove and return the most recent move
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(9).unwrap();
        assert_eq!(board.size(), 9);
        assert_eq!(board.stone_count(), 0);
        assert_eq!(board.get(Coord::new(8, 8)), Some(Cell::Empty));
        assert_eq!(board.get(Coord::new(9, 0)), None);
    }

    #[test]
    fn rejects_zero_and_oversized_boards() {
        assert!(Board::new(0).is_err());
        assert!(Board::new(MAX_BOARD_SIZE + 1).is_err());
        assert!(Board::new(MAX_BOARD_SIZE).is_ok());
    }

    #[test]
    fn place_and_clear() {
        let mut board = Board::new(9).unwrap();
        let c = Coord::new(4, 4);
        board.place(c, Color::Black).unwrap();
        assert_eq!(board.get(c), Some(Cell::Black));
        assert_eq!(board.place(c, Color::White), Err(GameError::CellOccupied(c)));
        assert_eq!(board.get(c), Some(Cell::Black));

        board.clear(c).unwrap();
        assert_eq!(board.get(c), Some(Cell::Empty));
        assert_eq!(board.clear(c), Err(GameError::CellEmpty(c)));
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut board = Board::new(9).unwrap();
        board.place(Coord::new(0, 0), Color::Black).unwrap();
        let snap = board.snapshot();
        board.place(Coord::new(0, 1), Color::White).unwrap();

        assert_eq!(snap.stone_count(), 1);
        assert_eq!(snap.get(Coord::new(0, 1)), Some(Cell::Empty));
        assert_eq!(board.stone_count(), 2);
    }

    #[test]
    fn wire_grid_layout() {
        let mut board = Board::new(5).unwrap();
        board.place(Coord::new(1, 3), Color::White).unwrap();
        let wire = board.snapshot().to_wire();
        assert_eq!(wire.len(), 5);
        assert!(wire.iter().all(|row| row.len() == 5));
        assert_eq!(wire[1][3], 2);
        assert_eq!(wire.iter().flatten().filter(|v| **v != 0).count(), 1);
    }

    #[test]
    fn history_enforces_alternation() {
        let mut history = MoveHistory::new();
        assert!(history.push(Coord::new(0, 0), Color::White).is_err());

        let first = history.push(Coord::new(0, 0), Color::Black).unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(
            history.push(Coord::new(0, 1), Color::Black),
            Err(GameError::OutOfTurn {
                expected: Color::White,
                got: Color::Black
            })
        );
        let second = history.push(Coord::new(0, 1), Color::White).unwrap();
        assert_eq!(second.seq, 1);

        assert_eq!(history.pop(), Some(second));
        assert_eq!(history.len(), 1);
    }
}
