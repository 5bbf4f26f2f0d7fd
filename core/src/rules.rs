// SPDX-License-Identifier: MIT OR Apache-2.0

//! Win detection: five or more in a row through the last placement

use tracing::trace;

use crate::board::Board;
use crate::protocol::{LegalityRequest, LegalityResponse};
use crate::service::{LegalityService, ServiceError};
use crate::{Cell, Color, Coord};

/// Stones in a row needed to win
pub const WIN_LENGTH: usize = 5;

/// The four line axes: horizontal, vertical and both diagonals
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Count consecutive stones of `color` starting next to `coord` and
/// walking in direction `(dr, dc)`. The starting cell itself is not counted.
pub fn count_direction(board: &Board, coord: Coord, dr: i32, dc: i32, color: Color) -> usize {
    let size = board.size() as i32;
    let target = Cell::stone(color);
    let (mut r, mut c) = (coord.row as i32 + dr, coord.col as i32 + dc);
    let mut count = 0;

    while r >= 0 && r < size && c >= 0 && c < size {
        if board.get(Coord::new(r as u8, c as u8)) != Some(target) {
            break;
        }
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

/// Length of the longest line through `coord` for the stone sitting there
pub fn longest_line(board: &Board, coord: Coord) -> usize {
    let Some(color) = board.get(coord).and_then(|cell| cell.color()) else {
        return 0;
    };

    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| {
            1 + count_direction(board, coord, dr, dc, color)
                + count_direction(board, coord, -dr, -dc, color)
        })
        .max()
        .unwrap_or(0)
}

/// Winner if the stone at `coord` completes a line of five or more
pub fn winner_at(board: &Board, coord: Coord) -> Option<Color> {
    let color = board.get(coord)?.color()?;
    if longest_line(board, coord) >= WIN_LENGTH {
        Some(color)
    } else {
        None
    }
}

/// Reference legality service
#[derive(Debug, Default, Clone, Copy)]
pub struct FiveInRow;

impl LegalityService for FiveInRow {
    fn check_win(&mut self, request: &LegalityRequest) -> Result<LegalityResponse, ServiceError> {
        let (board, coord) = request.decode()?;
        let verdict = match winner_at(&board, coord) {
            Some(color) => LegalityResponse::win(color),
            None => LegalityResponse::no_win(),
        };
        trace!(%coord, is_win = verdict.is_win, "check_win");
        Ok(verdict)
    }
}
