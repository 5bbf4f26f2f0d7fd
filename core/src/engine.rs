// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference decision service: shallow alpha-beta over nearby candidates

use tracing::debug;

use crate::board::Board;
use crate::protocol::{DecisionRequest, DecisionResponse};
use crate::rules::{winner_at, DIRECTIONS};
use crate::service::{DecisionService, ServiceError};
use crate::{Cell, Color, Coord};

const INF: i32 = 1_000_000;
const WIN: i32 = 100_000;

/// Depth cap regardless of what the caller asks for
pub const MAX_DEPTH: u32 = 6;

/// Alpha-beta searcher used when no external engine is configured
#[derive(Debug, Clone)]
pub struct SearchEngine {
    /// Candidates kept per node after ordering
    max_candidates: usize,
    /// Candidate cells must lie within this distance of an existing stone
    neighborhood: i32,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            max_candidates: 15,
            neighborhood: 2,
        }
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a move for `player`, or `None` if the board is full
    pub fn find_move(&self, board: &Board, player: Color, depth: u32) -> Option<Coord> {
        if board.stone_count() == 0 {
            let mid = board.size() / 2;
            return Some(Coord::new(mid, mid));
        }

        let mut board = board.clone();
        let candidates = self.candidates(&board, player);
        if candidates.is_empty() {
            return first_empty(&board);
        }

        // Take a win, otherwise block the opponent's.
        for color in [player, player.opposite()] {
            for &coord in &candidates {
                if completes_five(&mut board, coord, color) {
                    return Some(coord);
                }
            }
        }

        let depth = depth.clamp(1, MAX_DEPTH);
        let mut best = candidates[0];
        let mut order = candidates;

        for d in 1..=depth {
            let (found, score, scored) = self.search_root(&mut board, &order, player, d);
            best = found;
            debug!(%best, score, depth = d, "iteration finished");
            if score >= WIN {
                break;
            }
            // Search the next iteration's best lines first
            order = scored;
        }

        Some(best)
    }

    /// One fixed-depth pass over the root moves. Returns the best move, its
    /// score and the moves reordered by score.
    fn search_root(
        &self,
        board: &mut Board,
        moves: &[Coord],
        player: Color,
        depth: u32,
    ) -> (Coord, i32, Vec<Coord>) {
        let mut alpha = -INF;
        let beta = INF;
        let mut best = moves[0];
        let mut scored = Vec::with_capacity(moves.len());

        for &coord in moves {
            if board.place(coord, player).is_err() {
                continue;
            }
            let score = -self.negamax(board, player.opposite(), depth - 1, -beta, -alpha);
            let _ = board.clear(coord);
            scored.push((coord, score));

            if score > alpha {
                alpha = score;
                best = coord;
            }
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        (best, alpha, scored.into_iter().map(|(coord, _)| coord).collect())
    }

    fn negamax(&self, board: &mut Board, to_move: Color, depth: u32, mut alpha: i32, beta: i32) -> i32 {
        if depth == 0 {
            return evaluate(board, to_move);
        }

        let moves = self.candidates(board, to_move);
        if moves.is_empty() {
            return 0;
        }

        let mut best = -INF;
        for coord in moves {
            if board.place(coord, to_move).is_err() {
                continue;
            }
            let score = if winner_at(board, coord).is_some() {
                // Prefer faster wins
                WIN + depth as i32
            } else {
                -self.negamax(board, to_move.opposite(), depth - 1, -beta, -alpha)
            };
            let _ = board.clear(coord);

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// Empty cells near existing stones, best first
    fn candidates(&self, board: &Board, to_move: Color) -> Vec<Coord> {
        let size = board.size();
        let mut scored = Vec::new();

        for row in 0..size {
            for col in 0..size {
                let coord = Coord::new(row, col);
                if board.get(coord) != Some(Cell::Empty) || !self.has_neighbor(board, coord) {
                    continue;
                }
                let attack = placement_score(board, coord, to_move);
                let defense = placement_score(board, coord, to_move.opposite());
                scored.push((coord, attack + defense + defense / 10));
            }
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.max_candidates);
        scored.into_iter().map(|(coord, _)| coord).collect()
    }

    fn has_neighbor(&self, board: &Board, coord: Coord) -> bool {
        let n = self.neighborhood;
        for dr in -n..=n {
            for dc in -n..=n {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = coord.row as i32 + dr;
                let c = coord.col as i32 + dc;
                if matches!(cell_at(board, r, c), Some(cell) if !cell.is_empty()) {
                    return true;
                }
            }
        }
        false
    }
}

impl DecisionService for SearchEngine {
    fn decide(&mut self, request: &DecisionRequest) -> Result<DecisionResponse, ServiceError> {
        let (board, player) = request.decode()?;
        self.find_move(&board, player, request.depth)
            .map(DecisionResponse::new)
            .ok_or_else(|| ServiceError::Remote("No valid move found".to_string()))
    }
}

fn cell_at(board: &Board, r: i32, c: i32) -> Option<Cell> {
    if r < 0 || c < 0 || r > u8::MAX as i32 || c > u8::MAX as i32 {
        return None;
    }
    board.get(Coord::new(r as u8, c as u8))
}

fn first_empty(board: &Board) -> Option<Coord> {
    let size = board.size();
    (0..size)
        .flat_map(|row| (0..size).map(move |col| Coord::new(row, col)))
        .find(|&coord| board.get(coord) == Some(Cell::Empty))
}

fn completes_five(board: &mut Board, coord: Coord, color: Color) -> bool {
    if board.place(coord, color).is_err() {
        return false;
    }
    let wins = winner_at(board, coord).is_some();
    let _ = board.clear(coord);
    wins
}

/// Run length through `coord` along one axis and how many ends are open.
/// `coord` itself counts as a stone of `color`.
fn line_shape(board: &Board, coord: Coord, dr: i32, dc: i32, color: Color) -> (usize, usize) {
    let target = Cell::stone(color);
    let mut count = 1;
    let mut open = 0;

    for sign in [1, -1] {
        let (mut r, mut c) = (coord.row as i32 + dr * sign, coord.col as i32 + dc * sign);
        loop {
            match cell_at(board, r, c) {
                Some(cell) if cell == target => count += 1,
                Some(Cell::Empty) => {
                    open += 1;
                    break;
                }
                _ => break,
            }
            r += dr * sign;
            c += dc * sign;
        }
    }

    (count, open)
}

fn shape_value(count: usize, open: usize) -> i32 {
    match (count, open) {
        (5.., _) => WIN,
        (4, 2) => 12_000,
        (4, 1) => 4_000,
        (3, 2) => 4_000,
        (3, 1) => 400,
        (2, 2) => 300,
        (2, 1) => 40,
        _ => 5,
    }
}

/// Value of dropping a `color` stone on an empty `coord`
fn placement_score(board: &Board, coord: Coord, color: Color) -> i32 {
    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| {
            let (count, open) = line_shape(board, coord, dr, dc, color);
            shape_value(count, open)
        })
        .sum()
}

/// Static evaluation from `to_move`'s point of view
fn evaluate(board: &Board, to_move: Color) -> i32 {
    let mine = color_score(board, to_move);
    let theirs = color_score(board, to_move.opposite());
    mine - theirs - theirs / 10
}

fn color_score(board: &Board, color: Color) -> i32 {
    let size = board.size();
    let mut score = 0i32;
    for row in 0..size {
        for col in 0..size {
            let coord = Coord::new(row, col);
            if board.get(coord).and_then(|c| c.color()) == Some(color) {
                score = score.saturating_add(placement_score(board, coord, color));
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_in_the_center() {
        let board = Board::new(15).unwrap();
        assert_eq!(
            SearchEngine::new().find_move(&board, Color::Black, 3),
            Some(Coord::new(7, 7))
        );
    }

    #[test]
    fn completes_own_five() {
        let mut board = Board::new(15).unwrap();
        for c in 3..7 {
            board.place(Coord::new(7, c), Color::White).unwrap();
        }
        board.place(Coord::new(7, 2), Color::Black).unwrap();
        board.place(Coord::new(0, 0), Color::Black).unwrap();
        board.place(Coord::new(0, 14), Color::Black).unwrap();

        let mv = SearchEngine::new().find_move(&board, Color::White, 2).unwrap();
        assert_eq!(mv, Coord::new(7, 7));
    }

    #[test]
    fn blocks_closed_four() {
        let mut board = Board::new(15).unwrap();
        for r in 5..9 {
            board.place(Coord::new(r, 3), Color::Black).unwrap();
        }
        board.place(Coord::new(4, 3), Color::White).unwrap();
        board.place(Coord::new(12, 12), Color::White).unwrap();

        let mv = SearchEngine::new().find_move(&board, Color::White, 2).unwrap();
        assert_eq!(mv, Coord::new(9, 3));
    }

    #[test]
    fn every_depth_picks_an_empty_cell_near_play() {
        let mut board = Board::new(15).unwrap();
        board.place(Coord::new(7, 7), Color::Black).unwrap();
        board.place(Coord::new(7, 8), Color::White).unwrap();
        board.place(Coord::new(8, 7), Color::Black).unwrap();

        let engine = SearchEngine::new();
        for depth in 1..=3 {
            let mv = engine.find_move(&board, Color::White, depth).unwrap();
            assert_eq!(board.get(mv), Some(Cell::Empty));
            assert!(engine.has_neighbor(&board, mv));
        }
    }

    #[test]
    fn full_board_has_no_move() {
        let mut board = Board::new(2).unwrap();
        board.place(Coord::new(0, 0), Color::Black).unwrap();
        board.place(Coord::new(0, 1), Color::White).unwrap();
        board.place(Coord::new(1, 0), Color::Black).unwrap();
        board.place(Coord::new(1, 1), Color::White).unwrap();

        let req = DecisionRequest::new(&board.snapshot(), Color::Black, 2);
        assert!(matches!(
            SearchEngine::new().decide(&req),
            Err(ServiceError::Remote(_))
        ));
    }

    #[test]
    fn decision_is_always_an_empty_cell() {
        let mut board = Board::new(9).unwrap();
        board.place(Coord::new(4, 4), Color::Black).unwrap();
        board.place(Coord::new(4, 5), Color::White).unwrap();
        board.place(Coord::new(3, 4), Color::Black).unwrap();

        let req = DecisionRequest::new(&board.snapshot(), Color::White, 3);
        let resp = SearchEngine::new().decide(&req).unwrap();
        assert!(resp.validate(&board.snapshot()).is_ok());
    }
}
