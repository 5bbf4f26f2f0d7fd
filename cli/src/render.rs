// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use std::fmt::Write;

use gomoku_core::{BoardView, Cell, Coord};

/// Render the board as text. Rows and columns are labelled with the
/// 0-based indices the `play` prompt expects; the last move is bracketed.
pub fn render_board(view: &BoardView) -> String {
    let size = view.size();
    let last = view.last_move.map(|mv| mv.coord);
    let mut output = String::new();

    output.push_str("   ");
    for col in 0..size {
        let _ = write!(output, "{col:^3}");
    }
    output.push('\n');

    for row in 0..size {
        let _ = write!(output, "{row:>2} ");
        for col in 0..size {
            let coord = Coord::new(row, col);
            let symbol = match view.snapshot.get(coord) {
                Some(Cell::Black) => '●',
                Some(Cell::White) => '○',
                _ => '+',
            };
            if last == Some(coord) {
                let _ = write!(output, "[{symbol}]");
            } else {
                let _ = write!(output, " {symbol} ");
            }
        }
        let _ = writeln!(output, " {row}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::{Board, Color, Move};

    #[test]
    fn marks_stones_and_last_move() {
        let mut board = Board::new(9).unwrap();
        board.place(Coord::new(4, 4), Color::Black).unwrap();
        board.place(Coord::new(4, 5), Color::White).unwrap();
        let view = BoardView {
            snapshot: board.snapshot(),
            last_move: Some(Move {
                coord: Coord::new(4, 5),
                player: Color::White,
                seq: 1,
            }),
            revision: 2,
        };

        let text = render_board(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[5].starts_with(" 4 "));
        assert!(lines[5].contains(" ● [○]"));
        assert_eq!(text.matches('●').count(), 1);
        assert_eq!(text.matches('+').count(), 79);
    }
}
