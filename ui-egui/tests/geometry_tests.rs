// SPDX-License-Identifier: MIT OR Apache-2.0

use egui::Vec2;
use gomoku_core::Coord;
use gomoku_ui_egui::components::board::star_points;
use gomoku_ui_egui::BoardGeometry;

#[test]
fn every_intersection_round_trips() {
    for budget in [320.0, 640.0, 1000.0] {
        for size in 9..=19u8 {
            let g = BoardGeometry::from_budget(size, budget, 24.0, 48.0);
            for row in 0..size {
                for col in 0..size {
                    let coord = Coord::new(row, col);
                    let center = g.cell_center(coord);
                    assert_eq!(g.hit_test(center), Some(coord), "size {size} budget {budget}");

                    // sub-pixel jitter still lands on the same point
                    let jitter = Vec2::new(0.4, -0.4);
                    assert_eq!(g.hit_test(center + jitter), Some(coord));
                }
            }
        }
    }
}

#[test]
fn pitch_never_grows_with_board_size() {
    let mut previous = f32::INFINITY;
    for size in 9..=19u8 {
        let g = BoardGeometry::from_budget(size, 640.0, 24.0, 48.0);
        assert!(g.pitch() <= previous);
        assert!((24.0..=48.0).contains(&g.pitch()));
        previous = g.pitch();
    }
}

#[test]
fn canvas_leaves_half_pitch_margin() {
    for size in 9..=19u8 {
        let g = BoardGeometry::from_budget(size, 640.0, 24.0, 48.0);
        let first = g.cell_center(Coord::new(0, 0));
        let last = g.cell_center(Coord::new(size - 1, size - 1));
        assert!((first.x - g.pitch() / 2.0).abs() < 1e-3);
        assert!((g.canvas() - last.x - g.pitch() / 2.0).abs() < 1e-3);
    }
}

#[test]
fn star_points_lie_on_the_board() {
    for size in [13u8, 19] {
        let g = BoardGeometry::from_budget(size, 640.0, 24.0, 48.0);
        for &(row, col) in star_points(size) {
            let coord = Coord::new(row, col);
            assert_eq!(g.hit_test(g.cell_center(coord)), Some(coord));
        }
    }
}
