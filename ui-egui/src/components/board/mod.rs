// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board rendering components

mod interaction;
mod renderer;

pub use interaction::BoardInteraction;
pub use renderer::{draw_board, star_points, BoardRenderer, StoneStyle};

use egui::{Pos2, Vec2};
use gomoku_core::Coord;

/// Pixel layout of a board of a given side. All positions are relative to
/// the canvas' top-left corner, in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    size: u8,
    pitch: f32,
    padding: f32,
    canvas: f32,
}

impl BoardGeometry {
    /// Pitch shrinks as the board grows, clamped to `min_pitch..=max_pitch`.
    /// Padding is half a pitch so edge intersections are not clipped.
    pub fn from_budget(size: u8, budget: f32, min_pitch: f32, max_pitch: f32) -> Self {
        let size = size.max(1);
        let pitch = (budget / size as f32).clamp(min_pitch, max_pitch);
        let padding = pitch / 2.0;
        let canvas = (size as f32 - 1.0) * pitch + 2.0 * padding;
        Self {
            size,
            pitch,
            padding,
            canvas,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Logical side length of the square canvas
    pub fn canvas(&self) -> f32 {
        self.canvas
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::splat(self.canvas)
    }

    /// Intersection point for a cell. Columns run along x, rows along y.
    pub fn cell_center(&self, coord: Coord) -> Pos2 {
        Pos2::new(
            self.padding + coord.col as f32 * self.pitch,
            self.padding + coord.row as f32 * self.pitch,
        )
    }

    /// Nearest intersection to a canvas-relative point, if it lies on the
    /// board. Rounds rather than truncates so jitter near a point still hits.
    pub fn hit_test(&self, pos: Pos2) -> Option<Coord> {
        let col = ((pos.x - self.padding) / self.pitch).round();
        let row = ((pos.y - self.padding) / self.pitch).round();
        let n = self.size as f32;
        if !(0.0..n).contains(&row) || !(0.0..n).contains(&col) {
            return None;
        }
        Some(Coord::new(row as u8, col as u8))
    }

    /// Physical pixel buffer size for a display scale factor
    pub fn backing_size(&self, pixels_per_point: f32) -> [u32; 2] {
        let side = (self.canvas * pixels_per_point.max(0.0)).ceil() as u32;
        [side, side]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_matches_pitch_and_padding() {
        let g = BoardGeometry::from_budget(15, 640.0, 24.0, 48.0);
        assert!((g.pitch() - 640.0 / 15.0).abs() < 1e-4);
        assert_eq!(g.padding(), g.pitch() / 2.0);
        assert!((g.canvas() - (14.0 * g.pitch() + g.pitch())).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        assert_eq!(BoardGeometry::from_budget(9, 640.0, 24.0, 48.0).pitch(), 48.0);
        assert_eq!(BoardGeometry::from_budget(19, 200.0, 24.0, 48.0).pitch(), 24.0);
    }

    #[test]
    fn hit_test_rounds_to_nearest() {
        let g = BoardGeometry::from_budget(9, 360.0, 24.0, 48.0);
        let center = g.cell_center(Coord::new(3, 5));
        let jitter = Vec2::new(g.pitch() * 0.3, -g.pitch() * 0.3);
        assert_eq!(g.hit_test(center + jitter), Some(Coord::new(3, 5)));
    }

    #[test]
    fn hit_test_rejects_outside() {
        let g = BoardGeometry::from_budget(9, 360.0, 24.0, 48.0);
        assert_eq!(g.hit_test(Pos2::new(-g.pitch(), 10.0)), None);
        assert_eq!(g.hit_test(Pos2::new(g.canvas() + g.pitch(), 10.0)), None);
        assert_eq!(g.hit_test(Pos2::new(f32::NAN, 10.0)), None);
    }

    #[test]
    fn backing_scales_with_pixel_ratio() {
        let g = BoardGeometry::from_budget(10, 400.0, 24.0, 48.0);
        assert_eq!(g.backing_size(1.0), [400, 400]);
        assert_eq!(g.backing_size(2.0), [800, 800]);
        assert_eq!(g.backing_size(1.5), [600, 600]);
    }
}
