// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board rendering logic

use egui::{Color32, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2};
use gomoku_core::{BoardView, Color, Coord};
use tracing::trace;

use super::BoardGeometry;
use crate::appearance::{Appearance, AppearanceSubscription};
use crate::palette::{lerp_color, Palette};
use crate::ui_config::BoardConfig;

/// Rings used to approximate the radial stone gradient
const GRADIENT_STEPS: usize = 6;

const STAR_13: [(u8, u8); 5] = [(3, 3), (3, 9), (6, 6), (9, 3), (9, 9)];
const STAR_19: [(u8, u8); 9] = [
    (3, 3),
    (3, 9),
    (3, 15),
    (9, 3),
    (9, 9),
    (9, 15),
    (15, 3),
    (15, 9),
    (15, 15),
];

/// Reference points drawn for recognized board sizes
pub fn star_points(size: u8) -> &'static [(u8, u8)] {
    match size {
        13 => &STAR_13,
        19 => &STAR_19,
        _ => &[],
    }
}

/// Size ratios for stones and markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoneStyle {
    /// Stone radius as a fraction of the pitch
    pub stone_radius_ratio: f32,
    /// Marker diameter as a fraction of the pitch
    pub last_move_marker_ratio: f32,
    pub grid_line_width: f32,
}

impl From<&BoardConfig> for StoneStyle {
    fn from(config: &BoardConfig) -> Self {
        Self {
            stone_radius_ratio: config.stone_radius_ratio,
            last_move_marker_ratio: config.last_move_marker_ratio,
            grid_line_width: config.grid_line_width,
        }
    }
}

/// Full set of drawing commands for one frame, back to front:
/// background, grid, star points, stones, last-move marker.
pub fn draw_board(
    view: &BoardView,
    geometry: &BoardGeometry,
    origin: Pos2,
    palette: &Palette,
    style: &StoneStyle,
) -> Vec<Shape> {
    let n = geometry.size();
    let at = |coord: Coord| origin + geometry.cell_center(coord).to_vec2();
    let mut shapes = Vec::with_capacity(1 + 2 * n as usize + view.snapshot.stone_count() * (GRADIENT_STEPS + 1) + 10);

    shapes.push(Shape::rect_filled(
        Rect::from_min_size(origin, geometry.canvas_size()),
        0.0,
        palette.board_bg,
    ));

    let line = Stroke::new(style.grid_line_width, palette.grid_line);
    let last = n.saturating_sub(1);
    for i in 0..n {
        shapes.push(Shape::line_segment([at(Coord::new(0, i)), at(Coord::new(last, i))], line));
        shapes.push(Shape::line_segment([at(Coord::new(i, 0)), at(Coord::new(i, last))], line));
    }

    let star_radius = (geometry.pitch() * 0.1).max(2.0);
    for &(row, col) in star_points(n) {
        shapes.push(Shape::circle_filled(at(Coord::new(row, col)), star_radius, palette.star_point));
    }

    let radius = geometry.pitch() * style.stone_radius_ratio;
    for (coord, color) in view.snapshot.stones() {
        push_stone(&mut shapes, at(coord), radius, color, palette);
    }

    if let Some(mv) = view.last_move {
        if view.snapshot.get(mv.coord).and_then(|c| c.color()).is_some() {
            let marker = match mv.player {
                Color::Black => palette.marker_on_black,
                Color::White => palette.marker_on_white,
            };
            let r = geometry.pitch() * style.last_move_marker_ratio / 2.0;
            shapes.push(Shape::circle_filled(at(mv.coord), r, marker));
        }
    }

    shapes
}

/// Concentric rings from the dark rim to a light spot offset toward the
/// upper left
fn push_stone(shapes: &mut Vec<Shape>, center: Pos2, radius: f32, color: Color, palette: &Palette) {
    let (edge, light) = match color {
        Color::Black => (palette.black_edge, palette.black_center),
        Color::White => (palette.white_edge, palette.white_center),
    };

    for step in 0..GRADIENT_STEPS {
        let t = step as f32 / (GRADIENT_STEPS - 1) as f32;
        let r = radius * (1.0 - 0.75 * t);
        let shift = Vec2::splat(-radius * 0.25 * t);
        shapes.push(Shape::circle_filled(center + shift, r, lerp_color(edge, light, t)));
    }

    if color == Color::White {
        shapes.push(Shape::circle_stroke(center, radius, Stroke::new(1.0, palette.white_outline)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ShapesKey {
    revision: u64,
    size: u8,
    origin: [u32; 2],
    appearance: Appearance,
    pitch: u32,
}

/// Board renderer component. Geometry is recomputed only when the board
/// side or budget changes; shapes only when the view, position, appearance
/// or geometry changes.
pub struct BoardRenderer {
    config: BoardConfig,
    style: StoneStyle,
    appearance: AppearanceSubscription,
    geometry: Option<(u8, u32, BoardGeometry)>,
    shapes: Vec<Shape>,
    shapes_key: Option<ShapesKey>,
    rebuilds: u64,
}

impl BoardRenderer {
    pub fn new(config: &BoardConfig, appearance: AppearanceSubscription) -> Self {
        Self {
            config: config.clone(),
            style: StoneStyle::from(config),
            appearance,
            geometry: None,
            shapes: Vec::new(),
            shapes_key: None,
            rebuilds: 0,
        }
    }

    pub fn set_budget(&mut self, budget: f32) {
        self.config.viewport_budget = budget;
    }

    /// Geometry for a board side at the current budget
    pub fn geometry(&mut self, size: u8) -> BoardGeometry {
        let budget = self.config.viewport_budget.to_bits();
        match self.geometry {
            Some((s, b, g)) if s == size && b == budget => g,
            _ => {
                let g = BoardGeometry::from_budget(
                    size,
                    self.config.viewport_budget,
                    self.config.min_pitch,
                    self.config.max_pitch,
                );
                trace!(size, pitch = g.pitch(), "Board geometry recomputed");
                self.geometry = Some((size, budget, g));
                g
            }
        }
    }

    pub fn appearance(&mut self) -> Appearance {
        self.appearance.latest()
    }

    /// Drawing commands for `view` with the canvas at `origin`
    pub fn shapes(&mut self, view: &BoardView, origin: Pos2) -> &[Shape] {
        let geometry = self.geometry(view.size());
        let appearance = self.appearance.latest();
        let key = ShapesKey {
            revision: view.revision,
            size: view.size(),
            origin: [origin.x.to_bits(), origin.y.to_bits()],
            appearance,
            pitch: geometry.pitch().to_bits(),
        };

        if self.shapes_key != Some(key) {
            let palette = Palette::for_appearance(appearance);
            self.shapes = draw_board(view, &geometry, origin, &palette, &self.style);
            self.shapes_key = Some(key);
            self.rebuilds += 1;
        }
        &self.shapes
    }

    /// How many times the shape list has been rebuilt
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Allocate the canvas and paint the board into it
    pub fn show(&mut self, ui: &mut Ui, view: &BoardView) -> (Response, BoardGeometry) {
        let geometry = self.geometry(view.size());
        let (response, painter) = ui.allocate_painter(geometry.canvas_size(), Sense::click());
        let origin = response.rect.min;
        painter.extend(self.shapes(view, origin).iter().cloned());
        (response, geometry)
    }

    /// Translucent preview of a stone under the pointer
    pub fn ghost(&mut self, geometry: &BoardGeometry, origin: Pos2, coord: Coord, color: Color) -> Shape {
        let palette = Palette::for_appearance(self.appearance.latest());
        let fill = match color {
            Color::Black => palette.black_edge,
            Color::White => palette.white_center,
        };
        Shape::circle_filled(
            origin + geometry.cell_center(coord).to_vec2(),
            geometry.pitch() * self.style.stone_radius_ratio,
            Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), 110),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::AppearanceHub;
    use gomoku_core::Board;

    fn view_with(stones: &[(u8, u8, Color)], size: u8) -> BoardView {
        let mut board = Board::new(size).unwrap();
        let mut last = None;
        for (seq, &(r, c, color)) in stones.iter().enumerate() {
            board.place(Coord::new(r, c), color).unwrap();
            last = Some(gomoku_core::Move {
                coord: Coord::new(r, c),
                player: color,
                seq,
            });
        }
        BoardView {
            snapshot: board.snapshot(),
            last_move: last,
            revision: stones.len() as u64,
        }
    }

    fn is_fill(shape: &Shape) -> bool {
        matches!(shape, Shape::Circle(c) if c.fill != Color32::TRANSPARENT)
    }

    #[test]
    fn empty_board_layers() {
        let view = view_with(&[], 13);
        let g = BoardGeometry::from_budget(13, 520.0, 24.0, 48.0);
        let style = StoneStyle::from(&BoardConfig::default());
        let shapes = draw_board(&view, &g, Pos2::ZERO, &Palette::light(), &style);

        assert!(matches!(shapes[0], Shape::Rect(_)));
        let lines = shapes.iter().filter(|s| matches!(s, Shape::LineSegment { .. })).count();
        assert_eq!(lines, 26);
        let circles = shapes.iter().filter(|s| is_fill(s)).count();
        assert_eq!(circles, 5);
    }

    #[test]
    fn no_star_points_on_unrecognized_sizes() {
        assert!(star_points(9).is_empty());
        assert!(star_points(15).is_empty());
        assert_eq!(star_points(19).len(), 9);
    }

    #[test]
    fn white_stone_has_outline_and_marker_is_last() {
        let view = view_with(&[(4, 4, Color::Black), (4, 5, Color::White)], 9);
        let g = BoardGeometry::from_budget(9, 360.0, 24.0, 48.0);
        let style = StoneStyle::from(&BoardConfig::default());
        let palette = Palette::light();
        let shapes = draw_board(&view, &g, Pos2::ZERO, &palette, &style);

        let outlines = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle(c) if c.stroke.width > 0.0))
            .count();
        assert_eq!(outlines, 1);

        match shapes.last() {
            Some(Shape::Circle(c)) => {
                assert_eq!(c.center, g.cell_center(Coord::new(4, 5)));
                assert_eq!(c.fill, palette.marker_on_white);
            }
            other => panic!("expected marker, got {other:?}"),
        }
    }

    #[test]
    fn shapes_are_cached_until_inputs_change() {
        let hub = AppearanceHub::new(Appearance::Light);
        let mut renderer = BoardRenderer::new(&BoardConfig::default(), hub.subscribe());
        let view = view_with(&[(0, 0, Color::Black)], 9);

        renderer.shapes(&view, Pos2::ZERO);
        renderer.shapes(&view, Pos2::ZERO);
        assert_eq!(renderer.rebuilds(), 1);

        hub.publish(Appearance::Dark);
        renderer.shapes(&view, Pos2::ZERO);
        assert_eq!(renderer.rebuilds(), 2);

        renderer.shapes(&view, Pos2::new(10.0, 0.0));
        assert_eq!(renderer.rebuilds(), 3);

        let next = view_with(&[(0, 0, Color::Black), (1, 1, Color::White)], 9);
        renderer.shapes(&next, Pos2::new(10.0, 0.0));
        assert_eq!(renderer.rebuilds(), 4);
    }
}
