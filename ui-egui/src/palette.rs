// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board colors for each appearance

use egui::Color32;

use crate::appearance::Appearance;

/// Colors used by the board renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub board_bg: Color32,
    pub grid_line: Color32,
    pub star_point: Color32,

    // Stones shade from the edge color at the rim to the center color
    pub black_edge: Color32,
    pub black_center: Color32,
    pub white_edge: Color32,
    pub white_center: Color32,
    pub white_outline: Color32,

    /// Marker drawn on a black stone
    pub marker_on_black: Color32,
    /// Marker drawn on a white stone
    pub marker_on_white: Color32,

    pub error_text: Color32,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            board_bg: Color32::from_rgb(220, 179, 92), // kaya
            grid_line: Color32::from_gray(40),
            star_point: Color32::from_gray(30),
            black_edge: Color32::from_gray(8),
            black_center: Color32::from_gray(96),
            white_edge: Color32::from_gray(196),
            white_center: Color32::from_gray(255),
            white_outline: Color32::from_gray(90),
            marker_on_black: Color32::from_gray(235),
            marker_on_white: Color32::from_gray(20),
            error_text: Color32::from_rgb(190, 30, 30),
        }
    }

    pub fn dark() -> Self {
        Self {
            board_bg: Color32::from_rgb(150, 116, 58),
            grid_line: Color32::from_gray(22),
            star_point: Color32::from_gray(18),
            black_edge: Color32::from_gray(4),
            black_center: Color32::from_gray(80),
            white_edge: Color32::from_gray(170),
            white_center: Color32::from_gray(236),
            white_outline: Color32::from_gray(40),
            marker_on_black: Color32::from_gray(220),
            marker_on_white: Color32::from_gray(12),
            error_text: Color32::from_rgb(239, 83, 80),
        }
    }

    pub fn for_appearance(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Light => Self::light(),
            Appearance::Dark => Self::dark(),
        }
    }
}

/// Linear blend between two colors, `t` in 0..=1
pub fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
        mix(from.a(), to.a()),
    )
}
