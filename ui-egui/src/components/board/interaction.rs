// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board interaction handling

use egui::{Pos2, Response};
use gomoku_core::Coord;

use super::BoardGeometry;

/// Tracks the hovered intersection and turns clicks into coordinates
#[derive(Debug, Default)]
pub struct BoardInteraction {
    hover: Option<Coord>,
}

impl BoardInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update hover state and return the clicked intersection, if any
    pub fn handle(&mut self, response: &Response, geometry: &BoardGeometry) -> Option<Coord> {
        let origin = response.rect.min;
        self.hover = response
            .hover_pos()
            .and_then(|pos| Self::locate(pos, origin, geometry));

        if !response.clicked() {
            return None;
        }
        response
            .interact_pointer_pos()
            .and_then(|pos| Self::locate(pos, origin, geometry))
    }

    pub fn hover(&self) -> Option<Coord> {
        self.hover
    }

    /// Screen position to board coordinate for a canvas placed at `origin`
    pub fn locate(pos: Pos2, origin: Pos2, geometry: &BoardGeometry) -> Option<Coord> {
        geometry.hit_test((pos - origin).to_pos2())
    }
}
