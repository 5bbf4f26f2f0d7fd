// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game status display

use egui::{RichText, Ui};
use gomoku_core::{MatchController, Status};

use crate::palette::Palette;

/// Game status display component
pub struct GameStatus;

impl GameStatus {
    pub fn render(ui: &mut Ui, controller: &MatchController, palette: &Palette) {
        let status = controller.status();
        let session = controller.session();

        ui.horizontal(|ui| {
            let text = RichText::new(status.to_string()).strong();
            let text = match status {
                Status::Error(_) => text.color(palette.error_text),
                _ => text,
            };
            ui.label(text);

            if status != Status::Selecting {
                ui.separator();
                ui.label(format!("You: {}", session.human()));
                ui.separator();
                ui.label(format!("Move: {}", session.history().len()));
            }

            if status == Status::OpponentThinking {
                ui.spinner();
            }
        });
    }
}
