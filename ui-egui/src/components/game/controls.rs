// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game control buttons

use egui::Ui;
use gomoku_core::{Color, MatchController, Phase};

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start { size: u8, human: Color },
    Undo,
    Retry,
    NewGame,
}

/// Game control buttons
pub struct GameControls;

impl GameControls {
    /// Size chooser and color buttons shown during setup
    pub fn setup(ui: &mut Ui, controller: &MatchController, size: &mut u8) -> Option<ControlAction> {
        let config = controller.config();
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label("Board size:");
            ui.add(egui::Slider::new(size, config.min_board_size..=config.max_board_size));

            ui.separator();

            if ui.button("Play Black").clicked() {
                action = Some(ControlAction::Start {
                    size: *size,
                    human: Color::Black,
                });
            }
            if ui.button("Play White").clicked() {
                action = Some(ControlAction::Start {
                    size: *size,
                    human: Color::White,
                });
            }
        });

        action
    }

    /// Undo / retry / new game row shown once a match is running
    pub fn in_game(ui: &mut Ui, controller: &MatchController) -> Option<ControlAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(controller.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                action = Some(ControlAction::Undo);
            }

            if controller.phase() == Phase::OpponentTurn && ui.button("Retry").clicked() {
                action = Some(ControlAction::Retry);
            }

            ui.separator();

            if ui.button("New Game").clicked() {
                action = Some(ControlAction::NewGame);
            }
        });

        action
    }
}
