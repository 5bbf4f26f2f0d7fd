// SPDX-License-Identifier: MIT OR Apache-2.0

//! UI components organized by feature

pub mod board;
pub mod game;

// Re-export commonly used components
pub use board::{BoardGeometry, BoardInteraction, BoardRenderer};
pub use game::{ControlAction, GameControls, GameStatus};
