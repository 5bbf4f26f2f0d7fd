// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gomoku CLI: stdio service endpoint and terminal play

pub mod play;
pub mod render;

pub use play::{run, Command, PlayOptions};
pub use render::render_board;
