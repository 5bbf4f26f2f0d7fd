// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(clippy::all)]

//! Gomoku desktop UI library

pub mod app;
pub mod appearance;
pub mod components;
pub mod msg;
pub mod palette;
pub mod ui_config;
pub mod worker;

pub use app::App;
pub use appearance::{Appearance, AppearanceHub, AppearanceSubscription};
pub use components::{BoardGeometry, BoardRenderer};
pub use ui_config::UiConfig;
