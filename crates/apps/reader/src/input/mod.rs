//! Input handling: typed commands and key bindings

pub mod commands;
pub mod keymap;
