pub mod command;
pub mod config;
pub mod engine;
pub mod keymap;
pub mod model;
pub mod pagination;
pub mod reducer;
pub mod state;
