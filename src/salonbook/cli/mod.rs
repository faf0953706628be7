//! Terminal client for the salonbook library.

pub mod commands;
pub mod menu;
pub mod render;
pub mod setup;

pub use commands::run;
