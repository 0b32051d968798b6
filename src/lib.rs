//! Explore a table of financial news events and their market impact.
//!
//! [`data`] holds the loader and the pure filter/aggregate pipeline; the
//! remaining modules are the eframe desktop shell drawn on top of it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
