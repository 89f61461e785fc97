//! missal library
//!
//! Catholic prayers, daily Mass readings, the saint of the day and reading
//! explanations served through a TTL cache in front of the Gemini API, next
//! to a bundled rosary and saints calendar. The binary is a thin terminal front-end over
//! these modules; integration tests drive them directly.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod rosary;
pub mod sources;
pub mod ui;
