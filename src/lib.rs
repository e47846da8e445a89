//! Shinobix - Dattebayo catalog explorer
//!
//! This library provides the core of Shinobix, a terminal browser for the
//! public Dattebayo API of characters, clans and villages.
//!
//! ## Architecture
//!
//! - **Data**: [`api`] fetches and normalizes pages, [`fetch_worker`] runs
//!   fetches in the background and reports back as [`types::AppEvent`]s.
//! - **Core logic**: [`village`] infers home villages, [`render`] turns raw
//!   entities into card and detail views, [`controller`] owns the session
//!   state machine.
//! - **Terminal**: [`app`] holds UI state, [`ui`] draws it with ratatui.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- --endpoint clan
//! cargo run -- --search naruto --print
//! ```

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Data fetching
pub mod api;
pub mod fetch_worker;

// Core logic (no IO)
pub mod controller;
pub mod render;
pub mod village;

// Theme and persisted preferences
pub mod prefs;
pub mod theme;

// Terminal UI state and drawing
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use api::{CatalogClient, CatalogSource};
pub use app::{App, InputMode};
pub use config::Config;
pub use error::FetchError;
pub use types::{AppEvent, Endpoint, FetchRequest, PageResult};
