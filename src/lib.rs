//! Tatara Bridge Client - Library interface
//!
//! Re-exports internal modules for use in integration tests.

pub mod app;
pub mod bridge;
pub mod chains;
pub mod config;
pub mod contracts;
pub mod guard;
pub mod ui;
pub mod wallet;
