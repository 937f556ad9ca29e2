//! Terminal flashcard trainer for medical genetics.
//!
//! The session engine (`engine`, `session`) is independent of the terminal
//! front end (`app`, `ui`) and is what the integration tests and benchmarks
//! drive.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
