//! Vocabulary flashcards with per-language-pair progress tracking.
//!
//! The core is three pieces: [`store::progress::ProgressStore`] (verb status
//! per pair, persisted through a [`store::kv::KeyValueStore`]),
//! [`catalog::selector::CatalogSelector`] (active pair and its verb list) and
//! the pure projections in [`engine`]. The binary wraps them in a terminal UI.

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod store;
pub mod ui;
