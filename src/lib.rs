//! nwb-inspector: best-practice inspection of neurophysiology session files
//!
//! A session is read into a typed object graph ([`model`]), a catalog of checks
//! ([`checks`]) is narrowed to the checks a run should execute, and the engine
//! ([`engine`]) dispatches them over every object, producing [`engine::Message`]s
//! that are grouped and rendered by [`report`].

pub mod checks;
pub mod commands;
pub mod core;
pub mod engine;
pub mod model;
pub mod report;
pub mod ui;
