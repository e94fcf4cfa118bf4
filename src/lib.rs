//! Japa session engine: guided mantra-repetition sessions with a static
//! catalog, an audio playback adapter seam, and an in-memory history log.

pub mod api;
pub mod catalog;
pub mod engine;
pub mod history;
pub mod models;
