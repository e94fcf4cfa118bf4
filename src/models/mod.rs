//! Domain models for the japa session engine.
//!
//! # Core Concepts
//!
//! ## Permanent Entities
//!
//! - [`Mantra`]: An immutable catalog entry with a repetition target and a
//!   default audio accompaniment. Seeded at startup, never mutated.
//! - [`HistoryEntry`]: A finalized session record, newest-first in the
//!   [`HistoryStore`](crate::history::HistoryStore). Held for the lifetime
//!   of the process only.
//!
//! ## Ephemeral Entities
//!
//! - The active session, owned exclusively by
//!   [`SessionEngine`](crate::engine::SessionEngine) (at most one at a time)
//!   and exposed to callers as a [`SessionSnapshot`]. It is discarded on
//!   cancel, or finalized into a [`HistoryEntry`] on submit.

mod audio;
mod history;
mod mantra;
mod session;

pub use audio::*;
pub use history::*;
pub use mantra::*;
pub use session::*;
