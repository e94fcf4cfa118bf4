//! Audio playback adapter contract.
//!
//! The engine drives playback through this trait and never touches a media
//! framework directly. Decoding, buffering and the `ended` detection all live
//! behind the adapter; the engine only issues commands and consumes the
//! [`audio_ended`](super::SessionEngine::audio_ended) signal.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::models::AudioSource;

/// Playback control for one audio resource.
///
/// Implementations must tolerate redundant commands (`play` while playing,
/// `stop` after stop): the engine treats those transitions as idempotent and
/// may repeat them on reset paths.
pub trait AudioPlayback: Send + Sync {
    fn play(&self);
    fn pause(&self);
    /// Stop playback and release any adapter-held decode buffer.
    fn stop(&self);
}

/// Adapter used by the server binary: playback happens client-side, so the
/// engine-side adapter only logs the commands it would forward.
pub struct SilentPlayback {
    source: Option<AudioSource>,
}

impl SilentPlayback {
    pub fn new(source: Option<AudioSource>) -> Self {
        Self { source }
    }
}

impl AudioPlayback for SilentPlayback {
    fn play(&self) {
        tracing::debug!(source = ?self.source, "audio play");
    }

    fn pause(&self) {
        tracing::debug!(source = ?self.source, "audio pause");
    }

    fn stop(&self) {
        tracing::debug!(source = ?self.source, "audio stop");
    }
}

/// Test adapter that counts the commands it receives.
#[derive(Default)]
pub struct CountingPlayback {
    pub plays: AtomicU32,
    pub pauses: AtomicU32,
    pub stops: AtomicU32,
}

impl CountingPlayback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn play_count(&self) -> u32 {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn pause_count(&self) -> u32 {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

impl AudioPlayback for CountingPlayback {
    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
