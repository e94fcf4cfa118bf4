//! The japa session engine.
//!
//! Owns the single active session's state machine: repetition count, the
//! 1-second elapsed clock, playback state and the completion/data-capture
//! flow. All public operations lock the shared state, run to completion and
//! release, so interleaved callers always observe a consistent session.
//!
//! The only deferred work is the tick task scheduled while playback is
//! active. At most one tick task exists at a time, and every transition out
//! of `Playing` (pause, ended, cancel, submit, restart) cancels it before
//! returning. Ticks are epoch-guarded so an aborted-but-in-flight tick can
//! never mutate a session it no longer owns.

mod audio;

pub use audio::{AudioPlayback, CountingPlayback, SilentPlayback};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::catalog::MantraCatalog;
use crate::history::HistoryStore;
use crate::models::{
    AudioSource, Donor, HistoryEntry, LifecycleState, Mantra, PlaybackCommand, PlaybackState,
    SessionSnapshot,
};

/// Failure taxonomy for session operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `start` referenced a mantra absent from the catalog. The engine
    /// remains idle.
    #[error("mantra not found: {0}")]
    InvalidMantra(String),

    /// The operation requires an active session and there is none.
    #[error("no active session")]
    NoSession,

    /// `submit` was called before the repetition target was reached.
    #[error("session has not reached its target count")]
    NotCompleted,

    /// `submit` was called with empty donor fields. Recoverable: the session
    /// stays `Completed` and the caller may resubmit.
    #[error("missing required donor fields: {}", fields.join(", "))]
    ValidationError { fields: Vec<&'static str> },

    /// An unsupported audio MIME type. Raised by the serving layer before
    /// the engine is touched; no session state changes.
    #[error("unsupported audio type: {0}")]
    InvalidResource(String),
}

/// State-change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Started { mantra_id: String },
    Counted { count: u32 },
    /// The repetition target was reached.
    Completed,
    PlaybackChanged(PlaybackState),
    Tick { elapsed_seconds: u64 },
    Cancelled,
    Submitted { entry_id: Uuid },
}

/// Builds a playback adapter for the session's effective audio resource.
pub type PlaybackFactory = Arc<dyn Fn(AudioSource) -> Arc<dyn AudioPlayback> + Send + Sync>;

struct ActiveSession {
    mantra: Mantra,
    count: u32,
    elapsed_seconds: u64,
    playback: PlaybackState,
    lifecycle: LifecycleState,
    custom_audio: Option<AudioSource>,
    audio: Arc<dyn AudioPlayback>,
}

impl ActiveSession {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_parts(
            &self.mantra,
            self.count,
            self.elapsed_seconds,
            self.playback,
            self.lifecycle,
            self.custom_audio.clone(),
        )
    }
}

struct EngineState {
    session: Option<ActiveSession>,
    /// Handle of the scheduled tick task. `Some` iff playback is `Playing`.
    ticker: Option<JoinHandle<()>>,
    /// Bumped on every ticker (re)schedule and cancel; a tick whose epoch is
    /// stale returns without touching the session.
    tick_epoch: u64,
}

pub struct SessionEngine {
    catalog: Arc<MantraCatalog>,
    history: HistoryStore,
    state: Arc<Mutex<EngineState>>,
    events: broadcast::Sender<EngineEvent>,
    make_playback: PlaybackFactory,
}

impl SessionEngine {
    /// Engine wired with the logging adapter, as the server binary uses it.
    pub fn new(catalog: Arc<MantraCatalog>, history: HistoryStore) -> Self {
        Self::with_playback_factory(
            catalog,
            history,
            Arc::new(|source| Arc::new(SilentPlayback::new(Some(source)))),
        )
    }

    /// Engine with a custom adapter factory, used by tests to observe the
    /// play/pause/stop commands the engine issues.
    pub fn with_playback_factory(
        catalog: Arc<MantraCatalog>,
        history: HistoryStore,
        make_playback: PlaybackFactory,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            catalog,
            history,
            state: Arc::new(Mutex::new(EngineState {
                session: None,
                ticker: None,
                tick_epoch: 0,
            })),
            events,
            make_playback,
        }
    }

    /// Subscribe to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Read-only view of the active session, or `None` when idle.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let state = self.state.lock().expect("engine lock poisoned");
        state.session.as_ref().map(ActiveSession::snapshot)
    }

    /// Begin a session on the given mantra, discarding any prior session.
    ///
    /// Fails with [`EngineError::InvalidMantra`] when the slug does not
    /// resolve in the catalog; in that case the engine state is untouched.
    pub fn start(
        &self,
        mantra_id: &str,
        custom_audio: Option<AudioSource>,
    ) -> Result<SessionSnapshot, EngineError> {
        let mantra = self
            .catalog
            .get(mantra_id)
            .cloned()
            .ok_or_else(|| EngineError::InvalidMantra(mantra_id.to_string()))?;

        let mut state = self.state.lock().expect("engine lock poisoned");
        self.cancel_ticker(&mut state);
        if let Some(old) = state.session.take() {
            old.audio.stop();
            tracing::info!(mantra = %old.mantra.id, "discarding prior session");
        }

        let effective = custom_audio.clone().unwrap_or(AudioSource::Url {
            url: mantra.audio_url.clone(),
        });
        let audio = (self.make_playback)(effective);

        let session = ActiveSession {
            mantra,
            count: 0,
            elapsed_seconds: 0,
            playback: PlaybackState::Stopped,
            lifecycle: LifecycleState::InProgress,
            custom_audio,
            audio,
        };
        let snapshot = session.snapshot();
        state.session = Some(session);
        drop(state);

        tracing::info!(mantra = %snapshot.mantra_id, target = snapshot.target_count, "session started");
        let _ = self.events.send(EngineEvent::Started {
            mantra_id: snapshot.mantra_id.clone(),
        });
        Ok(snapshot)
    }

    /// Count one repetition.
    ///
    /// Reaching the target flips the lifecycle to `Completed` without touching
    /// playback. Incrementing while already `Completed` is a no-op, which is
    /// what keeps `count` from ever exceeding the target.
    pub fn increment(&self) -> Result<SessionSnapshot, EngineError> {
        let mut state = self.state.lock().expect("engine lock poisoned");
        let session = state.session.as_mut().ok_or(EngineError::NoSession)?;

        if session.lifecycle == LifecycleState::Completed {
            return Ok(session.snapshot());
        }

        session.count += 1;
        let completed = session.count >= session.mantra.target_count;
        if completed {
            session.lifecycle = LifecycleState::Completed;
        }
        let snapshot = session.snapshot();
        drop(state);

        if completed {
            tracing::info!(count = snapshot.count, "target reached");
            let _ = self.events.send(EngineEvent::Completed);
        } else {
            let _ = self.events.send(EngineEvent::Counted {
                count: snapshot.count,
            });
        }
        Ok(snapshot)
    }

    /// Apply a playback command.
    ///
    /// `Play` while already playing and `Pause` while not playing are no-ops.
    /// Entering `Playing` replaces any stale tick task with a fresh one;
    /// leaving it cancels the task, freezing `elapsed_seconds`. Paused time is
    /// therefore never accumulated.
    pub fn set_playback(&self, command: PlaybackCommand) -> Result<SessionSnapshot, EngineError> {
        let mut state = self.state.lock().expect("engine lock poisoned");
        let session = state.session.as_mut().ok_or(EngineError::NoSession)?;

        let snapshot = match command {
            PlaybackCommand::Play => {
                if session.playback == PlaybackState::Playing {
                    return Ok(session.snapshot());
                }
                session.playback = PlaybackState::Playing;
                session.audio.play();
                let snapshot = session.snapshot();
                self.schedule_ticker(&mut state);
                snapshot
            }
            PlaybackCommand::Pause => {
                if session.playback != PlaybackState::Playing {
                    return Ok(session.snapshot());
                }
                session.playback = PlaybackState::Paused;
                session.audio.pause();
                let snapshot = session.snapshot();
                self.cancel_ticker(&mut state);
                snapshot
            }
        };
        drop(state);

        let _ = self
            .events
            .send(EngineEvent::PlaybackChanged(snapshot.playback));
        Ok(snapshot)
    }

    /// Adapter signal: the track reached its natural end.
    ///
    /// Forces `Playing → Stopped` without altering `count` or
    /// `elapsed_seconds`. A no-op in any other state, including idle.
    pub fn audio_ended(&self) {
        let mut state = self.state.lock().expect("engine lock poisoned");
        let playing = state
            .session
            .as_ref()
            .is_some_and(|s| s.playback == PlaybackState::Playing);
        if !playing {
            return;
        }

        self.cancel_ticker(&mut state);
        if let Some(session) = state.session.as_mut() {
            session.playback = PlaybackState::Stopped;
        }
        drop(state);

        tracing::debug!("audio ended, playback stopped");
        let _ = self
            .events
            .send(EngineEvent::PlaybackChanged(PlaybackState::Stopped));
    }

    /// Discard the active session without producing a history entry.
    ///
    /// Cancels the tick task and releases the audio adapter. A no-op when
    /// already idle.
    pub fn cancel(&self) {
        let mut state = self.state.lock().expect("engine lock poisoned");
        self.cancel_ticker(&mut state);
        let Some(session) = state.session.take() else {
            return;
        };
        session.audio.stop();
        drop(state);

        tracing::info!(mantra = %session.mantra.id, "session cancelled");
        let _ = self.events.send(EngineEvent::Cancelled);
    }

    /// Finalize a completed session into a [`HistoryEntry`].
    ///
    /// Requires the lifecycle to be `Completed` and all four donor fields to
    /// be non-empty. On validation failure the session is left untouched so
    /// the caller may correct the fields and resubmit. On success the entry
    /// is prepended to the history store and the engine returns to idle.
    pub fn submit(&self, donor: Donor) -> Result<HistoryEntry, EngineError> {
        let mut state = self.state.lock().expect("engine lock poisoned");
        let session = state.session.as_ref().ok_or(EngineError::NoSession)?;

        if session.lifecycle != LifecycleState::Completed {
            return Err(EngineError::NotCompleted);
        }
        let missing = donor.missing_fields();
        if !missing.is_empty() {
            return Err(EngineError::ValidationError { fields: missing });
        }

        self.cancel_ticker(&mut state);
        let session = state.session.take().expect("session checked above");
        session.audio.stop();
        drop(state);

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            mantra_name: session.mantra.name.clone(),
            total_count: session.count,
            duration_seconds: session.elapsed_seconds,
            submitted_at: Utc::now(),
            donor,
        };
        self.history.append(entry.clone());

        tracing::info!(
            mantra = %session.mantra.id,
            count = entry.total_count,
            duration = entry.duration_seconds,
            "session submitted"
        );
        let _ = self.events.send(EngineEvent::Submitted { entry_id: entry.id });
        Ok(entry)
    }

    /// Replace any outstanding tick task with a fresh one. Must be called
    /// with playback already set to `Playing`.
    fn schedule_ticker(&self, state: &mut EngineState) {
        if let Some(handle) = state.ticker.take() {
            handle.abort();
        }
        state.tick_epoch += 1;
        let epoch = state.tick_epoch;
        let shared = Arc::clone(&self.state);
        let events = self.events.clone();

        state.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick resolves immediately; consume it so the clock
            // advances one second per elapsed second.
            interval.tick().await;
            loop {
                interval.tick().await;
                let elapsed = {
                    let mut state = shared.lock().expect("engine lock poisoned");
                    if state.tick_epoch != epoch {
                        return;
                    }
                    let Some(session) = state.session.as_mut() else {
                        return;
                    };
                    if session.playback != PlaybackState::Playing {
                        return;
                    }
                    session.elapsed_seconds += 1;
                    session.elapsed_seconds
                };
                let _ = events.send(EngineEvent::Tick {
                    elapsed_seconds: elapsed,
                });
            }
        }));
    }

    /// Abort the tick task, if any, and invalidate in-flight ticks.
    fn cancel_ticker(&self, state: &mut EngineState) {
        if let Some(handle) = state.ticker.take() {
            handle.abort();
        }
        state.tick_epoch += 1;
    }
}

impl Clone for SessionEngine {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            history: self.history.clone(),
            state: self.state.clone(),
            events: self.events.clone(),
            make_playback: self.make_playback.clone(),
        }
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
