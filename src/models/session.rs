use serde::{Deserialize, Serialize};

use super::mantra::Mantra;

/// The playback state of the active session's audio.
///
/// - `Stopped`: No playback; either never started or the track ended
/// - `Playing`: Audio is playing and the elapsed clock is ticking
/// - `Paused`: Audio and clock are both frozen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stopped" => Some(Self::Stopped),
            "playing" => Some(Self::Playing),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// The lifecycle state of the active session.
///
/// - `InProgress`: Counting toward the target
/// - `Completed`: Target reached, awaiting donor capture
///
/// There is no `Submitted` variant: submitting finalizes the session into a
/// [`HistoryEntry`](super::HistoryEntry) and discards it, returning the
/// engine to idle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    InProgress,
    Completed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A playback command accepted by the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackCommand {
    Play,
    Pause,
}

/// Read-only view of the active session for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mantra_id: String,
    pub mantra_name: String,
    pub target_count: u32,
    pub count: u32,
    pub elapsed_seconds: u64,
    pub playback: PlaybackState,
    pub lifecycle: LifecycleState,
    /// Set when the session overrides the mantra's default audio.
    pub custom_audio: Option<super::AudioSource>,
}

impl SessionSnapshot {
    pub fn from_parts(
        mantra: &Mantra,
        count: u32,
        elapsed_seconds: u64,
        playback: PlaybackState,
        lifecycle: LifecycleState,
        custom_audio: Option<super::AudioSource>,
    ) -> Self {
        Self {
            mantra_id: mantra.id.clone(),
            mantra_name: mantra.name.clone(),
            target_count: mantra.target_count,
            count,
            elapsed_seconds,
            playback,
            lifecycle,
            custom_audio,
        }
    }
}

/// Input for starting a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionInput {
    pub mantra_id: String,
    /// Overrides the mantra's default audio when provided.
    #[serde(default)]
    pub custom_audio: Option<super::AudioSource>,
}

/// Input for the playback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackInput {
    pub command: PlaybackCommand,
}
