use serde::{Deserialize, Serialize};

/// A playable audio resource, as the engine sees it.
///
/// The engine is agnostic to the resource's origin: a streamed URL (the
/// mantra's default accompaniment) and a user upload are handled identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioSource {
    /// Remote streamed resource.
    Url { url: String },
    /// User-supplied file, already validated upstream.
    Upload { file_name: String, mime_type: String },
}

impl AudioSource {
    /// MIME type of the resource, when one is known.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Url { .. } => None,
            Self::Upload { mime_type, .. } => Some(mime_type),
        }
    }
}

/// Audio encodings the playback adapters accept.
///
/// Anything else must be rejected **before** it reaches the engine; a session
/// is never started with an unsupported resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "audio/mpeg" => Some(Self::Mp3),
            "audio/wav" => Some(Self::Wav),
            "audio/ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
        }
    }
}
