// SPDX-License-Identifier: MIT OR Apache-2.0
//! Media-backed sound resources.
//!
//! This module provides:
//! - The [`MediaResolver`] seam used by playback resources to load sounds
//! - A file-based resolver playing through rodio (when the "audio" feature is enabled)
//!
//! When the "audio" feature is not enabled, the resolver still checks that
//! media files exist but logs a warning instead of playing them.

use crate::error::MediaError;
use deckplay_model::MediaId;
use std::path::{Path, PathBuf};

/// A loaded, ready-to-play sound
pub trait Sound {
    /// Start (or resume) playback
    fn play(&mut self);

    /// Stop playback and release the output
    fn stop(&mut self);
}

/// Resolves media IDs to playable sounds
pub trait MediaResolver {
    /// Load the sound behind `id`, paused
    fn load_sound(&mut self, id: &MediaId) -> Result<Box<dyn Sound>, MediaError>;
}

/// Resolve a media ID to an existing file, relative to `assets_root` first
fn resolve_media_path(assets_root: Option<&Path>, id: &MediaId) -> Option<PathBuf> {
    if id.as_str().is_empty() {
        return None;
    }

    let path = PathBuf::from(id.as_str());

    if path.is_absolute() && path.exists() {
        return Some(path);
    }

    if let Some(root) = assets_root {
        let full_path = root.join(&path);
        if full_path.exists() {
            return Some(full_path);
        }
    }

    if path.exists() {
        return Some(path);
    }

    None
}

// ============================================================================
// File Media Resolver (with rodio)
// ============================================================================

#[cfg(feature = "audio")]
mod engine {
    use super::*;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;

    struct RodioSound {
        sink: Sink,
    }

    impl Sound for RodioSound {
        fn play(&mut self) {
            self.sink.play();
        }

        fn stop(&mut self) {
            self.sink.stop();
        }
    }

    /// Loads sounds from disk and plays them on the default output device
    pub struct FileMediaResolver {
        /// Output stream (must be kept alive)
        _stream: Option<OutputStream>,
        /// Stream handle for creating sinks
        stream_handle: Option<OutputStreamHandle>,
        /// Assets root path
        assets_root: Option<PathBuf>,
    }

    impl FileMediaResolver {
        /// Open the default audio output; without one every load fails with
        /// [`MediaError::Unavailable`]
        pub fn new(assets_root: Option<PathBuf>) -> Self {
            let (stream, stream_handle) = match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    tracing::info!("Audio output initialized");
                    (Some(stream), Some(handle))
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize audio: {}. Sounds will be skipped.", e);
                    (None, None)
                }
            };

            Self {
                _stream: stream,
                stream_handle,
                assets_root,
            }
        }
    }

    impl MediaResolver for FileMediaResolver {
        fn load_sound(&mut self, id: &MediaId) -> Result<Box<dyn Sound>, MediaError> {
            let handle = self.stream_handle.as_ref().ok_or(MediaError::Unavailable)?;
            let path = resolve_media_path(self.assets_root.as_deref(), id)
                .ok_or_else(|| MediaError::NotFound(id.clone()))?;

            let file = File::open(&path)?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| MediaError::Decode(format!("{}: {e}", path.display())))?;
            let sink = Sink::try_new(handle).map_err(|_| MediaError::Unavailable)?;
            sink.pause();
            sink.append(source);

            tracing::debug!("Loaded sound {:?}", path);
            Ok(Box::new(RodioSound { sink }))
        }
    }
}

// ============================================================================
// Stub File Media Resolver (without rodio)
// ============================================================================

#[cfg(not(feature = "audio"))]
mod engine {
    use super::*;

    /// Media resolver stub (no audio support)
    pub struct FileMediaResolver {
        /// Assets root path
        assets_root: Option<PathBuf>,
        /// Log warning once
        warned: bool,
    }

    impl FileMediaResolver {
        /// Create the stub resolver
        pub fn new(assets_root: Option<PathBuf>) -> Self {
            tracing::info!("Media resolver: stub implementation (audio feature not enabled)");
            Self {
                assets_root,
                warned: false,
            }
        }

        fn warn_once(&mut self) {
            if !self.warned {
                tracing::warn!("Sound playback not available: compile with --features audio");
                self.warned = true;
            }
        }
    }

    impl MediaResolver for FileMediaResolver {
        fn load_sound(&mut self, id: &MediaId) -> Result<Box<dyn Sound>, MediaError> {
            if resolve_media_path(self.assets_root.as_deref(), id).is_none() {
                return Err(MediaError::NotFound(id.clone()));
            }
            self.warn_once();
            Err(MediaError::Unavailable)
        }
    }
}

pub use engine::FileMediaResolver;
