// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the player.

use deckplay_model::{DeckError, MediaId};
use thiserror::Error;

/// Failures while loading media-backed resources.
///
/// These never abort playback: the resource that hit them logs a warning and
/// carries on without the sound.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No file matches the media ID
    #[error("Media not found: {0}")]
    NotFound(MediaId),

    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File could not be decoded
    #[error("Failed to decode media: {0}")]
    Decode(String),

    /// No audio output is available
    #[error("Audio output unavailable")]
    Unavailable,
}

/// Failures reported by the presentation surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The host refused to enter presentation (fullscreen-like) mode
    #[error("Presentation mode refused: {0}")]
    PresentationRefused(String),
}

/// Top-level errors of the player binary
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Deck could not be loaded
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// Config file is not valid RON
    #[error("Invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
