// SPDX-License-Identifier: MIT OR Apache-2.0
//! `DeckPlay` presentation player.
//!
//! Runs a deck as a live show:
//! - Playback session with slide navigation and an "ended" screen
//! - Presentation-wide countdown that can be inherited across slides
//! - Audio that keeps playing across slide transitions
//! - Per-slide auto-advance with a progress indicator
//! - Configurable key bindings
//!
//! ## Architecture
//!
//! [`PlaybackSession`] owns every per-slide resource and tears them down in
//! a fixed order on each transition. Rendering goes through the
//! [`RenderSurface`] trait and sounds through [`MediaResolver`], so the
//! session runs the same against a real window or the in-memory
//! [`HeadlessSurface`].

pub mod auto_advance;
pub mod config;
pub mod continuing_audio;
pub mod countdown;
pub mod error;
pub mod headless;
pub mod keymap;
pub mod media;
pub mod session;
pub mod surface;

#[cfg(test)]
mod testing;

pub use auto_advance::AutoAdvanceTimer;
pub use config::PlayerConfig;
pub use continuing_audio::{AudioCarry, ContinuingAudioResource};
pub use countdown::{format_time, CountdownDecision, CountdownResource};
pub use error::{MediaError, PlayerError, Result, SurfaceError};
pub use headless::HeadlessSurface;
pub use keymap::{InputSignal, KeyBindings};
pub use media::{FileMediaResolver, MediaResolver, Sound};
pub use session::{Mode, PlaybackEvent, PlaybackSession, SessionState, SubState};
pub use surface::RenderSurface;
