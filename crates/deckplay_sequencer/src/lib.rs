// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation sequencer for `DeckPlay`.
//!
//! This crate turns a slide's ordered animation steps into a live run:
//! - Wave partitioning (a triggering step plus its `WithPrevious` riders)
//! - Click-gated waves that suspend until released
//! - Skip (force the running wave to its end state) and cleanup (cancel)
//! - Easing curves applied to step progress
//!
//! ## Architecture
//!
//! The sequencer is a single-threaded state machine driven by the host's
//! `update(dt)` calls. It never renders anything itself; every visual effect
//! goes through the [`AnimationSurface`] trait.

pub mod cancel;
pub mod easing;
pub mod sequencer;
pub mod surface;
pub mod wave;

pub use cancel::CancellationHandle;
pub use easing::{ease, Interpolation};
pub use sequencer::{AnimationSequencer, SequencerEvent, SequencerPhase};
pub use surface::AnimationSurface;
pub use wave::{partition_waves, Wave, WaveTrigger};
