// SPDX-License-Identifier: MIT OR Apache-2.0
//! Slide deck data model for `DeckPlay`.
//!
//! This crate provides the read-only inputs of the player:
//! - Decks, slides and shells
//! - Elements (text, images, shapes, audio, countdown timers)
//! - Normalized animation steps
//! - Visible-slide navigation helpers
//! - Migration of legacy combined effect flags
//!
//! Decks are loaded from RON or JSON.

pub mod animation;
pub mod deck;
pub mod element;
pub mod legacy;
pub mod slide;

pub use animation::{AnimationStep, Category, Direction, Easing, Effect, StepId, Trigger};
pub use deck::{Deck, DeckError};
pub use element::{AudioProps, CountdownTimer, Element, ElementId, ElementKind, Frame, MediaId};
pub use legacy::LegacyEffectFlags;
pub use slide::{Shell, ShellId, ShellMode, ShellRef, Slide, SlideId};
