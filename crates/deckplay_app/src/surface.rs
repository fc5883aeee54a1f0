// SPDX-License-Identifier: MIT OR Apache-2.0
//! The presentation surface seam.
//!
//! The playback core orders and times surface calls; it never draws. A
//! browser, a GPU window or the [`HeadlessSurface`](crate::headless::HeadlessSurface)
//! can sit behind this trait.

use crate::error::SurfaceError;
use deckplay_model::{ElementId, Shell, ShellMode, Slide};
use deckplay_sequencer::AnimationSurface;

/// Everything the playback session asks of the rendering layer
pub trait RenderSurface: AnimationSurface {
    /// Enter fullscreen-like presentation mode
    fn enter_presentation(&mut self) -> Result<(), SurfaceError>;

    /// Leave presentation mode and return to the editor
    fn exit_presentation(&mut self);

    /// Build the static visual tree of `slide` in a fresh slide container,
    /// with its shell drawn below or above the content
    fn render_slide(&mut self, slide: &Slide, shell: Option<(&Shell, ShellMode)>);

    /// Destroy the current slide container and everything still parented to it
    fn clear_slide(&mut self);

    /// Move the live audio handle of `element` from the slide container to the
    /// transition-stable parent. The handle must stay attached while moving.
    /// Returns `false` if there is no live handle for `element`.
    fn relocate_audio(&mut self, element: ElementId) -> bool;

    /// Fade out and dispose the stable-level audio handle of `element`
    fn dispose_audio(&mut self, element: ElementId, fade_out: f32);

    /// Show (or replace) the countdown display in the current slide
    fn show_countdown(&mut self, text: &str);

    /// Remove the countdown display
    fn remove_countdown(&mut self);

    /// Show a linear auto-advance progress indicator for `duration` seconds
    fn show_progress(&mut self, duration: f32);

    /// Update the progress indicator (`0.0..=1.0`)
    fn update_progress(&mut self, fraction: f32);

    /// Remove the progress indicator
    fn remove_progress(&mut self);

    /// Show the terminal "presentation ended" screen
    fn show_end_screen(&mut self);
}
