// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render-surface operations the sequencer orders and times.

use deckplay_model::AnimationStep;

/// Visual side of an animation run.
///
/// The sequencer never touches pixels. It only decides when each of these
/// calls happens; the implementation maps them onto whatever rendering layer
/// hosts the slide.
pub trait AnimationSurface {
    /// Put the step's target into its pre-animation state (hidden, offset, scaled).
    /// Returns `false` when the target element does not exist on the surface.
    fn prepare_initial_state(&mut self, step: &AnimationStep) -> bool;

    /// Start the transition from the prepared state towards the resting state.
    /// Returns `false` when the target element does not exist on the surface.
    fn begin_transition(&mut self, step: &AnimationStep) -> bool;

    /// Report eased progress (`0.0..=1.0`) of a running transition
    fn update_transition(&mut self, step: &AnimationStep, progress: f32);

    /// Commit the resting state immediately (natural end or skip)
    fn finish_transition(&mut self, step: &AnimationStep);

    /// Abandon a running transition, keeping whatever is already visible
    fn cancel_transition(&mut self, step: &AnimationStep);
}
