// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalized animation steps attached to a slide.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an animation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub Uuid);

impl StepId {
    /// Create a new random step ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// Entrance or exit animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Element enters the slide
    BuildIn,
    /// Element leaves the slide
    BuildOut,
}

impl Category {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildIn => "build-in",
            Self::BuildOut => "build-out",
        }
    }
}

/// What starts a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Starts automatically once the previous wave resolves
    OnLoad,
    /// Waits for an advance signal from the presenter
    OnClick,
    /// Runs together with the preceding triggering step
    WithPrevious,
}

/// Edge an effect moves from or towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left edge
    Left,
    /// Right edge
    Right,
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
}

/// Visual effect of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Instant visibility change
    Appear,
    /// Opacity transition
    Fade,
    /// Offset transition from (build-in) or towards (build-out) an edge
    Fly(Direction),
    /// Scale transition
    Zoom,
    /// Clip-reveal from/to an edge
    Wipe(Direction),
}

/// Timing curve applied to a step's progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Slow start
    EaseIn,
    /// Slow end
    #[default]
    EaseOut,
    /// Slow start and end
    EaseInOut,
    /// CSS-style cubic bezier control points `[x1, y1, x2, y2]`
    CubicBezier([f32; 4]),
}

/// One animation of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    /// Unique step ID
    pub id: StepId,
    /// Element animated by this step
    pub target: ElementId,
    /// Visual effect
    pub effect: Effect,
    /// Entrance or exit
    pub category: Category,
    /// What starts this step
    pub trigger: Trigger,
    /// Transition length in seconds
    pub duration: f32,
    /// Delay before the transition starts, in seconds
    #[serde(default)]
    pub delay: f32,
    /// Timing curve
    #[serde(default)]
    pub easing: Easing,
}

impl AnimationStep {
    /// Create a new step with default timing (0.5s, no delay, ease-out)
    pub fn new(target: ElementId, effect: Effect, category: Category, trigger: Trigger) -> Self {
        Self {
            id: StepId::new(),
            target,
            effect,
            category,
            trigger,
            duration: 0.5,
            delay: 0.0,
            easing: Easing::default(),
        }
    }

    /// Shorthand for a build-in step
    pub fn build_in(target: ElementId, effect: Effect, trigger: Trigger) -> Self {
        Self::new(target, effect, Category::BuildIn, trigger)
    }

    /// Shorthand for a build-out step
    pub fn build_out(target: ElementId, effect: Effect, trigger: Trigger) -> Self {
        Self::new(target, effect, Category::BuildOut, trigger)
    }

    /// Set duration and delay
    pub fn with_timing(mut self, duration: f32, delay: f32) -> Self {
        self.duration = duration.max(0.0);
        self.delay = delay.max(0.0);
        self
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Time from wave start until this step reaches its resting state
    pub fn end_time(&self) -> f32 {
        self.delay.max(0.0) + self.duration.max(0.0)
    }
}
