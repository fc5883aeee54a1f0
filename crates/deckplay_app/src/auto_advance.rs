// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-slide delayed "go to next slide" trigger.

use crate::surface::RenderSurface;

#[derive(Debug, Clone, Copy)]
struct Pending {
    duration: f32,
    elapsed: f32,
}

/// Single pending auto-advance with a linear progress indicator
#[derive(Debug, Default)]
pub struct AutoAdvanceTimer {
    pending: Option<Pending>,
}

impl AutoAdvanceTimer {
    /// Create a disarmed timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for `duration` seconds, replacing any pending one.
    /// Non-positive durations leave the timer disarmed.
    pub fn start(&mut self, duration: f32, surface: &mut dyn RenderSurface) {
        self.clear(surface);
        if duration <= 0.0 || !duration.is_finite() {
            tracing::warn!("Ignoring auto-advance with invalid duration {duration}");
            return;
        }
        self.pending = Some(Pending { duration, elapsed: 0.0 });
        surface.show_progress(duration);
        tracing::debug!("Auto-advance armed for {duration}s");
    }

    /// Advance by `dt` seconds. Returns `true` exactly once, when the delay
    /// elapses; the timer is disarmed at that point.
    pub fn update(&mut self, dt: f32, surface: &mut dyn RenderSurface) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        pending.elapsed += dt.max(0.0);
        surface.update_progress((pending.elapsed / pending.duration).min(1.0));

        if pending.elapsed >= pending.duration {
            self.clear(surface);
            return true;
        }
        false
    }

    /// Cancel the pending trigger and remove the indicator. Idempotent.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        self.pending = None;
        surface.remove_progress();
    }

    /// Whether a trigger is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
