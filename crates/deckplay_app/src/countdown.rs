// SPDX-License-Identifier: MIT OR Apache-2.0
//! The presentation-wide countdown clock.
//!
//! At most one countdown is live at a time. On every slide transition the
//! session resolves it against the incoming slide: clear it, replace it, or
//! inherit it unchanged so the clock keeps running across slides.

use crate::media::{MediaResolver, Sound};
use crate::surface::RenderSurface;
use deckplay_model::{CountdownTimer, ElementId, Slide};

/// Format remaining seconds for display.
///
/// `<= 0` → `"00"`, `>= 120` → whole minutes rounded up (`"3 m"`),
/// `60..120` → `"1:05"`, otherwise two-digit seconds.
pub fn format_time(seconds: i64) -> String {
    if seconds <= 0 {
        "00".to_string()
    } else if seconds >= 120 {
        format!("{} m", (seconds + 59) / 60)
    } else if seconds >= 60 {
        format!("1:{:02}", seconds - 60)
    } else {
        format!("{seconds:02}")
    }
}

/// Outcome of resolving the countdown against an incoming slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownDecision {
    /// The slide clears the countdown; nothing is shown
    Clear,
    /// The slide starts a different countdown from its element
    New(ElementId),
    /// Keep the running countdown (if any) and show it on the new slide
    Inherit,
}

/// Live countdown carry state
#[derive(Debug)]
struct CountdownState {
    element: ElementId,
    started_at: f64,
    duration: u32,
    remaining: u32,
    /// Time accumulated towards the next tick
    tick: f32,
    ticking: bool,
}

/// Owner of the single live countdown
pub struct CountdownResource {
    state: Option<CountdownState>,
    sound: Option<Box<dyn Sound>>,
    tick_period: f32,
}

impl CountdownResource {
    /// Create an idle resource decrementing once per `tick_period` seconds
    pub fn new(tick_period: f32) -> Self {
        Self {
            state: None,
            sound: None,
            tick_period: if tick_period > 0.0 { tick_period } else { 1.0 },
        }
    }

    /// Decide what happens to the countdown when `slide` is shown
    pub fn resolve_for_slide(&self, slide: &Slide) -> CountdownDecision {
        match slide.countdown() {
            Some((_, timer)) if timer.clear => CountdownDecision::Clear,
            Some((id, _)) if self.element() != Some(id) => CountdownDecision::New(id),
            _ => CountdownDecision::Inherit,
        }
    }

    /// First half of a transition, before the new slide is rendered:
    /// resolve the decision and stop the countdown it discards
    pub fn begin_transition(&mut self, slide: &Slide, surface: &mut dyn RenderSurface) -> CountdownDecision {
        let decision = self.resolve_for_slide(slide);
        tracing::debug!("Countdown decision for '{}': {:?}", slide.name, decision);
        match decision {
            CountdownDecision::Clear | CountdownDecision::New(_) => self.stop(surface),
            CountdownDecision::Inherit => {}
        }
        decision
    }

    /// Second half of a transition, after the new slide is rendered:
    /// start the new countdown or re-render the inherited one
    pub fn present(
        &mut self,
        decision: CountdownDecision,
        slide: &Slide,
        now: f64,
        surface: &mut dyn RenderSurface,
        media: &mut dyn MediaResolver,
    ) {
        match decision {
            CountdownDecision::Clear => {}
            CountdownDecision::New(id) => {
                if let Some((_, timer)) = slide.countdown().filter(|(found, _)| *found == id) {
                    self.start(id, timer, now, surface, media);
                }
            }
            CountdownDecision::Inherit => {
                if let Some(text) = self.formatted() {
                    surface.show_countdown(&text);
                }
            }
        }
    }

    /// Start a fresh countdown from `timer`, replacing any running one
    pub fn start(
        &mut self,
        element: ElementId,
        timer: &CountdownTimer,
        now: f64,
        surface: &mut dyn RenderSurface,
        media: &mut dyn MediaResolver,
    ) {
        self.stop(surface);

        if let Some(sound_id) = &timer.sound {
            match media.load_sound(sound_id) {
                Ok(sound) => self.sound = Some(sound),
                Err(e) => tracing::warn!("Countdown sound {} unavailable: {}", sound_id, e),
            }
        }

        self.state = Some(CountdownState {
            element,
            started_at: now,
            duration: timer.duration,
            remaining: timer.duration,
            tick: 0.0,
            ticking: timer.duration > 0,
        });
        surface.show_countdown(&format_time(i64::from(timer.duration)));
        tracing::info!("Countdown started: {}s", timer.duration);

        if timer.duration == 0 {
            self.complete();
        }
    }

    /// Advance the clock by `dt` seconds
    pub fn update(&mut self, dt: f32, surface: &mut dyn RenderSurface) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !state.ticking {
            return;
        }

        state.tick += dt.max(0.0);
        let mut reached_zero = false;
        while state.tick >= self.tick_period && state.remaining > 0 {
            state.tick -= self.tick_period;
            state.remaining -= 1;
            if state.remaining == 0 {
                state.ticking = false;
                reached_zero = true;
                break;
            }
        }
        surface.show_countdown(&format_time(i64::from(state.remaining)));

        if reached_zero {
            self.complete();
        }
    }

    /// Cancel the tick, release the sound and remove the display. Idempotent.
    pub fn stop(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(mut sound) = self.sound.take() {
            sound.stop();
        }
        if let Some(state) = self.state.take() {
            tracing::debug!("Countdown {} stopped with {}s remaining", state.element, state.remaining);
        }
        surface.remove_countdown();
    }

    /// Element of the live countdown
    pub fn element(&self) -> Option<ElementId> {
        self.state.as_ref().map(|s| s.element)
    }

    /// Seconds remaining on the live countdown
    pub fn remaining(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.remaining)
    }

    /// Original duration of the live countdown
    pub fn duration(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.duration)
    }

    /// Session time at which the live countdown started
    pub fn started_at(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.started_at)
    }

    /// Whether the clock is still ticking
    pub fn is_ticking(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.ticking)
    }

    /// Display text of the live countdown
    pub fn formatted(&self) -> Option<String> {
        self.remaining().map(|r| format_time(i64::from(r)))
    }

    /// Reached zero. Only called on the ticking -> stopped edge, so the
    /// completion sound plays exactly once; it stays owned until `stop()`.
    fn complete(&mut self) {
        tracing::info!("Countdown finished");
        if let Some(sound) = self.sound.as_mut() {
            sound.play();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::testing::FakeMedia;
    use deckplay_model::{Element, ElementKind, MediaId};

    fn countdown_slide(duration: u32, clear: bool) -> (Slide, ElementId) {
        let timer = CountdownTimer {
            duration,
            sound: Some(MediaId::new("bell.wav")),
            clear,
        };
        let element = Element::new("timer", ElementKind::CountdownTimer(timer));
        let id = element.id;
        (Slide::new("countdown").with_element(element), id)
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00");
        assert_eq!(format_time(-5), "00");
        assert_eq!(format_time(7), "07");
        assert_eq!(format_time(45), "45");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(119), "1:59");
        assert_eq!(format_time(120), "2 m");
        assert_eq!(format_time(150), "3 m");
    }

    #[test]
    fn test_resolve_decisions() {
        let mut surface = HeadlessSurface::new();
        let mut media = FakeMedia::default();
        let mut countdown = CountdownResource::new(1.0);
        let (slide, id) = countdown_slide(30, false);
        let (clearing, _) = countdown_slide(30, true);

        assert_eq!(countdown.resolve_for_slide(&Slide::new("plain")), CountdownDecision::Inherit);
        assert_eq!(countdown.resolve_for_slide(&slide), CountdownDecision::New(id));
        assert_eq!(countdown.resolve_for_slide(&clearing), CountdownDecision::Clear);

        let decision = countdown.begin_transition(&slide, &mut surface);
        surface.render_slide(&slide, None);
        countdown.present(decision, &slide, 0.0, &mut surface, &mut media);
        assert_eq!(countdown.element(), Some(id));

        // The same element again is inherited, not restarted
        assert_eq!(countdown.resolve_for_slide(&slide), CountdownDecision::Inherit);
    }

    #[test]
    fn test_ticks_down_and_plays_sound_once() {
        let mut surface = HeadlessSurface::new();
        let mut media = FakeMedia::default();
        let mut countdown = CountdownResource::new(1.0);
        let (slide, id) = countdown_slide(3, false);
        let (_, timer) = slide.countdown().unwrap();

        countdown.start(id, timer, 0.0, &mut surface, &mut media);
        assert_eq!(surface.countdown_text(), Some("03"));

        countdown.update(1.0, &mut surface);
        assert_eq!(countdown.remaining(), Some(2));
        assert_eq!(surface.countdown_text(), Some("02"));

        countdown.update(0.5, &mut surface);
        assert_eq!(countdown.remaining(), Some(2));

        countdown.update(5.0, &mut surface);
        assert_eq!(countdown.remaining(), Some(0));
        assert!(!countdown.is_ticking());
        assert_eq!(surface.countdown_text(), Some("00"));
        assert_eq!(media.plays(), 1);

        countdown.update(5.0, &mut surface);
        assert_eq!(media.plays(), 1);
    }

    #[test]
    fn test_failed_sound_is_not_fatal() {
        let mut surface = HeadlessSurface::new();
        let mut media = FakeMedia::failing();
        let mut countdown = CountdownResource::new(1.0);
        let (slide, id) = countdown_slide(1, false);
        let (_, timer) = slide.countdown().unwrap();

        countdown.start(id, timer, 0.0, &mut surface, &mut media);
        countdown.update(1.0, &mut surface);
        assert_eq!(countdown.remaining(), Some(0));
        assert_eq!(media.plays(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut surface = HeadlessSurface::new();
        let mut media = FakeMedia::default();
        let mut countdown = CountdownResource::new(1.0);
        let (slide, id) = countdown_slide(10, false);
        let (_, timer) = slide.countdown().unwrap();

        countdown.start(id, timer, 0.0, &mut surface, &mut media);
        countdown.stop(&mut surface);
        countdown.stop(&mut surface);
        assert!(countdown.element().is_none());
        assert!(surface.countdown_text().is_none());
        assert_eq!(media.stops(), 1);
    }
}
