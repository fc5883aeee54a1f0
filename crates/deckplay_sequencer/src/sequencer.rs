// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wave-based execution of one slide's animation steps.

use crate::cancel::CancellationHandle;
use crate::easing::ease;
use crate::surface::AnimationSurface;
use crate::wave::{partition_waves, Wave, WaveTrigger};
use deckplay_model::{AnimationStep, Category, ElementId};
use std::collections::HashSet;

/// Sequencer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerPhase {
    /// Nothing loaded
    #[default]
    Unloaded,
    /// Waves loaded, `play()` not called yet
    Ready,
    /// A wave's transitions are running
    Animating,
    /// Suspended on a click-triggered wave
    WaitingForClick,
    /// Every wave resolved
    Finished,
}

/// Notifications emitted while running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A step's transition began
    AnimationStarted {
        /// Animated element
        element: ElementId,
        /// Entrance or exit
        category: Category,
    },
    /// A step reached its resting state (naturally or skipped)
    AnimationEnded {
        /// Animated element
        element: ElementId,
        /// Entrance or exit
        category: Category,
    },
    /// Execution stopped in front of a click-triggered wave
    WaveSuspended {
        /// Index of the suspended wave
        wave: usize,
    },
    /// All waves resolved
    Completed,
}

/// A step of the current wave whose transition has begun
#[derive(Debug, Clone)]
struct ActiveStep {
    step: AnimationStep,
    finished: bool,
}

impl ActiveStep {
    fn progress(&self, elapsed: f32) -> f32 {
        let local = elapsed - self.step.delay.max(0.0);
        if self.step.duration <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.step.duration).clamp(0.0, 1.0)
    }
}

/// Executes one slide's animation sequence wave by wave.
///
/// Waves run strictly in order and never overlap. Steps inside a wave run
/// concurrently. Time only moves when the host calls [`update`](Self::update);
/// the sequencer yields at exactly two points: while a wave's transitions run,
/// and in front of a click-triggered wave until [`next`](Self::next) is called.
#[derive(Debug, Default)]
pub struct AnimationSequencer {
    waves: Vec<Wave>,
    cursor: usize,
    phase: SequencerPhase,
    active: Vec<ActiveStep>,
    elapsed: f32,
    handle: Option<CancellationHandle>,
    events: Vec<SequencerEvent>,
}

impl AnimationSequencer {
    /// Create an unloaded sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition `sequence` into waves and get ready to play.
    /// Returns the number of waves; zero means the slide stays static.
    pub fn load(&mut self, sequence: &[AnimationStep]) -> usize {
        if !self.active.is_empty() {
            tracing::warn!("Loading a new sequence over {} running transitions", self.active.len());
            self.active.clear();
        }
        self.waves = partition_waves(sequence);
        self.cursor = 0;
        self.elapsed = 0.0;
        self.phase = SequencerPhase::Ready;
        tracing::debug!("Loaded {} steps into {} waves", sequence.len(), self.waves.len());
        self.waves.len()
    }

    /// Put every build-in target into its pre-animation state before any wave
    /// runs, so nothing flashes fully visible before its entrance.
    pub fn prepare_initial_state(&mut self, surface: &mut dyn AnimationSurface) {
        let mut prepared = HashSet::new();
        for step in self.waves.iter().flat_map(|w| w.steps.iter()) {
            if step.category != Category::BuildIn || !prepared.insert(step.target) {
                continue;
            }
            if !surface.prepare_initial_state(step) {
                tracing::debug!("Build-in target {} is not on the surface, skipping", step.target);
            }
        }
    }

    /// Start running waves from the first one.
    ///
    /// The returned handle is checked at every wave boundary and every update;
    /// cancelling it has the same effect as [`cleanup`](Self::cleanup).
    pub fn play(&mut self, surface: &mut dyn AnimationSurface) -> CancellationHandle {
        if let Some(previous) = self.handle.take() {
            previous.cancel();
        }
        let handle = CancellationHandle::new();
        self.handle = Some(handle.clone());
        self.cursor = 0;
        self.run_waves(surface);
        handle
    }

    /// Advance the running wave by `dt` seconds
    pub fn update(&mut self, dt: f32, surface: &mut dyn AnimationSurface) {
        if self.is_cancelled() {
            self.cleanup(surface);
            return;
        }
        if self.phase != SequencerPhase::Animating {
            return;
        }

        self.elapsed += dt.max(0.0);
        let elapsed = self.elapsed;
        for active in self.active.iter_mut().filter(|a| !a.finished) {
            let progress = active.progress(elapsed);
            surface.update_transition(&active.step, ease(active.step.easing, progress));
            if elapsed >= active.step.end_time() {
                surface.finish_transition(&active.step);
                active.finished = true;
                self.events.push(SequencerEvent::AnimationEnded {
                    element: active.step.target,
                    category: active.step.category,
                });
            }
        }

        if self.active.iter().all(|a| a.finished) {
            let wave_end = self.active.iter().map(|a| a.step.end_time()).fold(0.0, f32::max);
            let overshoot = elapsed - wave_end;
            self.active.clear();
            self.cursor += 1;
            self.run_waves(surface);

            // Frame time left over belongs to the wave that just started
            if overshoot > 0.0 && self.phase == SequencerPhase::Animating {
                self.update(overshoot, surface);
            }
        }
    }

    /// Force the running wave to its end state and start the next wave.
    /// Returns `false` (and does nothing) when no wave is animating.
    pub fn skip(&mut self, surface: &mut dyn AnimationSurface) -> bool {
        if self.phase != SequencerPhase::Animating {
            return false;
        }
        tracing::debug!("Skipping wave {}", self.cursor);
        self.finish_active(surface);
        self.cursor += 1;
        self.run_waves(surface);
        true
    }

    /// Release a click-suspended wave.
    /// Returns `false` (and does nothing) unless waiting for a click.
    pub fn next(&mut self, surface: &mut dyn AnimationSurface) -> bool {
        if self.phase != SequencerPhase::WaitingForClick {
            return false;
        }
        tracing::debug!("Releasing click wave {}", self.cursor);
        if !self.start_wave(surface) {
            self.cursor += 1;
            self.run_waves(surface);
        }
        true
    }

    /// Cancel in-flight transitions without committing their end state,
    /// cancel the run handle and return to the unloaded state. Idempotent.
    pub fn cleanup(&mut self, surface: &mut dyn AnimationSurface) {
        for active in self.active.drain(..).filter(|a| !a.finished) {
            surface.cancel_transition(&active.step);
        }
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.waves.clear();
        self.cursor = 0;
        self.elapsed = 0.0;
        self.phase = SequencerPhase::Unloaded;
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    /// True only while a wave's transitions are running
    pub fn is_playing(&self) -> bool {
        self.phase == SequencerPhase::Animating
    }

    /// True while suspended in front of a click-triggered wave
    pub fn has_pending_steps(&self) -> bool {
        self.phase == SequencerPhase::WaitingForClick
    }

    /// True once every wave resolved
    pub fn is_finished(&self) -> bool {
        self.phase == SequencerPhase::Finished
    }

    /// Loaded waves
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Index of the wave that is running or waiting
    pub fn current_wave(&self) -> Option<usize> {
        matches!(self.phase, SequencerPhase::Animating | SequencerPhase::WaitingForClick)
            .then_some(self.cursor)
    }

    fn is_cancelled(&self) -> bool {
        self.handle.as_ref().is_some_and(CancellationHandle::is_cancelled)
    }

    /// Run waves from the cursor until one animates, one suspends, or none remain
    fn run_waves(&mut self, surface: &mut dyn AnimationSurface) {
        loop {
            if self.is_cancelled() {
                self.cleanup(surface);
                return;
            }
            let Some(wave) = self.waves.get(self.cursor) else {
                self.phase = SequencerPhase::Finished;
                self.events.push(SequencerEvent::Completed);
                tracing::debug!("Animation sequence completed");
                return;
            };
            if wave.trigger == WaveTrigger::Click {
                self.phase = SequencerPhase::WaitingForClick;
                self.events.push(SequencerEvent::WaveSuspended { wave: self.cursor });
                return;
            }
            if self.start_wave(surface) {
                return;
            }
            self.cursor += 1;
        }
    }

    /// Begin every step of the wave at the cursor.
    /// Returns `true` if transitions are now running, `false` if the wave
    /// resolved on the spot (missing targets, zero-length steps).
    fn start_wave(&mut self, surface: &mut dyn AnimationSurface) -> bool {
        self.elapsed = 0.0;
        self.active.clear();

        let steps = self.waves[self.cursor].steps.clone();
        for step in steps {
            if !surface.begin_transition(&step) {
                tracing::debug!("Animation target {} is missing, skipping step", step.target);
                continue;
            }
            self.events.push(SequencerEvent::AnimationStarted {
                element: step.target,
                category: step.category,
            });
            self.active.push(ActiveStep { step, finished: false });
        }

        if self.active.iter().all(|a| a.step.end_time() <= 0.0) {
            self.finish_active(surface);
            return false;
        }
        self.phase = SequencerPhase::Animating;
        true
    }

    fn finish_active(&mut self, surface: &mut dyn AnimationSurface) {
        for active in self.active.drain(..).filter(|a| !a.finished) {
            surface.finish_transition(&active.step);
            self.events.push(SequencerEvent::AnimationEnded {
                element: active.step.target,
                category: active.step.category,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckplay_model::{Effect, Trigger};
    use std::collections::HashMap;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Visual {
        Prepared,
        Moving(f32),
        Resting,
        Cancelled,
    }

    #[derive(Default)]
    struct RecordingSurface {
        visuals: HashMap<ElementId, Visual>,
        missing: HashSet<ElementId>,
        begun: Vec<ElementId>,
    }

    impl AnimationSurface for RecordingSurface {
        fn prepare_initial_state(&mut self, step: &AnimationStep) -> bool {
            if self.missing.contains(&step.target) {
                return false;
            }
            self.visuals.insert(step.target, Visual::Prepared);
            true
        }

        fn begin_transition(&mut self, step: &AnimationStep) -> bool {
            if self.missing.contains(&step.target) {
                return false;
            }
            self.begun.push(step.target);
            self.visuals.insert(step.target, Visual::Moving(0.0));
            true
        }

        fn update_transition(&mut self, step: &AnimationStep, progress: f32) {
            self.visuals.insert(step.target, Visual::Moving(progress));
        }

        fn finish_transition(&mut self, step: &AnimationStep) {
            self.visuals.insert(step.target, Visual::Resting);
        }

        fn cancel_transition(&mut self, step: &AnimationStep) {
            self.visuals.insert(step.target, Visual::Cancelled);
        }
    }

    fn step(trigger: Trigger, duration: f32) -> AnimationStep {
        AnimationStep::build_in(ElementId::new(), Effect::Fade, trigger).with_timing(duration, 0.0)
    }

    #[test]
    fn test_empty_sequence_completes_immediately() {
        let mut surface = RecordingSurface::default();
        let mut seq = AnimationSequencer::new();
        assert_eq!(seq.load(&[]), 0);
        seq.play(&mut surface);
        assert!(seq.is_finished());
        assert_eq!(seq.take_events(), vec![SequencerEvent::Completed]);
    }

    #[test]
    fn test_prepare_hides_build_in_targets_only() {
        let mut surface = RecordingSurface::default();
        let entrance = step(Trigger::OnLoad, 1.0);
        let exit = AnimationStep::build_out(ElementId::new(), Effect::Fade, Trigger::OnClick);
        let mut seq = AnimationSequencer::new();
        seq.load(&[entrance.clone(), exit.clone()]);
        seq.prepare_initial_state(&mut surface);

        assert_eq!(surface.visuals.get(&entrance.target), Some(&Visual::Prepared));
        assert!(!surface.visuals.contains_key(&exit.target));
    }

    #[test]
    fn test_waves_run_in_order() {
        let mut surface = RecordingSurface::default();
        let first = step(Trigger::OnLoad, 1.0);
        let rider = step(Trigger::WithPrevious, 0.5);
        let second = step(Trigger::OnLoad, 1.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[first.clone(), rider.clone(), second.clone()]);
        seq.play(&mut surface);

        assert!(seq.is_playing());
        assert_eq!(surface.begun, vec![first.target, rider.target]);

        seq.update(0.6, &mut surface);
        // Rider is done, the wave is not
        assert_eq!(surface.visuals[&rider.target], Visual::Resting);
        assert_eq!(seq.current_wave(), Some(0));
        assert!(!surface.begun.contains(&second.target));

        seq.update(0.5, &mut surface);
        assert_eq!(surface.visuals[&first.target], Visual::Resting);
        assert_eq!(seq.current_wave(), Some(1));
        assert!(surface.begun.contains(&second.target));

        seq.update(1.0, &mut surface);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_long_frame_carries_into_next_wave() {
        let mut surface = RecordingSurface::default();
        let first = step(Trigger::OnLoad, 1.0);
        let second = step(Trigger::OnLoad, 1.0);
        let third = step(Trigger::OnLoad, 1.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[first.clone(), second.clone(), third.clone()]);
        seq.play(&mut surface);

        seq.update(1.5, &mut surface);
        assert_eq!(surface.visuals[&first.target], Visual::Resting);
        assert_eq!(seq.current_wave(), Some(1));
        assert!(matches!(surface.visuals[&second.target], Visual::Moving(p) if p > 0.0));

        // One frame spanning the rest of the second wave and all of the third
        seq.update(1.5, &mut surface);
        assert_eq!(surface.visuals[&second.target], Visual::Resting);
        assert_eq!(surface.visuals[&third.target], Visual::Resting);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_click_wave_waits_for_next() {
        let mut surface = RecordingSurface::default();
        let auto = step(Trigger::OnLoad, 1.0);
        let click = step(Trigger::OnClick, 1.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[auto.clone(), click.clone()]);
        seq.play(&mut surface);

        // Skipping the auto wave lands on the click wave without starting it
        assert!(seq.skip(&mut surface));
        assert!(seq.has_pending_steps());
        assert!(!seq.is_playing());

        for _ in 0..5 {
            assert!(!seq.skip(&mut surface));
            seq.update(10.0, &mut surface);
        }
        assert!(!surface.begun.contains(&click.target));

        assert!(seq.next(&mut surface));
        assert!(seq.is_playing());
        assert!(surface.begun.contains(&click.target));

        // Released waves are skippable like any other
        assert!(seq.skip(&mut surface));
        assert_eq!(surface.visuals[&click.target], Visual::Resting);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_skip_is_noop_when_idle() {
        let mut surface = RecordingSurface::default();
        let mut seq = AnimationSequencer::new();
        assert!(!seq.skip(&mut surface));
        seq.load(&[step(Trigger::OnClick, 1.0)]);
        seq.play(&mut surface);
        assert!(!seq.skip(&mut surface));
        assert!(seq.has_pending_steps());
    }

    #[test]
    fn test_skip_resolves_every_target() {
        let mut surface = RecordingSurface::default();
        let steps = vec![
            step(Trigger::OnLoad, 2.0),
            step(Trigger::WithPrevious, 3.0),
            step(Trigger::WithPrevious, 1.0),
        ];
        let mut seq = AnimationSequencer::new();
        seq.load(&steps);
        seq.play(&mut surface);
        seq.update(0.1, &mut surface);

        assert!(seq.skip(&mut surface));
        assert!(steps.iter().all(|s| surface.visuals[&s.target] == Visual::Resting));
        let ended = seq
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, SequencerEvent::AnimationEnded { .. }))
            .count();
        assert_eq!(ended, 3);
    }

    #[test]
    fn test_next_is_noop_unless_waiting() {
        let mut surface = RecordingSurface::default();
        let mut seq = AnimationSequencer::new();
        seq.load(&[step(Trigger::OnLoad, 1.0)]);
        seq.play(&mut surface);
        assert!(!seq.next(&mut surface));
        assert!(seq.is_playing());
    }

    #[test]
    fn test_progress_respects_delay_and_easing() {
        let mut surface = RecordingSurface::default();
        let delayed = AnimationStep::build_in(ElementId::new(), Effect::Fade, Trigger::OnLoad)
            .with_timing(1.0, 1.0)
            .with_easing(deckplay_model::Easing::Linear);
        let mut seq = AnimationSequencer::new();
        seq.load(&[delayed.clone()]);
        seq.play(&mut surface);

        seq.update(0.5, &mut surface);
        assert_eq!(surface.visuals[&delayed.target], Visual::Moving(0.0));
        seq.update(1.0, &mut surface);
        assert_eq!(surface.visuals[&delayed.target], Visual::Moving(0.5));
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let mut surface = RecordingSurface::default();
        let ghost = step(Trigger::OnLoad, 1.0);
        surface.missing.insert(ghost.target);
        let real = step(Trigger::OnLoad, 1.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[ghost, real.clone()]);
        seq.play(&mut surface);

        assert!(seq.is_playing());
        assert_eq!(surface.begun, vec![real.target]);
    }

    #[test]
    fn test_zero_length_waves_resolve_on_the_spot() {
        let mut surface = RecordingSurface::default();
        let mut seq = AnimationSequencer::new();
        seq.load(&[step(Trigger::OnLoad, 0.0), step(Trigger::OnLoad, 0.0)]);
        seq.play(&mut surface);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_cleanup_mid_wave_cancels_without_committing() {
        let mut surface = RecordingSurface::default();
        let running = step(Trigger::OnLoad, 2.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[running.clone(), step(Trigger::OnLoad, 1.0)]);
        let handle = seq.play(&mut surface);
        seq.update(0.5, &mut surface);

        seq.cleanup(&mut surface);
        assert_eq!(surface.visuals[&running.target], Visual::Cancelled);
        assert_eq!(seq.phase(), SequencerPhase::Unloaded);
        assert!(handle.is_cancelled());

        // Idempotent
        seq.cleanup(&mut surface);
        assert_eq!(seq.phase(), SequencerPhase::Unloaded);
    }

    #[test]
    fn test_external_cancellation_is_honoured_on_update() {
        let mut surface = RecordingSurface::default();
        let running = step(Trigger::OnLoad, 2.0);
        let mut seq = AnimationSequencer::new();
        seq.load(&[running.clone()]);
        let handle = seq.play(&mut surface);

        handle.cancel();
        seq.update(0.1, &mut surface);
        assert_eq!(seq.phase(), SequencerPhase::Unloaded);
        assert_eq!(surface.visuals[&running.target], Visual::Cancelled);
    }
}
