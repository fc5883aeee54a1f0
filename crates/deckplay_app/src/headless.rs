// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory presentation surface.
//!
//! Tracks what a real renderer would show (element visual states, audio
//! handle parents, countdown text, progress bar) and logs every operation.
//! The `deckplay` binary presents through it, and the session tests inspect it.

use crate::error::SurfaceError;
use crate::surface::RenderSurface;
use deckplay_model::{AnimationStep, Category, ElementId, MediaId, Shell, ShellId, ShellMode, Slide, SlideId};
use deckplay_sequencer::AnimationSurface;
use std::collections::HashMap;

/// Visual state of one element on the current slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualState {
    /// Fully visible at its resting position
    Resting,
    /// Hidden/offset, waiting for its entrance
    Prepared,
    /// Mid-transition at the given eased progress
    Transition {
        /// Entrance or exit
        category: Category,
        /// Eased progress
        progress: f32,
    },
    /// Gone after an exit animation
    Exited,
}

/// Where an audio handle is parented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioParent {
    /// Inside the slide container with the given generation
    Slide(u64),
    /// Transition-stable parent that outlives slide containers
    Stable,
}

/// A live audio handle
#[derive(Debug, Clone, PartialEq)]
pub struct AudioHandle {
    /// Clip being played
    pub media: MediaId,
    /// Current parent
    pub parent: AudioParent,
    /// Creation counter; a new instance means playback restarted from zero
    pub instance: u64,
    /// Whether the clip is playing
    pub playing: bool,
}

/// Surface that renders into memory
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    presenting: bool,
    refuse_presentation: bool,
    container: u64,
    slide: Option<SlideId>,
    shell: Option<(ShellId, ShellMode)>,
    elements: HashMap<ElementId, VisualState>,
    running: HashMap<ElementId, Category>,
    audio: HashMap<ElementId, AudioHandle>,
    next_instance: u64,
    countdown: Option<String>,
    progress: Option<(f32, f32)>,
    end_screen: bool,
    ops: Vec<String>,
}

impl HeadlessSurface {
    /// Create an empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `enter_presentation` fail, as a host that refuses fullscreen would
    pub fn refuse_presentation(mut self) -> Self {
        self.refuse_presentation = true;
        self
    }

    /// Whether presentation mode is active
    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Slide currently rendered
    pub fn current_slide(&self) -> Option<SlideId> {
        self.slide
    }

    /// Shell rendered with the current slide
    pub fn current_shell(&self) -> Option<(ShellId, ShellMode)> {
        self.shell
    }

    /// Visual state of an element on the current slide
    pub fn visual(&self, element: ElementId) -> Option<VisualState> {
        self.elements.get(&element).copied()
    }

    /// Live audio handle of an element
    pub fn audio_handle(&self, element: ElementId) -> Option<&AudioHandle> {
        self.audio.get(&element)
    }

    /// Countdown text, if displayed
    pub fn countdown_text(&self) -> Option<&str> {
        self.countdown.as_deref()
    }

    /// Progress indicator as `(duration, fraction)`, if displayed
    pub fn progress(&self) -> Option<(f32, f32)> {
        self.progress
    }

    /// Whether the "presentation ended" screen is showing
    pub fn shows_end_screen(&self) -> bool {
        self.end_screen
    }

    /// Log of every operation, oldest first
    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    fn record(&mut self, op: String) {
        tracing::trace!("surface: {op}");
        self.ops.push(op);
    }
}

impl AnimationSurface for HeadlessSurface {
    fn prepare_initial_state(&mut self, step: &AnimationStep) -> bool {
        let Some(state) = self.elements.get_mut(&step.target) else {
            return false;
        };
        *state = VisualState::Prepared;
        self.record(format!("prepare {}", step.target));
        true
    }

    fn begin_transition(&mut self, step: &AnimationStep) -> bool {
        let Some(state) = self.elements.get_mut(&step.target) else {
            return false;
        };
        *state = VisualState::Transition {
            category: step.category,
            progress: 0.0,
        };
        self.running.insert(step.target, step.category);
        self.record(format!("begin {} {:?} {}", step.target, step.effect, step.category.name()));
        true
    }

    fn update_transition(&mut self, step: &AnimationStep, progress: f32) {
        if !self.running.contains_key(&step.target) {
            return;
        }
        if let Some(state) = self.elements.get_mut(&step.target) {
            *state = VisualState::Transition {
                category: step.category,
                progress,
            };
        }
    }

    fn finish_transition(&mut self, step: &AnimationStep) {
        self.running.remove(&step.target);
        if let Some(state) = self.elements.get_mut(&step.target) {
            *state = match step.category {
                Category::BuildIn => VisualState::Resting,
                Category::BuildOut => VisualState::Exited,
            };
        }
        self.record(format!("finish {}", step.target));
    }

    fn cancel_transition(&mut self, step: &AnimationStep) {
        if self.running.remove(&step.target).is_some() {
            self.record(format!("cancel {}", step.target));
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn enter_presentation(&mut self) -> Result<(), SurfaceError> {
        if self.refuse_presentation {
            return Err(SurfaceError::PresentationRefused("host denied fullscreen".into()));
        }
        self.presenting = true;
        self.record("enter presentation".into());
        Ok(())
    }

    fn exit_presentation(&mut self) {
        self.presenting = false;
        self.end_screen = false;
        self.record("exit presentation".into());
    }

    fn render_slide(&mut self, slide: &Slide, shell: Option<(&Shell, ShellMode)>) {
        self.container += 1;
        self.slide = Some(slide.id);
        self.shell = shell.map(|(s, mode)| (s.id, mode));
        self.end_screen = false;
        self.elements = slide.walk().map(|e| (e.id, VisualState::Resting)).collect();
        self.running.clear();

        for (id, props) in slide.audio_elements() {
            if self.audio.contains_key(&id) {
                // Carried over at the stable level; the slide does not restart it
                continue;
            }
            self.next_instance += 1;
            self.audio.insert(
                id,
                AudioHandle {
                    media: props.media.clone(),
                    parent: AudioParent::Slide(self.container),
                    instance: self.next_instance,
                    playing: props.autoplay,
                },
            );
        }

        tracing::info!("Showing slide '{}' ({} elements)", slide.name, self.elements.len());
        self.record(format!("render {}", slide.name));
    }

    fn clear_slide(&mut self) {
        let container = self.container;
        self.audio
            .retain(|_, handle| handle.parent != AudioParent::Slide(container));
        self.elements.clear();
        self.running.clear();
        self.countdown = None;
        self.slide = None;
        self.shell = None;
        self.record("clear slide".into());
    }

    fn relocate_audio(&mut self, element: ElementId) -> bool {
        let Some(handle) = self.audio.get_mut(&element) else {
            return false;
        };
        if !handle.playing {
            return false;
        }
        handle.parent = AudioParent::Stable;
        self.record(format!("relocate audio {element}"));
        true
    }

    fn dispose_audio(&mut self, element: ElementId, fade_out: f32) {
        if self.audio.remove(&element).is_some() {
            self.record(format!("dispose audio {element} fade {fade_out}"));
        }
    }

    fn show_countdown(&mut self, text: &str) {
        if self.countdown.as_deref() != Some(text) {
            tracing::debug!("Countdown: {text}");
        }
        self.countdown = Some(text.to_owned());
    }

    fn remove_countdown(&mut self) {
        if self.countdown.take().is_some() {
            self.record("remove countdown".into());
        }
    }

    fn show_progress(&mut self, duration: f32) {
        self.progress = Some((duration, 0.0));
        self.record(format!("show progress {duration}"));
    }

    fn update_progress(&mut self, fraction: f32) {
        if let Some((_, current)) = self.progress.as_mut() {
            *current = fraction.clamp(0.0, 1.0);
        }
    }

    fn remove_progress(&mut self) {
        if self.progress.take().is_some() {
            self.record("remove progress".into());
        }
    }

    fn show_end_screen(&mut self) {
        self.end_screen = true;
        self.elements.clear();
        self.slide = None;
        tracing::info!("Presentation ended");
        self.record("end screen".into());
    }
}
