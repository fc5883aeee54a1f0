// SPDX-License-Identifier: MIT OR Apache-2.0
//! The playback session: turns a static deck into a live, timed show.
//!
//! This module handles:
//! - Entering and leaving presentation mode
//! - Slide navigation over visible slides, with a terminal "ended" state
//! - Per-slide teardown and reconstruction of the sequencer, countdown,
//!   continuing audio and auto-advance timer, in a fixed order
//! - The unified `advance()` dispatch for presenter input
//!
//! Everything runs on one thread. Time only moves through [`PlaybackSession::update`].

use crate::auto_advance::AutoAdvanceTimer;
use crate::config::PlayerConfig;
use crate::continuing_audio::ContinuingAudioResource;
use crate::countdown::CountdownResource;
use crate::keymap::InputSignal;
use crate::media::MediaResolver;
use crate::surface::RenderSurface;
use deckplay_model::{Category, Deck, ElementId};
use deckplay_sequencer::{AnimationSequencer, CancellationHandle, SequencerEvent};
use std::sync::Arc;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not presenting (editor mode)
    #[default]
    Idle,
    /// Presenting
    Playing,
}

/// What the presentation is doing right now, while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubState {
    /// A wave's transitions are running
    Animating,
    /// A click-triggered wave is waiting for input
    WaitingForClick,
    /// All waves resolved; auto-advance may be armed
    Settled,
    /// The "presentation ended" screen is showing
    Ended,
}

/// Which shell the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Presentation mode
    Presentation,
    /// Editing mode
    Editor,
}

/// Notifications for the editing shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A slide became current
    SlideSelected(usize),
    /// An element's animation began
    AnimationStarted {
        /// Animated element
        element: ElementId,
        /// Entrance or exit
        category: Category,
    },
    /// An element's animation reached its resting state
    AnimationEnded {
        /// Animated element
        element: ElementId,
        /// Entrance or exit
        category: Category,
    },
    /// Presentation/editor mode switched
    ModeChanged(Mode),
    /// Navigation ran past the last visible slide
    PresentationEnded,
}

/// A live presentation of one deck
pub struct PlaybackSession<S: RenderSurface, M: MediaResolver> {
    deck: Arc<Deck>,
    surface: S,
    media: M,
    config: PlayerConfig,
    state: SessionState,
    current: Option<usize>,
    ended: bool,
    /// Seconds since the session started
    clock: f64,
    sequencer: AnimationSequencer,
    run: Option<CancellationHandle>,
    countdown: CountdownResource,
    audio: ContinuingAudioResource,
    auto_advance: AutoAdvanceTimer,
    /// Settlement of the current slide has been handled
    settled: bool,
    events: Vec<PlaybackEvent>,
}

impl<S: RenderSurface, M: MediaResolver> PlaybackSession<S, M> {
    /// Create an idle session owning its surface and media resolver
    pub fn new(deck: impl Into<Arc<Deck>>, surface: S, media: M, config: PlayerConfig) -> Self {
        let countdown = CountdownResource::new(config.countdown_tick);
        let audio = ContinuingAudioResource::new(config.audio_fade_out);
        Self {
            deck: deck.into(),
            surface,
            media,
            config,
            state: SessionState::Idle,
            current: None,
            ended: false,
            clock: 0.0,
            sequencer: AnimationSequencer::new(),
            run: None,
            countdown,
            audio,
            auto_advance: AutoAdvanceTimer::new(),
            settled: false,
            events: Vec::new(),
        }
    }

    /// Enter presentation mode and show the first slide.
    ///
    /// `from > 0` shows that slide even if it is hidden; otherwise the first
    /// visible slide is shown. With nothing to show the session stops again.
    pub fn start(&mut self, from: usize) {
        if self.state == SessionState::Playing {
            tracing::debug!("Presentation already running");
            return;
        }

        self.state = SessionState::Playing;
        self.clock = 0.0;
        if let Err(e) = self.surface.enter_presentation() {
            tracing::warn!("{e}; presenting in the current window");
        }
        self.events.push(PlaybackEvent::ModeChanged(Mode::Presentation));
        tracing::info!("Entered presentation mode for '{}'", self.deck.name);

        let target = if from > 0 {
            if from < self.deck.len() {
                Some(from)
            } else {
                tracing::warn!("Slide {from} does not exist; starting from the first visible slide");
                self.deck.first_visible()
            }
        } else {
            self.deck.first_visible()
        };

        match target {
            Some(index) => self.show_slide(index),
            None => {
                tracing::warn!("All slides are hidden; nothing to present");
                self.stop();
            }
        }
    }

    /// Tear down the current slide's resources and show slide `index`.
    ///
    /// Order: sequencer cleanup, auto-advance clear, continuing-audio
    /// relocation, countdown resolution, static render, countdown display,
    /// initial animation states, sequencer run, auto-advance on settlement.
    pub fn show_slide(&mut self, index: usize) {
        if self.state != SessionState::Playing {
            tracing::warn!("Ignoring show_slide({index}) while not presenting");
            return;
        }
        let deck = Arc::clone(&self.deck);
        let Some(slide) = deck.slide(index) else {
            tracing::warn!("Slide {index} does not exist");
            return;
        };

        self.sequencer.cleanup(&mut self.surface);
        self.run = None;
        self.auto_advance.clear(&mut self.surface);

        // The end screen keeps the last slide's container, audio included
        let outgoing = self.current.and_then(|i| deck.slide(i));
        self.audio.carry_over(outgoing, slide, &mut self.surface);
        let decision = self.countdown.begin_transition(slide, &mut self.surface);

        self.surface.clear_slide();
        let shell = slide.shell.and_then(|shell_ref| match deck.shell(shell_ref.shell) {
            Some(shell) => Some((shell, shell_ref.mode)),
            None => {
                tracing::warn!("Slide '{}' references a missing shell", slide.name);
                None
            }
        });
        self.surface.render_slide(slide, shell);
        self.countdown
            .present(decision, slide, self.clock, &mut self.surface, &mut self.media);

        self.current = Some(index);
        self.ended = false;
        self.settled = false;
        self.events.push(PlaybackEvent::SlideSelected(index));
        tracing::info!("Slide {} '{}'", index + 1, slide.name);

        self.sequencer.load(&slide.animations);
        self.sequencer.prepare_initial_state(&mut self.surface);
        self.run = Some(self.sequencer.play(&mut self.surface));
        self.after_sequencer_step();
    }

    /// Presenter input: skip the running wave, else release a click wave,
    /// else go to the next slide
    pub fn advance(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        if self.ended {
            if self.config.end_screen_exits {
                self.stop();
            }
            return;
        }

        if self.sequencer.is_playing() {
            self.sequencer.skip(&mut self.surface);
            self.after_sequencer_step();
        } else if self.sequencer.has_pending_steps() {
            self.sequencer.next(&mut self.surface);
            self.after_sequencer_step();
        } else {
            self.next_slide();
        }
    }

    /// Nearest visible slide after the current one, or the end screen
    pub fn next_slide(&mut self) {
        if self.state != SessionState::Playing || self.ended {
            return;
        }
        let next = match self.current {
            Some(current) => self.deck.next_visible(current),
            None => self.deck.first_visible(),
        };
        match next {
            Some(index) => self.show_slide(index),
            None => self.show_end_screen(),
        }
    }

    /// Nearest visible slide before the current one
    pub fn previous_slide(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        let previous = if self.ended {
            self.deck.last_visible()
        } else {
            self.current.and_then(|current| self.deck.previous_visible(current))
        };
        match previous {
            Some(index) => self.show_slide(index),
            None => tracing::debug!("Already at the first visible slide"),
        }
    }

    /// First visible slide
    pub fn first_slide(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(index) = self.deck.first_visible() {
            self.show_slide(index);
        }
    }

    /// Last visible slide
    pub fn last_slide(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(index) = self.deck.last_visible() {
            self.show_slide(index);
        }
    }

    /// Show slide `index` even if it is hidden
    pub fn goto(&mut self, index: usize) {
        self.show_slide(index);
    }

    /// Dispatch an abstract input signal
    pub fn handle_input(&mut self, signal: InputSignal) {
        tracing::debug!("Input: {:?}", signal);
        match signal {
            InputSignal::Advance => self.advance(),
            InputSignal::Previous => self.previous_slide(),
            InputSignal::First => self.first_slide(),
            InputSignal::Last => self.last_slide(),
            InputSignal::Exit => self.stop(),
            InputSignal::StartFrom(index) => match self.state {
                SessionState::Idle => self.start(index),
                SessionState::Playing => self.goto(index),
            },
        }
    }

    /// Advance session time by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.state != SessionState::Playing {
            return;
        }
        self.clock += f64::from(dt);
        self.countdown.update(dt, &mut self.surface);

        // A timer armed during this frame starts counting on the next one
        if self.auto_advance.update(dt, &mut self.surface) {
            tracing::debug!("Auto-advancing");
            self.next_slide();
            return;
        }

        self.sequencer.update(dt, &mut self.surface);
        self.after_sequencer_step();
    }

    /// The host lost the presentation surface (e.g. fullscreen was exited)
    pub fn surface_lost(&mut self) {
        if self.state == SessionState::Playing {
            tracing::warn!("Presentation surface lost; stopping");
            self.stop();
        }
    }

    /// Cancel every owned resource, leave presentation mode and return to the
    /// editor. Idempotent and safe from any sub-state.
    pub fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }

        self.sequencer.cleanup(&mut self.surface);
        self.run = None;
        self.auto_advance.clear(&mut self.surface);
        self.countdown.stop(&mut self.surface);
        self.audio.stop(&mut self.surface);
        self.surface.clear_slide();
        self.surface.exit_presentation();

        self.state = SessionState::Idle;
        self.current = None;
        self.ended = false;
        self.settled = false;
        self.events.push(PlaybackEvent::ModeChanged(Mode::Editor));
        tracing::info!("Exited presentation mode");
    }

    /// Session lifecycle
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is presenting
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Effective sub-state while presenting
    pub fn sub_state(&self) -> Option<SubState> {
        if self.state != SessionState::Playing {
            return None;
        }
        Some(if self.ended {
            SubState::Ended
        } else if self.sequencer.is_playing() {
            SubState::Animating
        } else if self.sequencer.has_pending_steps() {
            SubState::WaitingForClick
        } else {
            SubState::Settled
        })
    }

    /// Index of the current slide
    pub fn current_slide(&self) -> Option<usize> {
        self.current
    }

    /// Seconds since the session started
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Cancellation handle of the current animation run
    pub fn animation_handle(&self) -> Option<&CancellationHandle> {
        self.run.as_ref()
    }

    /// The presented deck
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The rendering surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The media resolver
    pub fn media(&self) -> &M {
        &self.media
    }

    /// Player settings
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The animation sequencer of the current slide
    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    /// The live countdown
    pub fn countdown(&self) -> &CountdownResource {
        &self.countdown
    }

    /// The continuing-audio relocation record
    pub fn continuing_audio(&self) -> &ContinuingAudioResource {
        &self.audio
    }

    /// The auto-advance timer
    pub fn auto_advance(&self) -> &AutoAdvanceTimer {
        &self.auto_advance
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    fn show_end_screen(&mut self) {
        self.sequencer.cleanup(&mut self.surface);
        self.run = None;
        self.auto_advance.clear(&mut self.surface);
        self.surface.show_end_screen();
        self.ended = true;
        self.events.push(PlaybackEvent::PresentationEnded);
    }

    /// Forward sequencer events and arm auto-advance once the slide settles
    fn after_sequencer_step(&mut self) {
        for event in self.sequencer.take_events() {
            match event {
                SequencerEvent::AnimationStarted { element, category } => {
                    self.events.push(PlaybackEvent::AnimationStarted { element, category });
                }
                SequencerEvent::AnimationEnded { element, category } => {
                    self.events.push(PlaybackEvent::AnimationEnded { element, category });
                }
                SequencerEvent::WaveSuspended { wave } => {
                    tracing::debug!("Waiting for input before wave {wave}");
                }
                SequencerEvent::Completed => {}
            }
        }

        if self.settled || self.ended || !self.sequencer.is_finished() {
            return;
        }
        self.settled = true;

        let Some(slide) = self.current.and_then(|i| self.deck.slide(i)) else {
            return;
        };
        if slide.auto_play {
            self.auto_advance.start(slide.auto_play_duration, &mut self.surface);
        }
    }
}
