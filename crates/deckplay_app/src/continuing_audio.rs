// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio that keeps playing across slide transitions.
//!
//! Rebuilding the slide container would restart every audio element in it.
//! Audio flagged `continue_across_slides` is therefore moved to a
//! transition-stable parent *before* the outgoing container is destroyed,
//! and only disposed when the incoming slide takes over playback itself.

use crate::surface::RenderSurface;
use deckplay_model::{ElementId, Slide};

/// What happened to the carried audio during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCarry {
    /// Nothing is being carried
    Idle,
    /// The handle stays at the stable level and keeps playing
    Kept(ElementId),
    /// The handle was faded out because the incoming slide takes over
    Disposed(ElementId),
}

/// Relocation record for the continuing audio handle
#[derive(Debug)]
pub struct ContinuingAudioResource {
    carried: Option<ElementId>,
    fade_out: f32,
}

impl ContinuingAudioResource {
    /// Create an idle resource; disposed handles fade out over `fade_out` seconds
    pub fn new(fade_out: f32) -> Self {
        Self {
            carried: None,
            fade_out: fade_out.max(0.0),
        }
    }

    /// Element whose handle is parented at the stable level
    pub fn carried(&self) -> Option<ElementId> {
        self.carried
    }

    /// Relocate continuing audio out of `outgoing`, then decide whether it
    /// survives `incoming`. Must run before the outgoing container is cleared.
    pub fn carry_over(
        &mut self,
        outgoing: Option<&Slide>,
        incoming: &Slide,
        surface: &mut dyn RenderSurface,
    ) -> AudioCarry {
        if let Some(outgoing) = outgoing {
            self.relocate_from(outgoing, surface);
        }

        let Some(id) = self.carried else {
            return AudioCarry::Idle;
        };

        let redefined = incoming.find_element(id).is_some_and(|e| e.audio().is_some());
        let competing = incoming
            .audio_elements()
            .any(|(other, props)| other != id && props.autoplay);

        if redefined || competing {
            tracing::debug!(
                "Slide '{}' takes over audio (redefined: {}, competing: {})",
                incoming.name,
                redefined,
                competing
            );
            self.dispose(surface);
            AudioCarry::Disposed(id)
        } else {
            tracing::debug!("Audio {} continues into slide '{}'", id, incoming.name);
            AudioCarry::Kept(id)
        }
    }

    /// Fade out and release the carried handle. Idempotent.
    pub fn stop(&mut self, surface: &mut dyn RenderSurface) {
        self.dispose(surface);
    }

    fn relocate_from(&mut self, outgoing: &Slide, surface: &mut dyn RenderSurface) {
        let continuing: Vec<ElementId> = outgoing
            .audio_elements()
            .filter(|(_, props)| props.continue_across_slides)
            .map(|(id, _)| id)
            .collect();

        for id in continuing {
            if Some(id) == self.carried {
                continue;
            }
            if !surface.relocate_audio(id) {
                continue;
            }
            tracing::debug!("Relocated audio {} to the stable layer", id);
            // A newer continuing clip replaces the one carried so far
            self.dispose(surface);
            self.carried = Some(id);
        }
    }

    fn dispose(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(id) = self.carried.take() {
            surface.dispose_audio(id, self.fade_out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{AudioParent, HeadlessSurface};
    use deckplay_model::{AudioProps, Element, ElementKind, MediaId};

    fn music(continuing: bool, autoplay: bool) -> Element {
        let mut props = AudioProps::new(MediaId::new("music.ogg"));
        props.autoplay = autoplay;
        props.continue_across_slides = continuing;
        Element::new("music", ElementKind::Audio(props))
    }

    fn transition(
        audio: &mut ContinuingAudioResource,
        surface: &mut HeadlessSurface,
        from: &Slide,
        to: &Slide,
    ) -> AudioCarry {
        let carry = audio.carry_over(Some(from), to, surface);
        surface.clear_slide();
        surface.render_slide(to, None);
        carry
    }

    #[test]
    fn test_continues_into_plain_slide() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let element = music(true, true);
        let id = element.id;
        let first = Slide::new("first").with_element(element);
        let second = Slide::new("second");
        let third = Slide::new("third");

        surface.render_slide(&first, None);
        let instance = surface.audio_handle(id).unwrap().instance;

        assert_eq!(transition(&mut audio, &mut surface, &first, &second), AudioCarry::Kept(id));
        assert_eq!(transition(&mut audio, &mut surface, &second, &third), AudioCarry::Kept(id));

        let handle = surface.audio_handle(id).unwrap();
        assert_eq!(handle.instance, instance);
        assert_eq!(handle.parent, AudioParent::Stable);
        assert!(handle.playing);
    }

    #[test]
    fn test_redefined_audio_is_disposed() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let element = music(true, true);
        let id = element.id;
        let first = Slide::new("first").with_element(element.clone());
        let second = Slide::new("second").with_element(element);

        surface.render_slide(&first, None);
        assert_eq!(transition(&mut audio, &mut surface, &first, &second), AudioCarry::Disposed(id));
        assert!(audio.carried().is_none());
        assert!(surface.ops().iter().any(|op| op.starts_with("dispose audio")));
    }

    #[test]
    fn test_competing_autoplay_is_disposed() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let element = music(true, true);
        let id = element.id;
        let first = Slide::new("first").with_element(element);
        let second = Slide::new("second").with_element(music(false, true));

        surface.render_slide(&first, None);
        assert_eq!(transition(&mut audio, &mut surface, &first, &second), AudioCarry::Disposed(id));
        assert!(surface.audio_handle(id).is_none());
    }

    #[test]
    fn test_non_continuing_audio_is_not_carried() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let first = Slide::new("first").with_element(music(false, true));

        surface.render_slide(&first, None);
        assert_eq!(transition(&mut audio, &mut surface, &first, &Slide::new("next")), AudioCarry::Idle);
    }

    #[test]
    fn test_relocation_happens_before_clear() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let first = Slide::new("first").with_element(music(true, true));

        surface.render_slide(&first, None);
        transition(&mut audio, &mut surface, &first, &Slide::new("next"));

        let ops = surface.ops();
        let relocate = ops.iter().position(|op| op.starts_with("relocate audio")).unwrap();
        let clear = ops.iter().position(|op| op == "clear slide").unwrap();
        assert!(relocate < clear);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut surface = HeadlessSurface::new();
        let mut audio = ContinuingAudioResource::new(0.5);
        let element = music(true, true);
        let id = element.id;
        let first = Slide::new("first").with_element(element);

        surface.render_slide(&first, None);
        transition(&mut audio, &mut surface, &first, &Slide::new("next"));
        audio.stop(&mut surface);
        audio.stop(&mut surface);
        assert!(surface.audio_handle(id).is_none());
    }
}
