// SPDX-License-Identifier: MIT OR Apache-2.0
//! Slides and shells.

use crate::animation::AnimationStep;
use crate::element::{AudioProps, CountdownTimer, Element, ElementId, ElementWalk};
use crate::legacy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(pub Uuid);

impl SlideId {
    /// Create a new random slide ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShellId(pub Uuid);

impl ShellId {
    /// Create a new random shell ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShellId {
    fn default() -> Self {
        Self::new()
    }
}

/// Layer ordering of a shell relative to slide content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellMode {
    /// Shell is drawn behind the slide content
    #[default]
    Below,
    /// Shell is drawn over the slide content
    Above,
}

/// Reference from a slide to a shared shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellRef {
    /// Referenced shell
    pub shell: ShellId,
    /// Layer ordering
    #[serde(default)]
    pub mode: ShellMode,
}

/// Background layer shared between slides, rendered statically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    /// Unique shell ID
    pub id: ShellId,
    /// Shell name
    #[serde(default)]
    pub name: String,
    /// Shell elements
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Shell {
    /// Create an empty shell
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ShellId::new(),
            name: name.into(),
            elements: Vec::new(),
        }
    }
}

/// A slide in the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Unique slide ID
    pub id: SlideId,
    /// Slide name
    #[serde(default)]
    pub name: String,
    /// Top-level elements in paint order
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Hidden slides are skipped by linear navigation
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Optional background layer
    #[serde(default)]
    pub shell: Option<ShellRef>,
    /// Ordered animation steps
    #[serde(default)]
    pub animations: Vec<AnimationStep>,
    /// Advance to the next slide automatically once animations settle
    #[serde(default)]
    pub auto_play: bool,
    /// Seconds to wait before auto-advancing
    #[serde(default)]
    pub auto_play_duration: f32,
}

fn default_visible() -> bool {
    true
}

impl Slide {
    /// Create a new empty, visible slide
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SlideId::new(),
            name: name.into(),
            elements: Vec::new(),
            visible: true,
            shell: None,
            animations: Vec::new(),
            auto_play: false,
            auto_play_duration: 0.0,
        }
    }

    /// Add an element
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Add an animation step
    pub fn with_step(mut self, step: AnimationStep) -> Self {
        self.animations.push(step);
        self
    }

    /// Mark the slide hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Enable auto-advance after `seconds`
    pub fn with_auto_play(mut self, seconds: f32) -> Self {
        self.auto_play = true;
        self.auto_play_duration = seconds;
        self
    }

    /// Depth-first iteration over every element on the slide
    pub fn walk(&self) -> ElementWalk<'_> {
        ElementWalk::over(&self.elements)
    }

    /// Find an element anywhere in the slide tree
    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.walk().find(|e| e.id == id)
    }

    /// The slide's countdown timer element, if any (first one found)
    pub fn countdown(&self) -> Option<(ElementId, &CountdownTimer)> {
        self.walk()
            .find_map(|e| e.countdown().map(|timer| (e.id, timer)))
    }

    /// Convert legacy effect words on the slide's elements into animation
    /// steps appended after the existing ones. Returns the number of steps added.
    pub fn migrate_legacy_effects(&mut self) -> usize {
        let before = self.animations.len();
        legacy::migrate_elements(&mut self.elements, &mut self.animations);
        self.animations.len() - before
    }

    /// All audio elements on the slide
    pub fn audio_elements(&self) -> impl Iterator<Item = (ElementId, &AudioProps)> {
        self.walk().filter_map(|e| e.audio().map(|props| (e.id, props)))
    }
}
