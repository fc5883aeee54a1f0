// SPDX-License-Identifier: MIT OR Apache-2.0
//! Slide elements and their type-specific properties.

use crate::legacy::LegacyEffectFlags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an element, shared across slides when an element is
/// carried from one slide to the next (continuing audio, countdown timers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Create a new random element ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a media-backed resource (audio clip, completion sound, image).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(pub String);

impl MediaId {
    /// Create a media ID from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position, size and rotation of an element on the slide canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge in canvas units
    pub x: f32,
    /// Top edge in canvas units
    pub y: f32,
    /// Width in canvas units
    pub width: f32,
    /// Height in canvas units
    pub height: f32,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }
}

/// Audio element properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProps {
    /// Audio clip to play
    pub media: MediaId,
    /// Start playing as soon as the slide is shown
    #[serde(default)]
    pub autoplay: bool,
    /// Restart from the beginning when the clip ends
    #[serde(default)]
    pub looping: bool,
    /// Keep playing across slide transitions instead of restarting
    #[serde(default)]
    pub continue_across_slides: bool,
    /// Volume (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl AudioProps {
    /// Create audio properties for a clip with default flags
    pub fn new(media: MediaId) -> Self {
        Self {
            media,
            autoplay: false,
            looping: false,
            continue_across_slides: false,
            volume: 1.0,
        }
    }
}

/// Countdown timer element properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTimer {
    /// Countdown length in seconds
    pub duration: u32,
    /// Sound played once when the countdown reaches zero
    #[serde(default)]
    pub sound: Option<MediaId>,
    /// Stop any running countdown instead of showing one
    #[serde(default)]
    pub clear: bool,
}

/// Type-specific element data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Text box
    Text {
        /// Text content
        content: String,
    },
    /// Image backed by a media resource
    Image {
        /// Image resource
        media: MediaId,
    },
    /// Basic shape
    Shape {
        /// Fill color (RGBA)
        fill: [u8; 4],
    },
    /// Container for child elements
    Group,
    /// Audio clip
    Audio(AudioProps),
    /// Countdown clock
    CountdownTimer(CountdownTimer),
}

/// An element on a slide or shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Stable element ID
    pub id: ElementId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Position and size
    #[serde(default)]
    pub frame: Frame,
    /// Type-specific properties
    pub kind: ElementKind,
    /// Child elements (groups)
    #[serde(default)]
    pub children: Vec<Element>,
    /// Combined effect word from older decks; converted into slide
    /// animation steps when the deck is loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_effects: Option<LegacyEffectFlags>,
}

impl Element {
    /// Create a new element with a fresh ID
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            frame: Frame::default(),
            kind,
            children: Vec::new(),
            legacy_effects: None,
        }
    }

    /// Set the element frame
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first iteration over this element and all of its descendants
    pub fn walk(&self) -> ElementWalk<'_> {
        ElementWalk { stack: vec![self] }
    }

    /// Find this element or a descendant by ID
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.walk().find(|e| e.id == id)
    }

    /// Audio properties if this is an audio element
    pub fn audio(&self) -> Option<&AudioProps> {
        match &self.kind {
            ElementKind::Audio(props) => Some(props),
            _ => None,
        }
    }

    /// Countdown properties if this is a countdown timer element
    pub fn countdown(&self) -> Option<&CountdownTimer> {
        match &self.kind {
            ElementKind::CountdownTimer(timer) => Some(timer),
            _ => None,
        }
    }
}

/// Depth-first, pre-order iterator returned by [`Element::walk`]
pub struct ElementWalk<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementWalk<'a> {
    /// Walk a list of sibling elements in order
    pub fn over(elements: &'a [Element]) -> Self {
        Self {
            stack: elements.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ElementWalk<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}
