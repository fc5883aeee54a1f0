// SPDX-License-Identifier: MIT OR Apache-2.0
//! The deck: an ordered list of slides plus the shells they reference.

use crate::slide::{Shell, ShellId, Slide};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading or saving a deck
#[derive(Debug, Error)]
pub enum DeckError {
    /// RON parse error
    #[error("Invalid deck RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize deck: {0}")]
    RonSerialize(#[from] ron::Error),

    /// JSON parse error
    #[error("Invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is neither `ron` nor `json`
    #[error("Unknown deck format: {0}")]
    UnknownFormat(PathBuf),
}

/// Result type for deck operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// A slide deck, consumed read-only by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Unique deck ID
    pub id: Uuid,
    /// Deck title
    #[serde(default)]
    pub name: String,
    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Shells referenced by slides
    #[serde(default)]
    pub shells: IndexMap<ShellId, Shell>,
}

impl Deck {
    /// Create an empty deck
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slides: Vec::new(),
            shells: IndexMap::new(),
        }
    }

    /// Append a slide
    pub fn with_slide(mut self, slide: Slide) -> Self {
        self.slides.push(slide);
        self
    }

    /// Register a shell
    pub fn add_shell(&mut self, shell: Shell) -> ShellId {
        let id = shell.id;
        self.shells.insert(id, shell);
        id
    }

    /// Number of slides (including hidden ones)
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide at `index`
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Resolve a shell reference
    pub fn shell(&self, id: ShellId) -> Option<&Shell> {
        self.shells.get(&id)
    }

    /// Index of the first visible slide
    pub fn first_visible(&self) -> Option<usize> {
        self.slides.iter().position(|s| s.visible)
    }

    /// Index of the last visible slide
    pub fn last_visible(&self) -> Option<usize> {
        self.slides.iter().rposition(|s| s.visible)
    }

    /// Nearest visible slide strictly after `from`
    pub fn next_visible(&self, from: usize) -> Option<usize> {
        let start = from.checked_add(1)?;
        self.slides
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, s)| s.visible)
            .map(|(i, _)| i)
    }

    /// Nearest visible slide strictly before `from`
    pub fn previous_visible(&self, from: usize) -> Option<usize> {
        let end = from.min(self.slides.len());
        self.slides[..end].iter().rposition(|s| s.visible)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Parse a deck from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        let mut deck: Self = ron::from_str(s)?;
        deck.migrate_legacy_effects();
        Ok(deck)
    }

    /// Parse a deck from JSON
    pub fn from_json(s: &str) -> Result<Self> {
        let mut deck: Self = serde_json::from_str(s)?;
        deck.migrate_legacy_effects();
        Ok(deck)
    }

    /// Convert every legacy effect word into animation steps. One-way: the
    /// flags are removed from the elements. Returns the number of steps added.
    pub fn migrate_legacy_effects(&mut self) -> usize {
        let migrated: usize = self.slides.iter_mut().map(Slide::migrate_legacy_effects).sum();
        if migrated > 0 {
            tracing::info!("Migrated {migrated} legacy effect steps in deck '{}'", self.name);
        }
        migrated
    }

    /// Load a deck file, choosing the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let deck = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron(&content)?,
            Some("json") => Self::from_json(&content)?,
            _ => return Err(DeckError::UnknownFormat(path.to_path_buf())),
        };
        tracing::info!("Loaded deck '{}' with {} slides from {:?}", deck.name, deck.len(), path);
        Ok(deck)
    }

    /// Save the deck as RON
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new("Untitled Deck")
    }
}
