// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mapping of keys and text commands to playback input signals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Abstract input understood by the playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSignal {
    /// Skip the running wave, release a click wave, or go to the next slide
    Advance,
    /// Previous visible slide
    Previous,
    /// First visible slide
    First,
    /// Last visible slide
    Last,
    /// End the session
    Exit,
    /// Enter the session at a specific slide
    StartFrom(usize),
}

/// Key name to signal table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: IndexMap<String, InputSignal>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: IndexMap::new(),
        };
        for key in ["ArrowRight", "ArrowDown", "Space", "Enter", "PageDown", "n"] {
            keys.bind(key, InputSignal::Advance);
        }
        for key in ["ArrowLeft", "ArrowUp", "PageUp", "Backspace", "p"] {
            keys.bind(key, InputSignal::Previous);
        }
        keys.bind("Home", InputSignal::First);
        keys.bind("End", InputSignal::Last);
        keys.bind("Escape", InputSignal::Exit);
        keys.bind("q", InputSignal::Exit);
        keys
    }
}

impl KeyBindings {
    /// Bind `key` to `signal`, replacing any previous binding
    pub fn bind(&mut self, key: impl Into<String>, signal: InputSignal) {
        self.bindings.insert(key.into(), signal);
    }

    /// Remove a binding
    pub fn unbind(&mut self, key: &str) -> Option<InputSignal> {
        self.bindings.shift_remove(key)
    }

    /// Signal bound to `key`
    pub fn resolve(&self, key: &str) -> Option<InputSignal> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `signal`, in binding order
    pub fn keys_for(&self, signal: InputSignal) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .filter(move |(_, s)| **s == signal)
            .map(|(k, _)| k.as_str())
    }

    /// Parse a line of text input: `goto N` (0-based slide index), an empty
    /// line (treated as the primary click), or a bound key name
    pub fn parse_command(&self, line: &str) -> Option<InputSignal> {
        let line = line.trim();
        if line.is_empty() {
            return Some(InputSignal::Advance);
        }
        if let Some(rest) = line.strip_prefix("goto") {
            return rest.trim().parse().ok().map(InputSignal::StartFrom);
        }
        self.resolve(line)
    }
}
