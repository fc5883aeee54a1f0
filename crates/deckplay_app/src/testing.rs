// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test doubles shared by the unit tests of this crate.

use crate::error::MediaError;
use crate::media::{MediaResolver, Sound};
use deckplay_model::MediaId;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Counters {
    plays: Cell<usize>,
    stops: Cell<usize>,
}

/// In-memory media resolver counting plays and stops
#[derive(Default)]
pub struct FakeMedia {
    counters: Rc<Counters>,
    fail: bool,
}

impl FakeMedia {
    /// Resolver whose every load fails
    pub fn failing() -> Self {
        Self {
            counters: Rc::default(),
            fail: true,
        }
    }

    pub fn plays(&self) -> usize {
        self.counters.plays.get()
    }

    pub fn stops(&self) -> usize {
        self.counters.stops.get()
    }
}

struct FakeSound {
    counters: Rc<Counters>,
}

impl Sound for FakeSound {
    fn play(&mut self) {
        self.counters.plays.set(self.counters.plays.get() + 1);
    }

    fn stop(&mut self) {
        self.counters.stops.set(self.counters.stops.get() + 1);
    }
}

impl MediaResolver for FakeMedia {
    fn load_sound(&mut self, id: &MediaId) -> Result<Box<dyn Sound>, MediaError> {
        if self.fail {
            return Err(MediaError::NotFound(id.clone()));
        }
        Ok(Box::new(FakeSound {
            counters: Rc::clone(&self.counters),
        }))
    }
}
