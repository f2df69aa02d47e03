//! Layered note gate.
//!
//! Every note-on adds a layer, every note-off removes one. The envelope sees
//! a single trigger that stays high until the last overlapping note is
//! released, which is what makes legato playing and sustain-style overlap
//! keep the envelope open.

use crate::dsp::envelope::Trigger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gate {
    count: u32,
}

impl Gate {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    #[inline]
    pub fn on(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Remove one layer. An unmatched note-off leaves the count at zero.
    #[inline]
    pub fn off(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    /// Drop every layer at once.
    #[inline]
    pub fn clear(&mut self) {
        self.count = 0;
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.count > 0
    }

    #[inline]
    pub fn trigger(&self) -> Trigger {
        Trigger::from_gate(self.count)
    }
}
