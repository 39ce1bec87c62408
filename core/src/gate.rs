//! Deferred re-render deadlines for character and word boundaries.

use crate::{CHAR_GAP_UNITS, WORD_GAP_UNITS};

/// A single-shot cooperative deadline with a synchronous cancel.
#[derive(Debug, Default)]
pub struct DelayHandle {
    deadline_ms: Option<f64>,
}

impl DelayHandle {
    pub fn arm(&mut self, deadline_ms: f64) {
        self.deadline_ms = Some(deadline_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// True exactly once: on the first poll at or past the deadline.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Boundary kind a gate poll surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Character,
    Word,
}

/// Schedules the two silence re-renders after each pulse: a character
/// boundary check after 2 units and a word boundary check after 5 units
/// of continued silence. The unit is snapshotted at scheduling time; the
/// render that a fired gate triggers recomputes it live.
#[derive(Debug, Default)]
pub struct GapGate {
    char_timer: DelayHandle,
    word_timer: DelayHandle,
}

impl GapGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, pulse_end_ms: f64, unit_ms: f64) {
        self.char_timer.arm(pulse_end_ms + unit_ms * CHAR_GAP_UNITS);
        self.word_timer.arm(pulse_end_ms + unit_ms * WORD_GAP_UNITS);
    }

    /// Cancel both deadlines; called when a new pulse starts or the
    /// session stops, so no stale render fires mid-signal or after stop.
    pub fn cancel(&mut self) {
        self.char_timer.cancel();
        self.word_timer.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.char_timer.is_armed() || self.word_timer.is_armed()
    }

    /// Drain at most one due boundary per call, character first.
    pub fn poll(&mut self, now_ms: f64) -> Option<Boundary> {
        if self.char_timer.fire(now_ms) {
            return Some(Boundary::Character);
        }
        if self.word_timer.fire(now_ms) {
            return Some(Boundary::Word);
        }
        None
    }
}
