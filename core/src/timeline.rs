//! Unit-denominated playback timeline and the cooperative walker.
//!
//! Expands a Morse string into the on/off event list a host keys a tone
//! or light from. Durations stay in units until walk time so the walker
//! can be started at any speed.

use crate::{DAH_UNITS, DIT_UNITS, LETTER_GAP_UNITS, SYMBOL_GAP_UNITS, WORD_PAUSE_UNITS};

/// One step of a playback walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEvent {
    /// Keyed (tone/light on) or silent.
    pub on: bool,
    /// Length in dit units.
    pub units: u32,
    /// Index of the character this event belongs to, for display
    /// highlighting; None for inter-character and word pauses.
    pub char_index: Option<usize>,
}

/// Expand a Morse string into on/off events.
pub fn build_timeline(morse: &str) -> Vec<TimelineEvent> {
    let parts: Vec<&str> = morse.split_whitespace().collect();
    let mut events = Vec::new();
    let mut char_index = 0;
    for (i, part) in parts.iter().enumerate() {
        if *part == "/" {
            events.push(TimelineEvent {
                on: false,
                units: WORD_PAUSE_UNITS,
                char_index: None,
            });
            continue;
        }
        let symbols: Vec<char> = part.chars().filter(|c| matches!(c, '.' | '-')).collect();
        for (j, symbol) in symbols.iter().enumerate() {
            let units = if *symbol == '.' { DIT_UNITS } else { DAH_UNITS };
            events.push(TimelineEvent {
                on: true,
                units,
                char_index: Some(char_index),
            });
            if j < symbols.len() - 1 {
                events.push(TimelineEvent {
                    on: false,
                    units: SYMBOL_GAP_UNITS,
                    char_index: Some(char_index),
                });
            }
        }
        char_index += 1;
        if i < parts.len() - 1 && parts[i + 1] != "/" {
            events.push(TimelineEvent {
                on: false,
                units: LETTER_GAP_UNITS,
                char_index: None,
            });
        }
    }
    events
}

/// Where a playback walk currently stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// Mid-walk: whether the key is down, and which character is being
    /// sent.
    Active { on: bool, char_index: Option<usize> },
    Finished,
    Cancelled,
}

/// A cancelable walk of one timeline against a caller-supplied clock.
#[derive(Debug)]
pub struct Playback {
    events: Vec<TimelineEvent>,
    unit_ms: f64,
    started_ms: f64,
    cancelled: bool,
}

impl Playback {
    pub fn new(morse: &str, unit_ms: f64, started_ms: f64) -> Self {
        Self {
            events: build_timeline(morse),
            unit_ms,
            started_ms,
            cancelled: false,
        }
    }

    /// Synchronous; the next `state_at` reports Cancelled.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn total_ms(&self) -> f64 {
        self.events.iter().map(|e| f64::from(e.units)).sum::<f64>() * self.unit_ms
    }

    /// Resolve the walk position at `now_ms`.
    pub fn state_at(&self, now_ms: f64) -> PlaybackState {
        if self.cancelled {
            return PlaybackState::Cancelled;
        }
        let mut t = self.started_ms;
        for event in &self.events {
            let end = t + f64::from(event.units) * self.unit_ms;
            if now_ms < end {
                return PlaybackState::Active {
                    on: event.on,
                    char_index: event.char_index,
                };
            }
            t = end;
        }
        PlaybackState::Finished
    }
}

/// At most one playback runs at a time; starting a new walk cancels the
/// one in flight before it is replaced.
#[derive(Debug, Default)]
pub struct Player {
    active: Option<Playback>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, morse: &str, unit_ms: f64, now_ms: f64) -> &Playback {
        if let Some(active) = self.active.as_mut() {
            active.cancel();
        }
        self.active.insert(Playback::new(morse, unit_ms, now_ms))
    }

    pub fn stop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.cancel();
        }
        self.active = None;
    }

    pub fn is_playing(&self) -> bool {
        self.active.as_ref().is_some_and(|p| !p.is_cancelled())
    }

    pub fn state_at(&self, now_ms: f64) -> Option<PlaybackState> {
        self.active.as_ref().map(|p| p.state_at(now_ms))
    }
}
