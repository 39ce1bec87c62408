//! Append-only log of completed keying pulses.

use log::debug;

/// One completed ON period and the silence that preceded it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// How long the signal stayed above threshold, in milliseconds.
    pub on_ms: f64,
    /// OFF time between the previous pulse's end and this one's start;
    /// zero for the first pulse of a session.
    pub gap_before_ms: f64,
}

/// Ordered pulse history for one decode session.
///
/// Pulses are never retimed or discarded after being appended; the
/// rolling unit estimate reads only a recent suffix, the transcript
/// reads everything.
#[derive(Debug, Default)]
pub struct SignalLog {
    pulses: Vec<Pulse>,
    last_end_ms: Option<f64>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pulse that started at `started_ms` and ended at `ended_ms`.
    pub fn record_pulse_end(&mut self, started_ms: f64, ended_ms: f64) {
        let gap_before_ms = self.last_end_ms.map_or(0.0, |end| started_ms - end);
        let pulse = Pulse {
            on_ms: ended_ms - started_ms,
            gap_before_ms,
        };
        debug!(
            "pulse #{}: on {:.0} ms, gap {:.0} ms",
            self.pulses.len() + 1,
            pulse.on_ms,
            pulse.gap_before_ms
        );
        self.pulses.push(pulse);
        self.last_end_ms = Some(ended_ms);
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// End timestamp of the most recent pulse.
    pub fn last_end_ms(&self) -> Option<f64> {
        self.last_end_ms
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
        self.last_end_ms = None;
    }
}
