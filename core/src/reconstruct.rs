//! Rebuilds the Morse transcript from the pulse log.

use crate::recorder::Pulse;
use crate::{CHAR_GAP_UNITS, DAH_BOUNDARY_UNITS, WORD_GAP_UNITS};

/// Render the full transcript for the given unit estimate.
///
/// Rebuilt from scratch on every call rather than patched: as the unit
/// estimate refines, earlier pulses reclassify along with later ones.
/// `pending_gap_ms` is the still-open silence after the last pulse; once
/// it exceeds the word threshold the transcript gains a trailing word
/// separator before the next character arrives.
pub fn reconstruct(pulses: &[Pulse], unit_ms: f64, pending_gap_ms: f64) -> String {
    let mut out = String::new();
    for (i, pulse) in pulses.iter().enumerate() {
        if i > 0 {
            if pulse.gap_before_ms > unit_ms * WORD_GAP_UNITS {
                out.push_str(" / ");
            } else if pulse.gap_before_ms > unit_ms * CHAR_GAP_UNITS {
                out.push(' ');
            }
        }
        out.push(if pulse.on_ms < unit_ms * DAH_BOUNDARY_UNITS {
            '.'
        } else {
            '-'
        });
    }
    if !pulses.is_empty() && pending_gap_ms > unit_ms * WORD_GAP_UNITS {
        out.push_str(" /");
    }
    out
}
