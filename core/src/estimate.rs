//! Rolling dit-length estimate over the recent pulse window.

use log::trace;

use crate::cluster::estimate_unit;
use crate::error::{MorseError, Result};
use crate::recorder::Pulse;
use crate::{ESTIMATE_WINDOW, FALLBACK_UNIT_MS, WPM_UNIT_MS};

/// Automatic estimation from observed timing, or a fixed manual speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    #[default]
    Auto,
    Manual {
        wpm: u32,
    },
}

impl SpeedMode {
    pub fn manual(wpm: u32) -> Result<Self> {
        if wpm == 0 {
            return Err(MorseError::InvalidWpm(wpm));
        }
        Ok(SpeedMode::Manual { wpm })
    }
}

/// Current unit (dit) duration in milliseconds.
///
/// Auto mode clusters the ON durations of the most recent pulses and,
/// once at least two inter-pulse gaps exist, the OFF gaps as well; mark
/// and space estimates are averaged so a sender with consistent keying
/// but irregular pauses (or the reverse) still converges. Manual mode
/// bypasses observation entirely.
pub fn unit_ms(mode: SpeedMode, pulses: &[Pulse]) -> f64 {
    if let SpeedMode::Manual { wpm } = mode {
        return WPM_UNIT_MS / f64::from(wpm);
    }

    let recent = &pulses[pulses.len().saturating_sub(ESTIMATE_WINDOW)..];
    if recent.is_empty() {
        return FALLBACK_UNIT_MS;
    }

    let on: Vec<f64> = recent.iter().map(|p| p.on_ms).collect();
    let on_estimate = estimate_unit(&on);

    let gaps: Vec<f64> = recent
        .iter()
        .map(|p| p.gap_before_ms)
        .filter(|&g| g > 0.0)
        .collect();

    let unit = if gaps.len() >= 2 {
        (on_estimate + estimate_unit(&gaps)) / 2.0
    } else {
        on_estimate
    };
    trace!("unit estimate {:.1} ms over {} pulses", unit, recent.len());
    unit
}

/// Display speed for a given unit duration.
pub fn unit_to_wpm(unit_ms: f64) -> u32 {
    (WPM_UNIT_MS / unit_ms).round() as u32
}
