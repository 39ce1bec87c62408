//! Level extraction from audio buffers.
//!
//! Stands in for a live analyser tick: a recording is reduced to one
//! peak level per tick window, normalized to [0, 1], yielding the
//! timestamped stream the edge detector consumes.

/// One normalized level observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSample {
    pub t_ms: f64,
    pub level: f64,
}

/// Mix interleaved stereo down to mono by averaging each channel pair.
pub fn stereo_to_mono(samples: &[f32]) -> Vec<f32> {
    samples
        .chunks_exact(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// Peak absolute level per `tick_ms` window.
///
/// Each window is stamped with its end time, matching an analyser that
/// reports after the interval it observed.
pub fn envelope(samples: &[f32], sample_rate: u32, tick_ms: f64) -> Vec<LevelSample> {
    let window = ((f64::from(sample_rate) * tick_ms / 1000.0).max(1.0)) as usize;
    samples
        .chunks(window)
        .enumerate()
        .map(|(i, chunk)| {
            let peak = chunk.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
            LevelSample {
                t_ms: (i + 1) as f64 * tick_ms,
                level: f64::from(peak.min(1.0)),
            }
        })
        .collect()
}
