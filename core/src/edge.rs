//! Threshold crossing detection over the sampled level stream.

/// Sensitivity percentage (0-100), mapped linearly onto the level
/// threshold. Higher sensitivity raises the threshold, so only louder
/// or brighter signal counts as ON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensitivity(f64);

impl Sensitivity {
    pub fn new(percent: f64) -> Self {
        Self(percent.clamp(0.0, 100.0))
    }

    pub fn threshold(self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::new(30.0)
    }
}

/// A detected level transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    /// Signal rose above threshold.
    Rise { at_ms: f64 },
    /// Signal fell back to or below threshold after being on since
    /// `started_ms`.
    Fall { started_ms: f64, ended_ms: f64 },
}

/// Tracks whether the signal is currently above threshold.
///
/// A single threshold, no hysteresis band.
#[derive(Debug)]
pub struct EdgeDetector {
    threshold: f64,
    is_on: bool,
    on_start_ms: f64,
}

impl EdgeDetector {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            threshold: sensitivity.threshold(),
            is_on: false,
            on_start_ms: 0.0,
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.threshold = sensitivity.threshold();
    }

    /// Feed one level sample; returns the transition it completes, if any.
    pub fn feed(&mut self, level: f64, now_ms: f64) -> Option<Edge> {
        if level > self.threshold {
            if !self.is_on {
                self.is_on = true;
                self.on_start_ms = now_ms;
                return Some(Edge::Rise { at_ms: now_ms });
            }
        } else if self.is_on {
            self.is_on = false;
            return Some(Edge::Fall {
                started_ms: self.on_start_ms,
                ended_ms: now_ms,
            });
        }
        None
    }

    /// Force an open pulse closed, as if the level dropped at `now_ms`.
    /// Used when a session stops while the key is still down.
    pub fn finish(&mut self, now_ms: f64) -> Option<Edge> {
        if !self.is_on {
            return None;
        }
        self.is_on = false;
        Some(Edge::Fall {
            started_ms: self.on_start_ms,
            ended_ms: now_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitivity_maps_linearly_and_clamps() {
        assert_eq!(Sensitivity::new(30.0).threshold(), 0.3);
        assert_eq!(Sensitivity::new(-5.0).threshold(), 0.0);
        assert_eq!(Sensitivity::new(250.0).threshold(), 1.0);
    }

    #[test]
    fn rise_and_fall_produce_one_edge_each() {
        let mut det = EdgeDetector::new(Sensitivity::new(30.0));
        assert_eq!(det.feed(0.1, 0.0), None);
        assert_eq!(det.feed(0.8, 10.0), Some(Edge::Rise { at_ms: 10.0 }));
        assert_eq!(det.feed(0.9, 20.0), None);
        assert_eq!(
            det.feed(0.1, 90.0),
            Some(Edge::Fall {
                started_ms: 10.0,
                ended_ms: 90.0
            })
        );
        assert_eq!(det.feed(0.1, 100.0), None);
        assert!(!det.is_on());
    }

    #[test]
    fn level_at_threshold_counts_as_off() {
        let mut det = EdgeDetector::new(Sensitivity::new(50.0));
        assert_eq!(det.feed(0.5, 0.0), None);
        assert!(det.feed(0.51, 1.0).is_some());
        assert!(det.feed(0.5, 2.0).is_some());
    }

    #[test]
    fn finish_closes_an_open_pulse_once() {
        let mut det = EdgeDetector::new(Sensitivity::default());
        det.feed(1.0, 5.0);
        assert_eq!(
            det.finish(65.0),
            Some(Edge::Fall {
                started_ms: 5.0,
                ended_ms: 65.0
            })
        );
        assert_eq!(det.finish(70.0), None);
        assert!(!det.is_on());
    }
}
