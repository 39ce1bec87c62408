//! One decode session per input modality.

use log::{debug, trace};

use crate::charset::Charset;
use crate::edge::{Edge, EdgeDetector, Sensitivity};
use crate::envelope::LevelSample;
use crate::error::Result;
use crate::estimate::{self, SpeedMode};
use crate::gate::GapGate;
use crate::reconstruct::reconstruct;
use crate::recorder::{Pulse, SignalLog};
use crate::translate::decode_morse;

/// Per-session knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub sensitivity: Sensitivity,
    pub speed: SpeedMode,
    pub charset: Charset,
}

/// Stream of timestamped level samples from an acquisition layer.
///
/// Implementations must report device failure (permission denied, no
/// device) as an error; silence is a level near zero, not an error.
pub trait LevelSource {
    fn next_sample(&mut self) -> Result<Option<LevelSample>>;
}

/// Adaptive decoder state for one input modality (microphone, camera,
/// or manual key). Each modality gets its own instance; sessions share
/// nothing, so independent inputs never interfere.
#[derive(Debug)]
pub struct DecodeSession {
    config: SessionConfig,
    detector: EdgeDetector,
    log: SignalLog,
    gate: GapGate,
    stopped: bool,
}

impl DecodeSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            detector: EdgeDetector::new(config.sensitivity),
            log: SignalLog::new(),
            gate: GapGate::new(),
            stopped: false,
        }
    }

    /// Feed one level sample; returns the edge it completed, if any.
    /// Samples arriving after `stop` are dropped.
    pub fn push_sample(&mut self, level: f64, now_ms: f64) -> Option<Edge> {
        if self.stopped {
            trace!("sample after stop ignored");
            return None;
        }
        let edge = self.detector.feed(level, now_ms)?;
        self.handle_edge(edge);
        Some(edge)
    }

    fn handle_edge(&mut self, edge: Edge) {
        match edge {
            // Signal resumed before the silence was long enough to
            // matter; the pending boundary renders must not fire.
            Edge::Rise { .. } => self.gate.cancel(),
            Edge::Fall {
                started_ms,
                ended_ms,
            } => {
                self.log.record_pulse_end(started_ms, ended_ms);
                let unit = self.unit_ms();
                self.gate.schedule(ended_ms, unit);
            }
        }
    }

    /// Drive the session from an acquisition source until it runs dry,
    /// then finalize. Returns the timestamp of the last sample seen.
    pub fn run(&mut self, source: &mut dyn LevelSource) -> Result<f64> {
        let mut last_ms = 0.0;
        while let Some(sample) = source.next_sample()? {
            last_ms = sample.t_ms;
            self.push_sample(sample.level, sample.t_ms);
        }
        self.stop(last_ms);
        Ok(last_ms)
    }

    /// Poll the silence gates; returns a fresh render when one fired.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        if self.stopped {
            return None;
        }
        let boundary = self.gate.poll(now_ms)?;
        trace!("silence gate fired: {boundary:?}");
        Some(self.morse(now_ms))
    }

    /// Current unit estimate in milliseconds.
    pub fn unit_ms(&self) -> f64 {
        estimate::unit_ms(self.config.speed, self.log.pulses())
    }

    /// Estimated transmission speed for display.
    pub fn estimated_wpm(&self) -> u32 {
        estimate::unit_to_wpm(self.unit_ms())
    }

    /// Render the transcript as of `now_ms`. A pure pull: any number of
    /// calls without new samples yields the same string, and the whole
    /// transcript is rebuilt so the latest unit estimate reclassifies
    /// earlier pulses too.
    pub fn morse(&self, now_ms: f64) -> String {
        reconstruct(self.log.pulses(), self.unit_ms(), self.pending_gap_ms(now_ms))
    }

    fn pending_gap_ms(&self, now_ms: f64) -> f64 {
        if self.stopped || self.detector.is_on() {
            return 0.0;
        }
        self.log
            .last_end_ms()
            .map_or(0.0, |end| (now_ms - end).max(0.0))
    }

    /// Decoded text for the current transcript.
    pub fn decoded_text(&self, now_ms: f64) -> String {
        decode_morse(&self.morse(now_ms), self.config.charset)
    }

    pub fn pulses(&self) -> &[Pulse] {
        self.log.pulses()
    }

    /// Whether the signal is currently above threshold.
    pub fn is_keyed(&self) -> bool {
        self.detector.is_on()
    }

    /// Adjust the level threshold on a live session; the pulse log is
    /// untouched.
    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.config.sensitivity = sensitivity;
        self.detector.set_sensitivity(sensitivity);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Finalize the session: close a still-open pulse as if it ended at
    /// `now_ms`, cancel the silence gates, and refuse further samples.
    /// Idempotent; nothing can fire once it returns.
    pub fn stop(&mut self, now_ms: f64) {
        if self.stopped {
            return;
        }
        if let Some(Edge::Fall {
            started_ms,
            ended_ms,
        }) = self.detector.finish(now_ms)
        {
            self.log.record_pulse_end(started_ms, ended_ms);
        }
        self.gate.cancel();
        self.stopped = true;
        debug!("session stopped with {} pulses", self.log.pulses().len());
    }

    /// Reset the transcript without ending the session.
    pub fn clear(&mut self) {
        self.log.clear();
        self.gate.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DecodeSession {
        DecodeSession::new(SessionConfig::default())
    }

    /// Key one ON pulse of `on_ms` starting at `start_ms`.
    fn key(s: &mut DecodeSession, start_ms: f64, on_ms: f64) {
        s.push_sample(1.0, start_ms);
        s.push_sample(0.0, start_ms + on_ms);
    }

    #[test]
    fn pulses_accumulate_with_gaps() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        key(&mut s, 200.0, 300.0);
        assert_eq!(s.pulses().len(), 2);
        assert_eq!(s.pulses()[1].gap_before_ms, 100.0);
    }

    #[test]
    fn morse_pull_is_idempotent() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        key(&mut s, 200.0, 300.0);
        let now = 600.0;
        assert_eq!(s.morse(now), s.morse(now));
    }

    #[test]
    fn stop_finalizes_an_open_pulse() {
        let mut s = session();
        s.push_sample(1.0, 0.0);
        s.stop(90.0);
        assert_eq!(s.pulses().len(), 1);
        assert_eq!(s.pulses()[0].on_ms, 90.0);
        assert!(!s.is_keyed());
        assert!(s.is_stopped());
    }

    #[test]
    fn stop_is_idempotent_and_blocks_samples() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        s.stop(200.0);
        s.stop(500.0);
        assert_eq!(s.push_sample(1.0, 600.0), None);
        assert_eq!(s.pulses().len(), 1);
    }

    #[test]
    fn poll_fires_after_silence_then_goes_quiet() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        // unit is 100 ms after one pulse: character gate at 300, word at 600
        assert_eq!(s.poll(250.0), None);
        assert_eq!(s.poll(350.0), Some(".".to_string()));
        assert_eq!(s.poll(400.0), None);
        let word_render = s.poll(650.0).unwrap();
        assert_eq!(word_render, ". /");
        assert_eq!(s.poll(700.0), None);
    }

    #[test]
    fn new_pulse_cancels_pending_gates() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        s.push_sample(1.0, 150.0);
        assert_eq!(s.poll(10_000.0), None);
    }

    #[test]
    fn poll_never_fires_after_stop() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        s.stop(150.0);
        assert_eq!(s.poll(10_000.0), None);
    }

    #[test]
    fn renders_are_stable_after_stop() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        s.stop(150.0);
        assert_eq!(s.morse(150.0), s.morse(1_000_000.0));
    }

    #[test]
    fn clear_resets_transcript_but_keeps_session_live() {
        let mut s = session();
        key(&mut s, 0.0, 100.0);
        s.clear();
        assert_eq!(s.morse(200.0), "");
        key(&mut s, 1000.0, 100.0);
        assert_eq!(s.pulses().len(), 1);
        assert_eq!(s.pulses()[0].gap_before_ms, 0.0);
    }

    #[test]
    fn manual_speed_overrides_estimation() {
        let mut s = DecodeSession::new(SessionConfig {
            speed: SpeedMode::manual(20).unwrap(),
            ..SessionConfig::default()
        });
        // 500 ms at 20 WPM (unit 60 ms) is far beyond the dah boundary
        key(&mut s, 0.0, 500.0);
        assert_eq!(s.morse(500.0), "-");
        assert_eq!(s.estimated_wpm(), 20);
    }
}
