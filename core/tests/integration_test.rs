//! End-to-end decode scenarios, driving a session the way a live
//! analyser tick would.

use morsewave_core::envelope::LevelSample;
use morsewave_core::{
    encode_text, Charset, DecodeSession, LevelSource, MorseError, Playback, PlaybackState,
    Result, SessionConfig, SpeedMode,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

// ITU spacing for the synthetic sender
const DIT: f64 = 1.0;
const DAH: f64 = 3.0;
const SYMBOL_GAP: f64 = 1.0;
const CHAR_GAP: f64 = 3.0;
const WORD_GAP: f64 = 7.0;

fn session() -> DecodeSession {
    let _ = env_logger::builder().is_test(true).try_init();
    DecodeSession::new(SessionConfig::default())
}

/// Key a Morse string into the session with ITU spacing, returning the
/// end time of the final pulse. Every duration is scaled by `scale()`,
/// so a closure returning 1.0 keys perfectly and a sampled factor keys
/// like a human.
fn key_morse(
    session: &mut DecodeSession,
    morse: &str,
    unit_ms: f64,
    start_ms: f64,
    mut scale: impl FnMut() -> f64,
) -> f64 {
    let mut t = start_ms;
    let parts: Vec<&str> = morse.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "/" {
            continue;
        }
        let symbols: Vec<char> = part.chars().collect();
        for (j, symbol) in symbols.iter().enumerate() {
            let on = if *symbol == '.' { DIT } else { DAH } * unit_ms * scale();
            session.push_sample(1.0, t);
            session.push_sample(0.0, t + on);
            t += on;
            if j < symbols.len() - 1 {
                t += SYMBOL_GAP * unit_ms * scale();
            }
        }
        if i < parts.len() - 1 {
            let gap = if parts[i + 1] == "/" { WORD_GAP } else { CHAR_GAP };
            t += gap * unit_ms * scale();
        }
    }
    t
}

#[test]
fn clean_keying_reproduces_the_transcript() {
    let mut s = session();
    let sent = encode_text("HELLO", Charset::International);
    let end = key_morse(&mut s, &sent, 80.0, 0.0, || 1.0);

    assert_eq!(s.morse(end), sent);
    assert_eq!(s.decoded_text(end), "HELLO");
    assert_eq!(s.estimated_wpm(), 15);
}

#[test]
fn word_gaps_survive_the_round_trip() {
    let mut s = session();
    let sent = encode_text("SOS SOS", Charset::International);
    let end = key_morse(&mut s, &sent, 60.0, 0.0, || 1.0);

    assert_eq!(s.decoded_text(end), "SOS SOS");
}

#[test]
fn jittered_human_keying_still_decodes() {
    let mut s = session();
    let mut rng = StdRng::seed_from_u64(7);
    let normal = Normal::<f64>::new(1.0, 0.05).unwrap();
    let mut scale = move || normal.sample(&mut rng).clamp(0.85, 1.15);

    let sent = encode_text("HELLO WORLD", Charset::International);
    let end = key_morse(&mut s, &sent, 80.0, 0.0, &mut scale);

    assert_eq!(s.decoded_text(end), "HELLO WORLD");
}

#[test]
fn sender_drift_is_absorbed_by_the_rolling_estimate() {
    let mut s = session();
    let sos = encode_text("SOS", Charset::International);

    let first_end = key_morse(&mut s, &sos, 60.0, 0.0, || 1.0);
    // The sender slows down by 25% across the word gap
    let second_start = first_end + WORD_GAP * 75.0;
    let end = key_morse(&mut s, &sos, 75.0, second_start, || 1.0);

    assert_eq!(s.decoded_text(end), "SOS SOS");
}

#[test]
fn later_evidence_reclassifies_the_first_pulse() {
    let mut s = session();

    // A lone 300 ms pulse can only be read as the unit itself
    s.push_sample(1.0, 0.0);
    s.push_sample(0.0, 300.0);
    assert_eq!(s.morse(300.0), ".");

    // Three genuine dits pull the estimate down; the opener becomes a dah
    let mut t = 500.0;
    for _ in 0..3 {
        s.push_sample(1.0, t);
        s.push_sample(0.0, t + 100.0);
        t += 200.0;
    }
    assert_eq!(s.morse(t - 100.0), "-...");
}

#[test]
fn playback_walk_feeds_back_into_a_decoder() {
    let mut s = session();
    let sent = encode_text("PARIS", Charset::International);
    let playback = Playback::new(&sent, 60.0, 0.0);

    let total = playback.total_ms();
    let mut t = 0.0;
    while t < total {
        if let PlaybackState::Active { on, .. } = playback.state_at(t) {
            s.push_sample(if on { 1.0 } else { 0.0 }, t);
        }
        t += 5.0;
    }
    s.stop(total);

    assert_eq!(s.decoded_text(total), "PARIS");
}

struct SliceSource {
    samples: std::vec::IntoIter<LevelSample>,
}

impl LevelSource for SliceSource {
    fn next_sample(&mut self) -> Result<Option<LevelSample>> {
        Ok(self.samples.next())
    }
}

struct DeniedSource;

impl LevelSource for DeniedSource {
    fn next_sample(&mut self) -> Result<Option<LevelSample>> {
        Err(MorseError::PermissionDenied)
    }
}

#[test]
fn run_drains_a_source_and_finalizes() {
    let mut s = session();
    let sent = encode_text("SOS", Charset::International);
    let playback = Playback::new(&sent, 120.0, 0.0);

    let total = playback.total_ms();
    let mut samples = Vec::new();
    let mut t = 0.0;
    while t < total {
        if let PlaybackState::Active { on, .. } = playback.state_at(t) {
            samples.push(LevelSample {
                t_ms: t,
                level: if on { 0.9 } else { 0.0 },
            });
        }
        t += 10.0;
    }

    let mut source = SliceSource {
        samples: samples.into_iter(),
    };
    let end = s.run(&mut source).unwrap();

    assert!(s.is_stopped());
    assert_eq!(s.decoded_text(end), "SOS");
}

#[test]
fn acquisition_failure_surfaces_before_any_state_exists() {
    let mut s = session();
    let err = s.run(&mut DeniedSource).unwrap_err();
    assert!(matches!(err, MorseError::PermissionDenied));
    assert!(s.pulses().is_empty());
}

#[test]
fn manual_speed_decodes_without_estimation() {
    let mut s = DecodeSession::new(SessionConfig {
        speed: SpeedMode::manual(15).unwrap(),
        ..SessionConfig::default()
    });
    let sent = encode_text("HI", Charset::International);
    let end = key_morse(&mut s, &sent, 80.0, 0.0, || 1.0);

    assert_eq!(s.decoded_text(end), "HI");
    assert_eq!(s.estimated_wpm(), 15);
}
