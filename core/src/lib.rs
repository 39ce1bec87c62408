//! Morse translator core: adaptive keying decoder and text translation
//!
//! Decodes a stream of thresholded level samples (microphone amplitude,
//! camera brightness, key presses) into a Morse transcript without prior
//! speed calibration, and translates text to and from Morse for playback.

pub mod charset;
pub mod cluster;
pub mod edge;
pub mod envelope;
pub mod error;
pub mod estimate;
pub mod gate;
pub mod reconstruct;
pub mod recorder;
pub mod session;
pub mod timeline;
pub mod translate;

pub use charset::Charset;
pub use edge::{Edge, EdgeDetector, Sensitivity};
pub use error::{MorseError, Result};
pub use estimate::SpeedMode;
pub use recorder::{Pulse, SignalLog};
pub use session::{DecodeSession, LevelSource, SessionConfig};
pub use timeline::{Playback, PlaybackState, Player};
pub use translate::{decode_morse, encode_text};

// Timing configuration (durations in milliseconds)
pub const FALLBACK_UNIT_MS: f64 = 120.0; // ~10 WPM before anything is observed
pub const ESTIMATE_WINDOW: usize = 40; // pulses feeding the rolling unit estimate
pub const CLUSTER_SPLIT_RATIO: f64 = 1.5; // adjacent-duration ratio separating dits from dahs
pub const WPM_UNIT_MS: f64 = 1200.0; // unit_ms = 1200 / wpm ("PARIS" reference word)

// Classification thresholds, in units
pub const DAH_BOUNDARY_UNITS: f64 = 2.0; // on-duration at or above this is a dah
pub const CHAR_GAP_UNITS: f64 = 2.0; // silence beyond this separates characters
pub const WORD_GAP_UNITS: f64 = 5.0; // silence beyond this separates words

// Playback timeline, in units
pub const DIT_UNITS: u32 = 1;
pub const DAH_UNITS: u32 = 3;
pub const SYMBOL_GAP_UNITS: u32 = 1;
pub const LETTER_GAP_UNITS: u32 = 3;
pub const WORD_PAUSE_UNITS: u32 = 4; // pause emitted for a "/" token
