use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use morsewave_core::envelope::{envelope, stereo_to_mono, LevelSample};
use morsewave_core::translate::to_kana_notation;
use morsewave_core::{
    decode_morse, encode_text, estimate, Charset, DecodeSession, LevelSource, PlaybackState,
    Player, Sensitivity, SessionConfig, SpeedMode,
};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "morsewave")]
#[command(about = "Morse translator with adaptive keying decode")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CharsetArg {
    /// International Morse (A-Z, digits, punctuation, prosigns)
    Intl,
    /// Wabun code (Japanese kana)
    Wabun,
}

impl From<CharsetArg> for Charset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Intl => Charset::International,
            CharsetArg::Wabun => Charset::Wabun,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text to a Morse string
    Encode {
        text: String,

        #[arg(short, long, value_enum, default_value = "intl")]
        charset: CharsetArg,

        /// Print katakana notation (dots and bars) instead of ASCII
        #[arg(long)]
        kana: bool,
    },

    /// Decode a Morse string to text
    Decode {
        #[arg(allow_hyphen_values = true)]
        morse: String,

        #[arg(short, long, value_enum, default_value = "intl")]
        charset: CharsetArg,
    },

    /// Decode keyed Morse audio from a WAV recording
    DecodeWav {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Level threshold as a percentage
        #[arg(short, long, default_value = "30")]
        sensitivity: f64,

        /// Fix the speed instead of estimating it from the signal
        #[arg(short, long)]
        wpm: Option<u32>,

        /// Analysis tick length in milliseconds
        #[arg(long, default_value = "10")]
        tick_ms: f64,

        #[arg(short, long, value_enum, default_value = "intl")]
        charset: CharsetArg,

        /// Emit a JSON report instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Walk the playback timeline for a text, printing each character
    /// as it is keyed
    Play {
        text: String,

        #[arg(short, long, default_value = "20")]
        wpm: u32,

        #[arg(short, long, value_enum, default_value = "intl")]
        charset: CharsetArg,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { text, charset, kana } => {
            let morse = encode_text(&text, charset.into());
            if kana {
                println!("{}", to_kana_notation(&morse));
            } else {
                println!("{morse}");
            }
        }
        Commands::Decode { morse, charset } => {
            println!("{}", decode_morse(&morse, charset.into()));
        }
        Commands::DecodeWav {
            input,
            sensitivity,
            wpm,
            tick_ms,
            charset,
            json,
        } => decode_wav_command(&input, sensitivity, wpm, tick_ms, charset.into(), json)?,
        Commands::Play { text, wpm, charset } => play_command(&text, wpm, charset.into())?,
    }

    Ok(())
}

#[derive(Serialize)]
struct DecodeReport {
    morse: String,
    text: String,
    estimated_wpm: u32,
    pulses: usize,
}

/// Buffered envelope levels presented as an acquisition source.
struct BufferedLevels {
    samples: std::vec::IntoIter<LevelSample>,
}

impl LevelSource for BufferedLevels {
    fn next_sample(&mut self) -> morsewave_core::Result<Option<LevelSample>> {
        Ok(self.samples.next())
    }
}

fn decode_wav_command(
    input_path: &PathBuf,
    sensitivity: f64,
    wpm: Option<u32>,
    tick_ms: f64,
    charset: Charset,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Read WAV file
    let file = File::open(input_path)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    info!(
        "read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    // Extract samples (handle both 16-bit and 32-bit float formats)
    let samples: Vec<f32> = match spec.bits_per_sample {
        16 => {
            let int_samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            int_samples?
                .into_iter()
                .map(|s| f32::from(s) / 32768.0)
                .collect()
        }
        32 => {
            let float_samples: Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            float_samples?
        }
        _ => {
            return Err(format!("Unsupported bit depth: {}", spec.bits_per_sample).into());
        }
    };

    let mono = match spec.channels {
        1 => samples,
        2 => stereo_to_mono(&samples),
        n => return Err(format!("Unsupported channel count: {n}").into()),
    };
    info!("extracted {} mono samples", mono.len());

    let levels = envelope(&mono, spec.sample_rate, tick_ms);

    let speed = match wpm {
        Some(w) => SpeedMode::manual(w)?,
        None => SpeedMode::Auto,
    };
    let mut session = DecodeSession::new(SessionConfig {
        sensitivity: Sensitivity::new(sensitivity),
        speed,
        charset,
    });

    let mut source = BufferedLevels {
        samples: levels.into_iter(),
    };
    let end_ms = session.run(&mut source)?;

    let report = DecodeReport {
        morse: session.morse(end_ms),
        text: session.decoded_text(end_ms),
        estimated_wpm: session.estimated_wpm(),
        pulses: session.pulses().len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Morse: {}", report.morse);
        println!("Text:  {}", report.text);
        println!(
            "Speed: ~{} WPM from {} pulses",
            report.estimated_wpm, report.pulses
        );
    }

    Ok(())
}

fn play_command(text: &str, wpm: u32, charset: Charset) -> Result<(), Box<dyn std::error::Error>> {
    let morse = encode_text(text, charset);
    if morse.is_empty() {
        return Err("nothing to play".into());
    }

    let speed = SpeedMode::manual(wpm)?;
    let unit_ms = estimate::unit_ms(speed, &[]);
    let tokens: Vec<&str> = morse.split_whitespace().filter(|p| *p != "/").collect();

    let clock = Instant::now();
    let mut player = Player::new();
    player.start(&morse, unit_ms, 0.0);

    let mut last_char = None;
    loop {
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        match player.state_at(now_ms) {
            Some(PlaybackState::Active { char_index, .. }) => {
                if char_index.is_some() && char_index != last_char {
                    if let Some(token) = char_index.and_then(|ci| tokens.get(ci)) {
                        println!("{token}");
                    }
                    last_char = char_index;
                }
            }
            Some(PlaybackState::Finished | PlaybackState::Cancelled) | None => break,
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    Ok(())
}
