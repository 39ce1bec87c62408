use wasm_bindgen::prelude::*;

use morsewave_core::{Charset, DecodeSession, Sensitivity, SessionConfig, SpeedMode};

/// One adaptive decode session. The host owns acquisition (microphone
/// analyser, camera luma scan, or key events) and feeds normalized
/// levels with `performance.now()` timestamps; a separate instance per
/// input keeps modalities fully independent.
#[wasm_bindgen]
pub struct WasmDecodeSession {
    inner: DecodeSession,
}

#[wasm_bindgen]
impl WasmDecodeSession {
    /// `manual_wpm` of 0 selects automatic speed estimation.
    #[wasm_bindgen(constructor)]
    pub fn new(sensitivity: f64, manual_wpm: u32) -> Result<WasmDecodeSession, JsValue> {
        let speed = if manual_wpm == 0 {
            SpeedMode::Auto
        } else {
            SpeedMode::manual(manual_wpm).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let config = SessionConfig {
            sensitivity: Sensitivity::new(sensitivity),
            speed,
            charset: Charset::International,
        };
        Ok(WasmDecodeSession {
            inner: DecodeSession::new(config),
        })
    }

    /// Feed one level sample; returns true when it completed an edge.
    pub fn push_sample(&mut self, level: f64, now_ms: f64) -> bool {
        self.inner.push_sample(level, now_ms).is_some()
    }

    /// Returns a fresh transcript when a silence boundary re-render is
    /// due, to be called from the host's timer loop.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        self.inner.poll(now_ms)
    }

    pub fn morse(&self, now_ms: f64) -> String {
        self.inner.morse(now_ms)
    }

    pub fn text(&self, now_ms: f64) -> String {
        self.inner.decoded_text(now_ms)
    }

    pub fn estimated_wpm(&self) -> u32 {
        self.inner.estimated_wpm()
    }

    /// Whether the signal is currently above threshold, for level-meter
    /// display.
    pub fn is_keyed(&self) -> bool {
        self.inner.is_keyed()
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.inner.set_sensitivity(Sensitivity::new(sensitivity));
    }

    pub fn stop(&mut self, now_ms: f64) {
        self.inner.stop(now_ms);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Encode text into a Morse string
#[wasm_bindgen]
pub fn encode_text(text: &str, wabun: bool) -> String {
    morsewave_core::encode_text(text, charset(wabun))
}

/// Decode a Morse string back into text
#[wasm_bindgen]
pub fn decode_morse(morse: &str, wabun: bool) -> String {
    morsewave_core::decode_morse(morse, charset(wabun))
}

fn charset(wabun: bool) -> Charset {
    if wabun {
        Charset::Wabun
    } else {
        Charset::International
    }
}
