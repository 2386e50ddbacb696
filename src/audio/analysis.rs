use super::frame::AudioFrame;

/// Offset added to raw dBFS so the usable vocal range lands in [0, 100].
pub const LOUDNESS_OFFSET_DB: f32 = 100.0;
/// Loudness below which pitch detection is skipped to avoid noise-floor
/// false positives.
pub const PITCH_GATE_DB: f32 = 40.0;
/// Detected pitch must fall strictly inside this band (Hz).
pub const PITCH_BAND_HZ: (f32, f32) = (50.0, 1000.0);

/// Per-tick analysis of one time-domain window.
#[derive(Clone, Copy, Debug)]
pub struct Analysis {
    /// Display loudness in dB, clamped to [0, 100]. Exactly 0 for silence.
    pub loudness_db: f32,
    /// Zero-crossing pitch estimate, `None` when gated or out of band.
    pub pitch_hz: Option<f32>,
}

/// Analyze one frame: loudness always, pitch only above the gate. A detected
/// pitch is appended to `pitch_log`; gated or out-of-band ticks append
/// nothing.
pub fn analyze(frame: &AudioFrame, pitch_log: &mut Vec<f32>) -> Analysis {
    let loudness_db = loudness_db(&frame.time);

    let mut pitch_hz = None;
    if loudness_db > PITCH_GATE_DB {
        let estimate = zero_crossing_frequency(&frame.time, frame.sample_rate);
        if estimate > PITCH_BAND_HZ.0 && estimate < PITCH_BAND_HZ.1 {
            pitch_log.push(estimate);
            pitch_hz = Some(estimate);
        }
    }

    Analysis {
        loudness_db,
        pitch_hz,
    }
}

#[inline]
fn normalize(byte: u8) -> f32 {
    (byte as f32 - 128.0) / 128.0
}

/// RMS loudness of a byte window, offset into display range. Silence maps to
/// exactly 0 rather than letting log10(0) leak -inf downstream.
pub fn loudness_db(time: &[u8]) -> f32 {
    let mean_square = time
        .iter()
        .map(|&b| {
            let x = normalize(b);
            x * x
        })
        .sum::<f32>()
        / time.len() as f32;
    let rms = mean_square.sqrt();
    if rms == 0.0 {
        return 0.0;
    }
    (20.0 * rms.log10() + LOUDNESS_OFFSET_DB).max(0.0)
}

/// Coarse fundamental estimate: count upward zero crossings across the whole
/// window and assume one crossing per cycle. Only meaningful for
/// quasi-periodic single-pitch input; polyphonic or noisy windows give a poor
/// estimate, which the band filter mostly discards.
pub fn zero_crossing_frequency(time: &[u8], sample_rate: u32) -> f32 {
    let mut crossings = 0u32;
    for pair in time.windows(2) {
        if normalize(pair[0]) < 0.0 && normalize(pair[1]) >= 0.0 {
            crossings += 1;
        }
    }
    crossings as f32 * (sample_rate as f32 / time.len() as f32)
}
