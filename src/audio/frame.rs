/// One tick's worth of analyser output.
///
/// Both windows use the unsigned-byte convention of the capture surface:
/// time-domain samples are centered at 128 (spanning [-1, 1]) and frequency
/// magnitudes span 0-255. A frame is only valid for the tick that produced
/// it; the pipeline reads it and lets it go.
#[derive(Clone, Debug)]
pub struct AudioFrame {
    /// Time-domain sample window, length T.
    pub time: Vec<u8>,
    /// Frequency-magnitude vector, length T/2.
    pub freq: Vec<u8>,
    pub sample_rate: u32,
}

impl AudioFrame {
    /// Mismatched window lengths mean the capture side is broken; continuing
    /// would silently corrupt the spectrogram scroll, so fail fast.
    pub fn new(time: Vec<u8>, freq: Vec<u8>, sample_rate: u32) -> Self {
        assert!(!time.is_empty(), "empty time window");
        assert_eq!(
            freq.len(),
            time.len() / 2,
            "frequency vector must be half the time window"
        );
        assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            time,
            freq,
            sample_rate,
        }
    }

    pub fn window_size(&self) -> usize {
        self.time.len()
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }
}
