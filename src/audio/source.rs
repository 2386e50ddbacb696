use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::frame::AudioFrame;

// Byte conversion range for frequency magnitudes: dB values in
// [MIN_DECIBELS, MAX_DECIBELS] map linearly onto [0, 255].
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;
const MAGNITUDE_EPSILON: f32 = 1.0e-10;

/// Offline stand-in for a live analyser tap: given the full decoded sample
/// stream, it materializes the byte-valued time window and smoothed
/// frequency-magnitude vector for any tick position.
pub struct AnalyserTap {
    window_size: usize,
    sample_rate: u32,
    smoothing: f32,
    hann: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    /// Per-bin linear magnitudes carried across ticks for smoothing.
    smoothed: Vec<f32>,
    window_scratch: Vec<f32>,
}

impl AnalyserTap {
    pub fn new(window_size: usize, sample_rate: u32, smoothing: f32) -> Self {
        assert!(
            window_size.is_power_of_two() && window_size >= 32,
            "window size must be a power of two"
        );
        assert!(sample_rate > 0, "sample rate must be positive");
        let smoothing = smoothing.clamp(0.0, 0.99);

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window_size);
        let hann = hann_window(window_size);

        Self {
            window_size,
            sample_rate,
            smoothing,
            hann,
            fft,
            smoothed: vec![0.0; window_size / 2],
            window_scratch: vec![0.0; window_size],
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Drop smoothing history, e.g. when a new stream starts.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Produce the frame for the window starting at sample `pos`. Positions
    /// past the end of the stream yield a (partially) zero-padded window.
    pub fn frame_at(&mut self, samples: &[f32], pos: usize) -> AudioFrame {
        self.window_scratch.fill(0.0);
        if pos < samples.len() {
            let end = (pos + self.window_size).min(samples.len());
            self.window_scratch[..end - pos].copy_from_slice(&samples[pos..end]);
        }

        let time: Vec<u8> = self
            .window_scratch
            .iter()
            .map(|&x| (x.clamp(-1.0, 1.0) * 128.0 + 128.0).clamp(0.0, 255.0) as u8)
            .collect();

        let freq = self.magnitude_bytes();

        AudioFrame::new(time, freq, self.sample_rate)
    }

    fn magnitude_bytes(&mut self) -> Vec<u8> {
        let mut buffer: Vec<Complex<f32>> = self
            .window_scratch
            .iter()
            .zip(&self.hann)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        // Normalize by the window sum so a full-scale sine peaks near 0 dBFS.
        let norm = 2.0 / self.hann.iter().sum::<f32>();
        let tau = self.smoothing;
        for (slot, value) in self.smoothed.iter_mut().zip(&buffer) {
            let magnitude = value.norm() * norm;
            *slot = tau * *slot + (1.0 - tau) * magnitude;
        }

        self.smoothed
            .iter()
            .map(|&m| {
                let db = 20.0 * m.max(MAGNITUDE_EPSILON).log10();
                let scaled = (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS) * 255.0;
                scaled.clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 48000;

    #[test]
    fn silence_maps_to_centered_time_bytes_and_dark_spectrum() {
        let mut tap = AnalyserTap::new(1024, SR, 0.0);
        let frame = tap.frame_at(&vec![0.0; 4096], 0);
        assert!(frame.time.iter().all(|&b| b == 128));
        assert!(frame.freq.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_at_a_bin_peaks_at_that_bin() {
        let size = 1024usize;
        let bin = 40usize;
        let samples: Vec<f32> = (0..size)
            .map(|i| (std::f32::consts::TAU * bin as f32 * i as f32 / size as f32).sin() * 0.8)
            .collect();

        let mut tap = AnalyserTap::new(size, SR, 0.0);
        let frame = tap.frame_at(&samples, 0);

        let peak = frame
            .freq
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (peak as i64 - bin as i64).abs() <= 1,
            "peak at {peak}, expected near {bin}"
        );
        assert!(frame.freq[bin] > frame.freq[bin + 100]);
    }

    #[test]
    fn smoothing_carries_energy_across_ticks() {
        // Amplitude low enough that neither tick saturates the byte range.
        let size = 1024usize;
        let samples: Vec<f32> = (0..size)
            .map(|i| (std::f32::consts::TAU * 40.0 * i as f32 / size as f32).sin() * 0.02)
            .collect();

        let mut tap = AnalyserTap::new(size, SR, 0.5);
        let loud = tap.frame_at(&samples, 0);
        // A tick of silence after the tone: smoothed bins must not drop to
        // zero immediately.
        let decayed = tap.frame_at(&vec![0.0; size], 0);
        assert!(decayed.freq[40] > 0);
        assert!(decayed.freq[40] < loud.freq[40]);
    }

    #[test]
    fn window_past_stream_end_is_zero_padded() {
        let mut tap = AnalyserTap::new(1024, SR, 0.0);
        let frame = tap.frame_at(&vec![0.5; 100], 0);
        assert_eq!(frame.time[0], 192);
        assert!(frame.time[100..].iter().all(|&b| b == 128));
    }
}
