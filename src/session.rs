use crate::audio::analysis;
use crate::audio::frame::AudioFrame;
use crate::audio::stats::{self, PitchSummary};
use crate::audio::waveform;
use crate::render::color::Theme;
use crate::render::spectrogram::SpectrogramRenderer;

/// Rendering parameters supplied by the caller, possibly changing between
/// ticks. Purely a display concern; analysis never reads it.
#[derive(Clone, Copy, Debug)]
pub struct DisplayConfig {
    pub theme: Theme,
    pub show_pitch_overlay: bool,
    pub show_formant_overlay: bool,
    pub spectrogram_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_pitch_overlay: true,
            show_formant_overlay: true,
            spectrogram_enabled: true,
        }
    }
}

/// What one tick hands back to the driver.
#[derive(Clone, Debug)]
pub struct TickResult {
    pub loudness_db: f32,
    pub pitch_hz: Option<f32>,
    /// Downsampled time window for the external chart surface.
    pub waveform: Vec<u8>,
}

/// One recording-or-playback episode. Owns all mutable pipeline state (the
/// pitch log and the spectrogram buffer); the driver owns the session and
/// feeds it one frame per display tick.
pub struct Session {
    window_size: usize,
    pitch_log: Vec<f32>,
    spectrogram: SpectrogramRenderer,
    active: bool,
}

impl Session {
    pub fn new(window_size: usize) -> Self {
        assert!(
            window_size >= waveform::DISPLAY_POINTS && window_size % 2 == 0,
            "invalid analysis window size"
        );
        Self {
            window_size,
            pitch_log: Vec::new(),
            spectrogram: SpectrogramRenderer::new(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Session start: the log resets here and only here.
    pub fn begin(&mut self) {
        self.reset_log();
        self.active = true;
    }

    /// Session end: stop accepting ticks and reduce the accumulated log.
    pub fn end(&mut self) -> Option<PitchSummary> {
        self.active = false;
        self.summarize()
    }

    pub fn reset_log(&mut self) {
        self.pitch_log.clear();
    }

    /// Clears the buffer to background; pixels survive only between resizes.
    pub fn resize_spectrogram(&mut self, width: usize, height: usize) {
        self.spectrogram.resize(width, height);
    }

    pub fn summarize(&self) -> Option<PitchSummary> {
        stats::summarize(&self.pitch_log)
    }

    pub fn spectrogram(&self) -> &SpectrogramRenderer {
        &self.spectrogram
    }

    /// Run one full analysis-and-render pass. Returns `None` without touching
    /// any state when the session is no longer active (defensive check: the
    /// scheduler may still fire after a stop).
    pub fn tick(&mut self, frame: &AudioFrame, config: &DisplayConfig) -> Option<TickResult> {
        if !self.active {
            return None;
        }
        assert_eq!(
            frame.window_size(),
            self.window_size,
            "frame does not match the session window size"
        );

        let analysis = analysis::analyze(frame, &mut self.pitch_log);
        self.spectrogram
            .render_column(&frame.freq, analysis.pitch_hz, frame.nyquist(), config);
        let waveform = waveform::downsample(&frame.time, waveform::DISPLAY_POINTS);

        Some(TickResult {
            loudness_db: analysis.loudness_db,
            pitch_hz: analysis.pitch_hz,
            waveform,
        })
    }
}
