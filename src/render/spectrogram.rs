use super::color::{self, Rgb, Theme};
use crate::session::DisplayConfig;

/// Pixels scrolled (and painted) per tick.
pub const COLUMN_WIDTH: usize = 3;
/// Fraction of the spectrum shown: the top 30% of bins is discarded as
/// out-of-band noise for visualization purposes.
pub const ACTIVE_BAND_FRACTION: f32 = 0.7;
/// Marker bands are 4 pixels tall, centered on the target row.
const MARKER_HALF_HEIGHT: i32 = 2;
/// The "formant" band sits a fixed 30 px above the pitch band. It is a
/// decorative indicator, not a resonance estimate.
const FORMANT_OFFSET_PX: i32 = 30;

/// Rolling spectral-energy image. Newest data sits at the right edge.
///
/// Storage is a column ring: pixels are kept column-major and `head` names
/// the physical column currently shown at the left edge, so a scroll is a
/// head advance plus a clear of the recycled columns. Reads and writes never
/// overlap the way an in-place blit would.
pub struct SpectrogramRenderer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    head: usize,
    theme: Theme,
}

impl SpectrogramRenderer {
    /// Starts unsized; ticks are no-ops until `resize` establishes a buffer.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            head: 0,
            theme: Theme::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_sized(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Reallocate to `width` x `height` and clear to the background color.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.head = 0;
        self.pixels = vec![self.theme.background(); width * height];
    }

    fn clear(&mut self) {
        self.head = 0;
        self.pixels.fill(self.theme.background());
    }

    /// Logical pixel at (x, y), with x = 0 the oldest (leftmost) column.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        debug_assert!(x < self.width && y < self.height);
        let column = (self.head + x) % self.width;
        self.pixels[column * self.height + y]
    }

    fn paint(&mut self, x: usize, y: usize, value: Rgb) {
        let column = (self.head + x) % self.width;
        self.pixels[column * self.height + y] = value;
    }

    /// Scroll one tick and paint the new right-edge column from the
    /// frequency vector, plus pitch/formant marker bands when requested.
    pub fn render_column(
        &mut self,
        freq: &[u8],
        pitch_hz: Option<f32>,
        nyquist_hz: f32,
        config: &DisplayConfig,
    ) {
        if !config.spectrogram_enabled || !self.is_sized() {
            return;
        }
        if config.theme != self.theme {
            self.theme = config.theme;
            self.clear();
        }

        let slice = COLUMN_WIDTH.min(self.width);
        self.scroll(slice);

        let active_bins = (freq.len() as f32 * ACTIVE_BAND_FRACTION).floor() as usize;
        assert!(active_bins < freq.len(), "frequency vector too short");

        for y in 0..self.height {
            let percent = 1.0 - y as f32 / self.height as f32;
            let bin = (percent * active_bins as f32).floor() as usize;
            let value = color::bin_color(freq[bin], self.theme);
            for dx in 0..slice {
                self.paint(self.width - slice + dx, y, value);
            }
        }

        // Overlays share the restricted 70%-of-spectrum vertical axis so the
        // pitch band lines up with the energy it belongs to.
        if let Some(pitch) = pitch_hz {
            let pitch_y = self.height as f32
                - (pitch / (nyquist_hz * ACTIVE_BAND_FRACTION)) * self.height as f32;
            if pitch_y > 0.0 && pitch_y < self.height as f32 {
                let pitch_y = pitch_y as i32;
                if config.show_pitch_overlay {
                    self.paint_marker_band(pitch_y, self.theme.pitch_marker(), slice);
                }
                if config.show_formant_overlay {
                    self.paint_marker_band(
                        pitch_y - FORMANT_OFFSET_PX,
                        self.theme.formant_marker(),
                        slice,
                    );
                }
            }
        }
    }

    /// Advance the ring head by `columns`, blanking each recycled column so
    /// it reappears empty at the right edge.
    fn scroll(&mut self, columns: usize) {
        let background = self.theme.background();
        for _ in 0..columns {
            let base = self.head * self.height;
            self.pixels[base..base + self.height].fill(background);
            self.head = (self.head + 1) % self.width;
        }
    }

    fn paint_marker_band(&mut self, center_y: i32, value: Rgb, slice: usize) {
        for y in (center_y - MARKER_HALF_HEIGHT)..(center_y + MARKER_HALF_HEIGHT) {
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            for dx in 0..slice {
                self.paint(self.width - slice + dx, y as usize, value);
            }
        }
    }

    /// Linearize the ring into a row-major RGBA frame for the consumer
    /// surface (reusing `out`'s allocation).
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.width * self.height * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let Rgb { r, g, b } = self.pixel(x, y);
                out.extend_from_slice(&[r, g, b, 255]);
            }
        }
    }
}

impl Default for SpectrogramRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYQUIST: f32 = 24000.0;
    const F: usize = 1024;

    fn config(theme: Theme) -> DisplayConfig {
        DisplayConfig {
            theme,
            show_pitch_overlay: true,
            show_formant_overlay: true,
            spectrogram_enabled: true,
        }
    }

    fn count_non_background(r: &SpectrogramRenderer, theme: Theme) -> usize {
        let bg = theme.background();
        let mut n = 0;
        for x in 0..r.width() {
            for y in 0..r.height() {
                if r.pixel(x, y) != bg {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn unsized_renderer_ignores_ticks() {
        let mut r = SpectrogramRenderer::new();
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));
        assert!(!r.is_sized());
    }

    #[test]
    fn disabled_config_is_a_no_op() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        let mut cfg = config(Theme::Dark);
        cfg.spectrogram_enabled = false;
        r.render_column(&[200; F], None, NYQUIST, &cfg);
        assert_eq!(count_non_background(&r, Theme::Dark), 0);
    }

    #[test]
    fn zero_energy_ticks_leave_background_forever() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        for _ in 0..200 {
            r.render_column(&[0; F], None, NYQUIST, &config(Theme::Dark));
        }
        assert_eq!(count_non_background(&r, Theme::Dark), 0);
    }

    #[test]
    fn fresh_paint_touches_only_the_new_column() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));

        let bg = Theme::Dark.background();
        for x in 0..60 {
            for y in 0..40 {
                let inside_new_column = x >= 60 - COLUMN_WIDTH;
                assert_eq!(r.pixel(x, y) != bg, inside_new_column, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn column_scrolls_left_over_ticks() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));
        r.render_column(&[0; F], None, NYQUIST, &config(Theme::Dark));

        let bg = Theme::Dark.background();
        // The painted column moved COLUMN_WIDTH pixels left; the right edge
        // is blank again.
        assert_ne!(r.pixel(60 - COLUMN_WIDTH - 1, 20), bg);
        assert_eq!(r.pixel(60 - 1, 20), bg);
    }

    #[test]
    fn painted_column_uses_the_dark_mapping() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));
        assert_eq!(r.pixel(59, 20), Rgb::new(200, 80, 140));
    }

    #[test]
    fn old_columns_fall_off_the_left_edge() {
        let mut r = SpectrogramRenderer::new();
        r.resize(9, 8);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));
        // 9 / 3 = 3 more ticks push the painted column off entirely
        for _ in 0..3 {
            r.render_column(&[0; F], None, NYQUIST, &config(Theme::Dark));
        }
        assert_eq!(count_non_background(&r, Theme::Dark), 0);
    }

    #[test]
    fn theme_change_clears_before_painting() {
        let mut r = SpectrogramRenderer::new();
        r.resize(60, 40);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));
        r.render_column(&[0; F], None, NYQUIST, &config(Theme::Light));

        let bg = Theme::Light.background();
        for x in 0..60 {
            for y in 0..40 {
                assert_eq!(r.pixel(x, y), bg, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn pitch_band_lands_centered_on_the_expected_row() {
        let mut r = SpectrogramRenderer::new();
        let height = 100usize;
        r.resize(30, height);

        let pitch = 840.0f32; // nyquist 24k * 0.7 = 16.8k; y = 100 - 5 = 95
        r.render_column(&[0; F], Some(pitch), NYQUIST, &config(Theme::Dark));

        let marker = Theme::Dark.pitch_marker();
        for y in 93..97 {
            assert_eq!(r.pixel(29, y), marker, "row {y}");
        }
        assert_ne!(r.pixel(29, 92), marker);
        assert_ne!(r.pixel(29, 97), marker);

        // Formant band 30 px above, same width
        let formant = Theme::Dark.formant_marker();
        for y in 63..67 {
            assert_eq!(r.pixel(29, y), formant, "row {y}");
        }
    }

    #[test]
    fn overlay_respects_toggles() {
        let mut r = SpectrogramRenderer::new();
        r.resize(30, 100);
        let mut cfg = config(Theme::Dark);
        cfg.show_pitch_overlay = false;
        cfg.show_formant_overlay = false;
        r.render_column(&[0; F], Some(840.0), NYQUIST, &cfg);
        assert_eq!(count_non_background(&r, Theme::Dark), 0);
    }

    #[test]
    fn off_axis_pitch_draws_no_band() {
        let mut r = SpectrogramRenderer::new();
        r.resize(30, 100);
        // 16.8 kHz maps exactly to y = 0, outside the open interval
        r.render_column(&[0; F], Some(16800.0), NYQUIST, &config(Theme::Dark));
        assert_eq!(count_non_background(&r, Theme::Dark), 0);
    }

    #[test]
    fn rgba_output_is_row_major_with_opaque_alpha() {
        let mut r = SpectrogramRenderer::new();
        r.resize(8, 4);
        r.render_column(&[200; F], None, NYQUIST, &config(Theme::Dark));

        let mut rgba = Vec::new();
        r.write_rgba(&mut rgba);
        assert_eq!(rgba.len(), 8 * 4 * 4);

        // Top-left pixel is background black, right edge carries data
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        let right_edge = 7 * 4; // first row, x = 7
        assert_eq!(&rgba[right_edge..right_edge + 4], &[200, 80, 140, 255]);
    }
}
