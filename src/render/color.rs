use clap::ValueEnum;
use serde::Deserialize;

/// Frequency bins at or below this byte intensity are treated as "no signal"
/// and painted as background, not as a dim color.
pub const INTENSITY_FLOOR: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const BLACK: Rgb = Rgb::new(0, 0, 0);
const WHITE: Rgb = Rgb::new(255, 255, 255);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Neon-on-black.
    #[default]
    Dark,
    /// Grayscale-on-white, higher energy = darker.
    Light,
}

impl Theme {
    pub fn background(self) -> Rgb {
        match self {
            Theme::Dark => BLACK,
            Theme::Light => WHITE,
        }
    }

    pub fn pitch_marker(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(0xfa, 0xcc, 0x15),  // yellow
            Theme::Light => Rgb::new(0x25, 0x63, 0xeb), // blue
        }
    }

    pub fn formant_marker(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(0xf8, 0x71, 0x71),  // light red
            Theme::Light => Rgb::new(0xdc, 0x26, 0x26), // dark red
        }
    }
}

/// Map a frequency-bin byte intensity to a themed pixel color.
pub fn bin_color(value: u8, theme: Theme) -> Rgb {
    if value <= INTENSITY_FLOOR {
        return theme.background();
    }
    match theme {
        Theme::Dark => Rgb::new(
            value,
            (value as f32 * 0.4).round() as u8,
            (value as f32 * 0.7).round() as u8,
        ),
        Theme::Light => {
            let v = 255 - value;
            Rgb::new(v, v, v)
        }
    }
}
