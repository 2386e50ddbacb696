use serde::Deserialize;
use std::path::PathBuf;

use crate::render::color::Theme;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_crf")]
    pub crf: u32,
    #[serde(default = "default_codec")]
    pub codec: String,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub pitch_overlay: bool,
    #[serde(default = "default_true")]
    pub formant_overlay: bool,
    #[serde(default = "default_true")]
    pub spectrogram: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            crf: default_crf(),
            codec: default_codec(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            pitch_overlay: true,
            formant_overlay: true,
            spectrogram: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            smoothing: default_smoothing(),
        }
    }
}

fn default_width() -> usize { 960 }
fn default_height() -> usize { 540 }
fn default_fps() -> u32 { 60 }
fn default_crf() -> u32 { 18 }
fn default_codec() -> String { "libx264".into() }
fn default_window_size() -> usize { 2048 }
fn default_smoothing() -> f32 { 0.5 }
fn default_true() -> bool { true }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.output.width, 960);
        assert_eq!(config.output.fps, 60);
        assert_eq!(config.analysis.window_size, 2048);
        assert_eq!(config.display.theme, Theme::Dark);
        assert!(config.display.pitch_overlay);
    }

    #[test]
    fn partial_sections_keep_sibling_defaults() {
        let config: Config = toml::from_str(
            r#"
            [display]
            theme = "light"
            formant_overlay = false
            "#,
        )
        .unwrap();
        assert_eq!(config.display.theme, Theme::Light);
        assert!(!config.display.formant_overlay);
        assert!(config.display.pitch_overlay);
        assert_eq!(config.output.height, 540);
    }
}
