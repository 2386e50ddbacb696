use clap::Parser;
use std::path::PathBuf;

use crate::render::color::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "voxscope",
    about = "Voice analyzer that renders loudness, pitch and a rolling spectrogram video"
)]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output video file
    #[arg(short, long, default_value = "voxscope.mp4")]
    pub output: PathBuf,

    /// Spectrogram width in pixels
    #[arg(long, default_value_t = 960)]
    pub width: usize,

    /// Spectrogram height in pixels
    #[arg(long, default_value_t = 540)]
    pub height: usize,

    /// Analysis-and-render ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Analysis window size in samples (power of two)
    #[arg(long, default_value_t = 2048)]
    pub window_size: usize,

    /// Temporal smoothing of the magnitude spectrum (0.0-1.0)
    #[arg(long, default_value_t = 0.5)]
    pub smoothing: f32,

    /// Spectrogram color theme
    #[arg(long, value_enum, default_value = "dark")]
    pub theme: Theme,

    /// Hide the pitch marker band
    #[arg(long)]
    pub no_pitch_overlay: bool,

    /// Hide the formant marker band
    #[arg(long)]
    pub no_formant_overlay: bool,

    /// Skip spectrogram painting (analysis and summary still run)
    #[arg(long)]
    pub no_spectrogram: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// H.264 CRF quality (0-51, lower = better). Ignored when --bitrate is set.
    #[arg(long, default_value_t = 18)]
    pub crf: u32,

    /// Video bitrate (e.g. 2400k, 5M). When set, uses -b:v instead of -crf.
    #[arg(short, long)]
    pub bitrate: Option<String>,

    /// FFmpeg video codec
    #[arg(long, default_value = "libx264")]
    pub codec: String,

    /// FFmpeg pixel format
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,
}
