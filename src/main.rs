mod audio;
mod cli;
mod config;
mod encode;
mod render;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use audio::source::AnalyserTap;
use cli::Cli;
use encode::ffmpeg::{EncoderSettings, FfmpegEncoder};
use session::{DisplayConfig, Session};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect voxscope.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("voxscope.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("voxscope").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("voxscope").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.width == 960 {
                cli.width = cfg.output.width;
            }
            if cli.height == 540 {
                cli.height = cfg.output.height;
            }
            if cli.fps == 60 {
                cli.fps = cfg.output.fps;
            }
            if cli.crf == 18 {
                cli.crf = cfg.output.crf;
            }
            if cli.codec == "libx264" {
                cli.codec = cfg.output.codec;
            }
            if cli.window_size == 2048 {
                cli.window_size = cfg.analysis.window_size;
            }
            if cli.smoothing == 0.5 {
                cli.smoothing = cfg.analysis.smoothing;
            }
            if cli.theme == render::color::Theme::Dark {
                cli.theme = cfg.display.theme;
            }
            if !cli.no_pitch_overlay {
                cli.no_pitch_overlay = !cfg.display.pitch_overlay;
            }
            if !cli.no_formant_overlay {
                cli.no_formant_overlay = !cfg.display.formant_overlay;
            }
            if !cli.no_spectrogram {
                cli.no_spectrogram = !cfg.display.spectrogram;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("voxscope - voice loudness/pitch analyzer");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "Spectrogram: {}x{} @ {} ticks/s, window {}",
        cli.width,
        cli.height,
        cli.fps,
        cli.window_size
    );

    // 1. Decode audio
    log::info!("Decoding audio...");
    let decoded = audio::decode::decode_audio(input)?;
    let total_ticks = (decoded.duration_secs() * cli.fps as f32).ceil() as usize;

    // 2. Analyser tap (frame source) and session
    let mut tap = AnalyserTap::new(cli.window_size, decoded.sample_rate, cli.smoothing);
    let display = DisplayConfig {
        theme: cli.theme,
        show_pitch_overlay: !cli.no_pitch_overlay,
        show_formant_overlay: !cli.no_formant_overlay,
        spectrogram_enabled: !cli.no_spectrogram,
    };

    let mut session = Session::new(tap.window_size());
    session.resize_spectrogram(cli.width, cli.height);
    tap.reset();
    session.begin();

    // 3. Encoder
    let mut encoder = FfmpegEncoder::spawn(
        &cli.output,
        input,
        &EncoderSettings {
            width: cli.width,
            height: cli.height,
            fps: cli.fps,
            codec: &cli.codec,
            pix_fmt: &cli.pix_fmt,
            crf: cli.crf,
            bitrate: cli.bitrate.as_deref(),
        },
    )?;

    // 4. Tick loop
    let pb = ProgressBar::new(total_ticks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let samples_per_tick = decoded.sample_rate as f32 / cli.fps as f32;
    let mut rgba = Vec::new();

    for tick in 0..total_ticks {
        let pos = (tick as f32 * samples_per_tick) as usize;
        let frame = tap.frame_at(&decoded.samples, pos);

        let Some(result) = session.tick(&frame, &display) else {
            break;
        };
        log::debug!(
            "tick {}: {} | {} | {} chart pts",
            tick,
            format_loudness(result.loudness_db),
            format_pitch(result.pitch_hz),
            result.waveform.len()
        );

        session.spectrogram().write_rgba(&mut rgba);
        encoder.write_frame(&rgba)?;
        pb.set_position(tick as u64 + 1);
    }

    pb.finish_with_message("Analysis complete");

    // 5. Session summary
    match session.end() {
        Some(summary) => log::info!(
            "Pitch summary: min {} Hz, max {} Hz, mean {} Hz",
            summary.min_hz,
            summary.max_hz,
            summary.mean_hz
        ),
        None => log::info!("Pitch summary: -- (no voiced ticks above the gate)"),
    }

    // 6. Finish encoding
    log::info!("Finishing encoding...");
    encoder.finish()?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}

fn format_loudness(db: f32) -> String {
    format!("{:.1} dB", db)
}

fn format_pitch(pitch: Option<f32>) -> String {
    match pitch {
        Some(hz) => format!("{:.0} Hz", hz),
        None => "-- Hz".into(),
    }
}
