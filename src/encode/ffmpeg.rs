use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

pub struct EncoderSettings<'a> {
    pub width: usize,
    pub height: usize,
    pub fps: u32,
    pub codec: &'a str,
    pub pix_fmt: &'a str,
    pub crf: u32,
    pub bitrate: Option<&'a str>,
}

/// Pipes raw RGBA spectrogram frames into an ffmpeg child process and muxes
/// the source audio alongside them.
pub struct FfmpegEncoder {
    child: Child,
}

impl FfmpegEncoder {
    pub fn spawn(output: &Path, source_audio: &Path, settings: &EncoderSettings) -> Result<Self> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pixel_format".into(),
            "rgba".into(),
            "-video_size".into(),
            format!("{}x{}", settings.width, settings.height),
            "-framerate".into(),
            settings.fps.to_string(),
            "-i".into(),
            "pipe:0".into(),
            "-i".into(),
            source_audio.display().to_string(),
            "-c:v".into(),
            settings.codec.to_string(),
            "-pix_fmt".into(),
            settings.pix_fmt.to_string(),
        ];

        match settings.bitrate {
            Some(bitrate) => args.extend(["-b:v".into(), bitrate.to_string()]),
            None => args.extend([
                "-crf".into(),
                settings.crf.to_string(),
                "-preset".into(),
                "medium".into(),
            ]),
        }

        args.extend([
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            "192k".into(),
            "-shortest".into(),
            output.display().to_string(),
        ]);

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn ffmpeg. Is ffmpeg installed?")?;

        log::info!(
            "FFmpeg encoder started: {}x{} @ {}fps, codec={}",
            settings.width,
            settings.height,
            settings.fps,
            settings.codec
        );

        Ok(Self { child })
    }

    pub fn write_frame(&mut self, rgba: &[u8]) -> Result<()> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .context("FFmpeg stdin not available")?;
        stdin
            .write_all(rgba)
            .context("Failed to write frame to ffmpeg")?;
        Ok(())
    }

    /// Close the frame pipe and wait for the encode to finish.
    pub fn finish(mut self) -> Result<()> {
        drop(self.child.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .context("Failed to wait for ffmpeg")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("FFmpeg exited with error:\n{}", stderr);
        }

        log::info!("FFmpeg encoding complete");
        Ok(())
    }
}
