pub mod color;
pub mod spectrogram;
