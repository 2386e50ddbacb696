pub mod analysis;
pub mod decode;
pub mod frame;
pub mod source;
pub mod stats;
pub mod waveform;
