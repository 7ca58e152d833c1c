//! PCM audio buffers and the format they are rendered in.

mod buffer;
mod format;

pub use buffer::PcmBuffer;
pub use format::{AudioFormat, BitsPerSample, Channels, DEFAULT_SAMPLE_RATE};
