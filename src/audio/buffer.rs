use std::time::Duration;

use super::{AudioFormat, BitsPerSample};

/// Raw PCM audio together with the format it was rendered in.
///
/// Samples are interleaved. 16-bit samples are signed little-endian, 8-bit samples are unsigned,
/// the same layout a WAV file uses.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PcmBuffer {
    data: Vec<u8>,
    format: AudioFormat,
}

impl PcmBuffer {
    /// Wraps the given bytes. A trailing partial frame is dropped.
    pub fn new(mut data: Vec<u8>, format: AudioFormat) -> Self {
        let whole = data.len() - data.len() % format.block_align();
        data.truncate(whole);
        Self {
            data,
            format,
        }
    }

    /// Builds a buffer from signed sample values, one per channel per frame. 8-bit values must
    /// fit in `i8`, 16-bit values in `i16`; out-of-range values are saturated.
    pub fn from_samples<I: IntoIterator<Item = i32>>(samples: I, format: AudioFormat) -> Self {
        let mut data = Vec::new();
        for sample in samples {
            match format.bits_per_sample {
                BitsPerSample::Bits8 => {
                    let value = sample.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
                    data.push((value as u8) ^ 0x80);
                }
                BitsPerSample::Bits16 => {
                    let value = sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
                    data.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
        Self::new(data, format)
    }

    /// The format of the audio data.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// The raw audio bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of individual samples, counting every channel.
    pub fn sample_count(&self) -> usize {
        self.data.len() / self.format.bits_per_sample.bytes()
    }

    /// Number of frames, i.e. samples per channel.
    pub fn frame_count(&self) -> usize {
        self.data.len() / self.format.block_align()
    }

    /// Playback length of the buffer.
    pub fn duration(&self) -> Duration {
        if self.format.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count() as f64 / self.format.sample_rate as f64)
    }

    /// Returns `true` if the buffer holds no audio.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over the samples as signed values in the buffer's native width.
    pub fn samples(&self) -> impl Iterator<Item = i32> + '_ {
        let width = self.format.bits_per_sample;
        self.data.chunks_exact(width.bytes()).map(move |chunk| match width {
            BitsPerSample::Bits8 => ((chunk[0] ^ 0x80) as i8) as i32,
            BitsPerSample::Bits16 => i16::from_le_bytes([chunk[0], chunk[1]]) as i32,
        })
    }

    /// Consumes the buffer, returning the raw bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
