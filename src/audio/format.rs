use std::fmt;

/// The sample rate the tool renders at unless told otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 16025;

/// How many bits each sample should have.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[allow(missing_docs)]
pub enum BitsPerSample {
    Bits8 = 8,
    Bits16 = 16,
}

impl BitsPerSample {
    /// Returns the sample width in bytes.
    pub fn bytes(self) -> usize {
        (self as usize) / 8
    }
}

/// Number of audio channels.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[allow(missing_docs)]
pub enum Channels {
    Mono = 1,
    Stereo = 2,
}

/// Specifies the format of the PCM data produced by the synthesizer.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct AudioFormat {
    /// Samples per second, per channel.
    pub sample_rate: u32,
    /// How many bits each sample should have.
    pub bits_per_sample: BitsPerSample,
    /// Number of channels.
    pub channels: Channels,
}

impl AudioFormat {
    /// Number of bytes in one frame, i.e. one sample for every channel.
    pub fn block_align(&self) -> usize {
        (self.channels as usize) * self.bits_per_sample.bytes()
    }

    /// Number of bytes consumed by one second of audio.
    pub fn bytes_per_second(&self) -> usize {
        (self.sample_rate as usize) * self.block_align()
    }

    pub(crate) fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels as u16,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample as u16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[cfg(windows)]
    pub(crate) fn to_sapi(&self) -> windows::Win32::Media::Audio::WAVEFORMATEX {
        use windows::Win32::Media::Audio::{WAVEFORMATEX, WAVE_FORMAT_PCM};

        let block_align = self.block_align() as u32;
        WAVEFORMATEX {
            wFormatTag: WAVE_FORMAT_PCM as _,
            nChannels: self.channels as u16,
            nSamplesPerSec: self.sample_rate,
            nAvgBytesPerSec: self.sample_rate * block_align,
            nBlockAlign: block_align as u16,
            wBitsPerSample: self.bits_per_sample as u16,
            cbSize: 0,
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: BitsPerSample::Bits16,
            channels: Channels::Mono,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {}-bit, {}",
            self.sample_rate,
            self.bits_per_sample as u16,
            match self.channels {
                Channels::Mono => "mono",
                Channels::Stereo => "stereo",
            }
        )
    }
}
