//! RIFF/WAVE framing of PCM buffers.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::{AudioFormat, BitsPerSample, Channels, PcmBuffer};
use crate::error::IoError;

/// Frames the buffer as a complete WAV file image.
pub fn encode(buffer: &PcmBuffer) -> Result<Vec<u8>, IoError> {
    let mut cursor = Cursor::new(Vec::with_capacity(buffer.data().len() + 44));
    let mut writer = WavWriter::new(&mut cursor, buffer.format().wav_spec())?;
    for sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Parses a WAV image back into a buffer.
pub fn decode<R: Read>(source: R) -> Result<PcmBuffer, IoError> {
    read_all(WavReader::new(source)?)
}

/// Reads a WAV file into a buffer.
pub fn read<P: AsRef<Path>>(path: P) -> Result<PcmBuffer, IoError> {
    read_all(WavReader::open(path)?)
}

fn read_all<R: Read>(mut reader: WavReader<R>) -> Result<PcmBuffer, IoError> {
    let format = audio_format(&reader.spec())?;
    let samples = reader.samples::<i32>().collect::<Result<Vec<_>, _>>()?;
    Ok(PcmBuffer::from_samples(samples, format))
}

pub(super) fn audio_format(spec: &WavSpec) -> Result<AudioFormat, IoError> {
    let bits_per_sample = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => BitsPerSample::Bits8,
        (SampleFormat::Int, 16) => BitsPerSample::Bits16,
        _ => return Err(hound::Error::Unsupported.into()),
    };
    let channels = match spec.channels {
        1 => Channels::Mono,
        2 => Channels::Stereo,
        _ => return Err(hound::Error::Unsupported.into()),
    };
    Ok(AudioFormat {
        sample_rate: spec.sample_rate,
        bits_per_sample,
        channels,
    })
}
