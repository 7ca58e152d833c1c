//! MP3 encoding through LAME.
//!
//! The PCM buffer is framed as WAV and read back through a [`WavReader`], so the encoder consumes
//! exactly what a WAV file of the same buffer would contain.

use std::fmt::Debug;
use std::io::Cursor;

use hound::WavReader;
use mp3lame_encoder::{
    max_required_buffer_size, Builder, Encoder, EncoderInput, FlushNoGap, InterleavedPcm,
    MonoPcm, Quality, VbrMode,
};
use tracing::debug;

use crate::audio::{Channels, PcmBuffer};
use crate::error::IoError;

use super::wav;

/// Frames fed to the encoder per call.
const CHUNK_FRAMES: usize = 4096;

/// LAME's `-V 1` setting, the "VBR 90" high quality preset.
const VBR_QUALITY: Quality = Quality::SecondBest;

/// Encodes the buffer as a complete VBR MP3 file image. An empty buffer is an error.
pub fn encode(buffer: &PcmBuffer) -> Result<Vec<u8>, IoError> {
    if buffer.is_empty() {
        return Err(IoError::Encoder("there is no audio to encode".to_string()));
    }
    let mut reader = WavReader::new(Cursor::new(wav::encode(buffer)?))?;
    let spec = reader.spec();
    let format = wav::audio_format(&spec)?;
    let channels = format.channels;

    let mut builder = Builder::new()
        .ok_or_else(|| IoError::Encoder("cannot allocate the LAME encoder".to_string()))?;
    builder.set_num_channels(channels as u8).map_err(encoder_error)?;
    builder.set_sample_rate(spec.sample_rate).map_err(encoder_error)?;
    builder.set_vbr_mode(VbrMode::Mtrh).map_err(encoder_error)?;
    builder.set_vbr_quality(VBR_QUALITY).map_err(encoder_error)?;
    let mut encoder = builder.build().map_err(encoder_error)?;

    // LAME takes 16-bit input; 8-bit samples are widened
    let shift = 16 - spec.bits_per_sample as u32;
    let chunk_samples = CHUNK_FRAMES * channels as usize;

    let mut mp3 = Vec::new();
    let mut chunk = Vec::with_capacity(chunk_samples);
    let mut samples = reader.samples::<i32>();
    loop {
        chunk.clear();
        for sample in samples.by_ref().take(chunk_samples) {
            chunk.push((sample? << shift) as i16);
        }
        if chunk.is_empty() {
            break;
        }
        match channels {
            Channels::Mono => encode_chunk(&mut encoder, MonoPcm(&chunk), chunk.len(), &mut mp3)?,
            Channels::Stereo => {
                encode_chunk(&mut encoder, InterleavedPcm(&chunk), chunk.len(), &mut mp3)?
            }
        }
    }

    mp3.reserve(max_required_buffer_size(0));
    let flushed = encoder.flush::<FlushNoGap>(mp3.spare_capacity_mut()).map_err(encoder_error)?;
    unsafe {
        mp3.set_len(mp3.len() + flushed);
    }

    debug!(pcm_bytes = buffer.data().len(), mp3_bytes = mp3.len(), "encoded mp3");
    Ok(mp3)
}

fn encode_chunk<I: EncoderInput>(
    encoder: &mut Encoder,
    input: I,
    samples: usize,
    out: &mut Vec<u8>,
) -> Result<(), IoError> {
    out.reserve(max_required_buffer_size(samples));
    let encoded = encoder.encode(input, out.spare_capacity_mut()).map_err(encoder_error)?;
    unsafe {
        out.set_len(out.len() + encoded);
    }
    Ok(())
}

fn encoder_error<E: Debug>(err: E) -> IoError {
    IoError::Encoder(format!("{:?}", err))
}
