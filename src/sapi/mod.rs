//! Speech synthesis and playback through Microsoft's Speech API.
//!
//! SAPI is a COM library. Every object in this module keeps COM initialized on its thread through
//! an [`Apartment`], which is dropped after the COM interfaces it guards.

use windows as Windows;
use Windows::core::{IUnknown, Interface};
use Windows::Win32::Media::Speech::{ISpVoice, SpVoice, SPF_DEFAULT, SPF_IS_NOT_XML};
use Windows::Win32::System::Com::{CoCreateInstance, IStream, CLSCTX_ALL};

use tracing::{debug, warn};

use crate::audio::{AudioFormat, PcmBuffer};
use crate::config::{Rate, Volume};
use crate::error::{IoError, SynthesisError};
use crate::output::AudioDevice;
use crate::tts::{SpeechEngine, VoiceInfo};

mod com;
mod stream;
mod token;
mod voice;

use self::com::Apartment;
use self::stream::MemoryStream;
use self::voice::{voice_info, voice_tokens, VoiceSelector};

/// SAPI engines render PCM between these sample rates.
const SAMPLE_RATES: std::ops::RangeInclusive<u32> = 8000..=48000;

fn create_voice() -> windows::core::Result<ISpVoice> {
    unsafe { CoCreateInstance(&SpVoice, None, CLSCTX_ALL) }
}

/// A SAPI voice that renders speech into memory.
pub struct SapiEngine {
    intf: ISpVoice,
    output: Option<MemoryStream>,
    _apartment: Apartment,
}

impl SapiEngine {
    /// Initializes COM on the current thread and creates a SAPI voice.
    pub fn new() -> Result<Self, SynthesisError> {
        let apartment = Apartment::enter()?;
        Ok(Self {
            intf: create_voice()?,
            output: None,
            _apartment: apartment,
        })
    }
}

impl SpeechEngine for SapiEngine {
    fn installed_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        Ok(voice_tokens(VoiceSelector::new())?.filter_map(|token| voice_info(&token)).collect())
    }

    fn select_voice(&mut self, name: &str) -> Result<(), SynthesisError> {
        let token = voice_tokens(VoiceSelector::new().name_eq(name))?
            .next()
            .ok_or_else(|| SynthesisError::UnknownVoice(name.to_string()))?;
        unsafe { self.intf.SetVoice(token.intf) }?;
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), SynthesisError> {
        unsafe { self.intf.SetVolume(volume.sapi_value()) }?;
        Ok(())
    }

    fn set_rate(&mut self, rate: Rate) -> Result<(), SynthesisError> {
        unsafe { self.intf.SetRate(rate.value()) }?;
        Ok(())
    }

    fn supports_format(&self, format: &AudioFormat) -> bool {
        SAMPLE_RATES.contains(&format.sample_rate)
    }

    fn bind_memory_output(&mut self, format: &AudioFormat) -> Result<(), SynthesisError> {
        let stream = MemoryStream::new(None)?;
        let output: IUnknown = stream.with_format(format)?.cast()?;
        unsafe { self.intf.SetOutput(Some(output), false) }?;
        self.output = Some(stream);
        debug!(format = %format, "bound SAPI output to memory");
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<(), SynthesisError> {
        unsafe { self.intf.Speak(text, SPF_IS_NOT_XML.0 as u32) }?;
        Ok(())
    }

    fn take_output(&mut self) -> Result<Vec<u8>, SynthesisError> {
        match &self.output {
            Some(stream) => Ok(stream.read_all()?),
            None => Err(SynthesisError::Engine("the output is not bound".to_string())),
        }
    }

    fn release_output(&mut self) {
        if let Err(err) = unsafe { self.intf.SetOutput(None::<IUnknown>, true) } {
            warn!(%err, "failed to release SAPI output");
        }
        self.output = None;
    }
}

/// Plays PCM audio on the default output device through a SAPI voice.
pub struct SapiDevice {
    intf: ISpVoice,
    _apartment: Apartment,
}

impl SapiDevice {
    /// Initializes COM on the current thread and opens the default audio output.
    pub fn new() -> windows::core::Result<Self> {
        let apartment = Apartment::enter()?;
        Ok(Self {
            intf: create_voice()?,
            _apartment: apartment,
        })
    }

    fn play_stream(&self, buffer: &PcmBuffer) -> windows::core::Result<()> {
        let memory = MemoryStream::new(Some(buffer.data()))?;
        let stream: IStream = memory.with_format(buffer.format())?.cast()?;
        unsafe { self.intf.SpeakStream(stream, SPF_DEFAULT.0 as u32) }?;
        Ok(())
    }
}

impl AudioDevice for SapiDevice {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), IoError> {
        self.play_stream(buffer).map_err(|err| IoError::Playback(err.to_string()))
    }
}
