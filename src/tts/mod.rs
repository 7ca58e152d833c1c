//! Speech synthesis into an in-memory PCM buffer.
//!
//! The [`Synthesizer`] drives any [`SpeechEngine`]: it selects a voice, applies loudness and rate,
//! pins the engine to the configured PCM format, and renders the text in one blocking call. The
//! engine's output binding is released on every exit path.

use std::ops::{Deref, DerefMut};

use tracing::{debug, info};

use crate::audio::{AudioFormat, PcmBuffer};
use crate::config::{Rate, RenderConfig, Volume};
use crate::error::SynthesisError;

mod voice;

pub use self::voice::{best_match, VoiceAge, VoiceGender, VoiceInfo};

/// The voice hints used when no voice is named explicitly.
pub const DEFAULT_VOICE_HINTS: (VoiceGender, VoiceAge) = (VoiceGender::Female, VoiceAge::Adult);

/// A text-to-speech engine the [`Synthesizer`] can drive.
///
/// Implementations keep engine-specific configuration paths to themselves. In particular,
/// [`bind_memory_output`](SpeechEngine::bind_memory_output) is the one place where an engine is
/// told to render raw PCM in a fixed format instead of its own default.
pub trait SpeechEngine {
    /// Lists the voices the engine can use, in the engine's preferred order.
    fn installed_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError>;

    /// Makes the voice with the given exact name the one used for speaking.
    fn select_voice(&mut self, name: &str) -> Result<(), SynthesisError>;

    /// Sets the speech loudness.
    fn set_volume(&mut self, volume: Volume) -> Result<(), SynthesisError>;

    /// Sets the speech rate.
    fn set_rate(&mut self, rate: Rate) -> Result<(), SynthesisError>;

    /// Returns `true` if the engine can render into the given PCM format.
    fn supports_format(&self, format: &AudioFormat) -> bool;

    /// Directs all subsequent speech into an in-memory buffer in the given format.
    fn bind_memory_output(&mut self, format: &AudioFormat) -> Result<(), SynthesisError>;

    /// Renders the text, blocking until done.
    fn speak(&mut self, text: &str) -> Result<(), SynthesisError>;

    /// Returns the audio rendered since the output was bound.
    fn take_output(&mut self) -> Result<Vec<u8>, SynthesisError>;

    /// Detaches the memory output so the engine can be reused.
    fn release_output(&mut self);
}

/// Keeps an engine bound to a memory output, and releases it when dropped.
struct OutputBinding<'e, E: SpeechEngine> {
    engine: &'e mut E,
}

impl<'e, E: SpeechEngine> OutputBinding<'e, E> {
    fn bind(engine: &'e mut E, format: &AudioFormat) -> Result<Self, SynthesisError> {
        let binding = Self {
            engine,
        };
        binding.engine.bind_memory_output(format)?;
        Ok(binding)
    }
}

impl<E: SpeechEngine> Deref for OutputBinding<'_, E> {
    type Target = E;
    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl<E: SpeechEngine> DerefMut for OutputBinding<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}

impl<E: SpeechEngine> Drop for OutputBinding<'_, E> {
    fn drop(&mut self) {
        self.engine.release_output();
    }
}

/// Renders text to PCM using a speech engine.
pub struct Synthesizer<E: SpeechEngine> {
    engine: E,
}

impl<E: SpeechEngine> Synthesizer<E> {
    /// Wraps the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
        }
    }

    /// Returns the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Unwraps the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Returns the names of all installed voices.
    pub fn voice_names(&self) -> Result<Vec<String>, SynthesisError> {
        Ok(self.engine.installed_voices()?.into_iter().map(|voice| voice.name).collect())
    }

    /// Renders the text with the voice, loudness, rate and format from `config`.
    pub fn synthesize(
        &mut self,
        text: &str,
        config: &RenderConfig,
    ) -> Result<PcmBuffer, SynthesisError> {
        let format = config.format;
        if !self.engine.supports_format(&format) {
            return Err(SynthesisError::UnsupportedFormat(format));
        }

        self.select_voice(config.voice_name())?;
        self.engine.set_volume(config.loudness)?;
        self.engine.set_rate(config.rate)?;

        let data = {
            let mut output = OutputBinding::bind(&mut self.engine, &format)?;
            output.speak(text)?;
            output.take_output()?
        };

        let buffer = PcmBuffer::new(data, format);
        info!(
            format = %format,
            bytes = buffer.data().len(),
            duration_ms = buffer.duration().as_millis() as u64,
            "synthesized speech"
        );
        Ok(buffer)
    }

    fn select_voice(&mut self, name: Option<&str>) -> Result<(), SynthesisError> {
        let voices = self.engine.installed_voices()?;
        let (gender, age) = DEFAULT_VOICE_HINTS;
        let default = best_match(&voices, gender, age).ok_or(SynthesisError::NoVoices)?;
        debug!(voice = %default.name, "selected default voice");
        self.engine.select_voice(&default.name)?;

        if let Some(name) = name {
            if !voices.iter().any(|voice| voice.name == name) {
                return Err(SynthesisError::UnknownVoice(name.to_string()));
            }
            debug!(voice = name, "selected requested voice");
            self.engine.select_voice(name)?;
        }
        Ok(())
    }
}

/// The speech engine used on Windows.
#[cfg(windows)]
pub type PlatformEngine = crate::sapi::SapiEngine;

/// Stands in for a speech engine on platforms that have none. It cannot be constructed.
#[cfg(not(windows))]
#[derive(Debug)]
pub enum PlatformEngine {}

#[cfg(not(windows))]
impl SpeechEngine for PlatformEngine {
    fn installed_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        match *self {}
    }

    fn select_voice(&mut self, _name: &str) -> Result<(), SynthesisError> {
        match *self {}
    }

    fn set_volume(&mut self, _volume: Volume) -> Result<(), SynthesisError> {
        match *self {}
    }

    fn set_rate(&mut self, _rate: Rate) -> Result<(), SynthesisError> {
        match *self {}
    }

    fn supports_format(&self, _format: &AudioFormat) -> bool {
        match *self {}
    }

    fn bind_memory_output(&mut self, _format: &AudioFormat) -> Result<(), SynthesisError> {
        match *self {}
    }

    fn speak(&mut self, _text: &str) -> Result<(), SynthesisError> {
        match *self {}
    }

    fn take_output(&mut self) -> Result<Vec<u8>, SynthesisError> {
        match *self {}
    }

    fn release_output(&mut self) {
        match *self {}
    }
}

/// Creates the platform's speech engine, failing if the platform has none.
pub fn default_engine() -> Result<PlatformEngine, SynthesisError> {
    #[cfg(windows)]
    {
        crate::sapi::SapiEngine::new()
    }
    #[cfg(not(windows))]
    {
        Err(SynthesisError::EngineUnavailable)
    }
}
