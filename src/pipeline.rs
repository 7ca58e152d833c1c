//! Sequencing of one render call: placeholders, synthesis, output.

use tracing::{debug, info};

use crate::config::RenderRequest;
use crate::error::RenderError;
use crate::output::{default_device, AudioDevice, Dispatcher, PlatformDevice};
use crate::text::{self, Placeholders};
use crate::tts::{default_engine, PlatformEngine, SpeechEngine, Synthesizer};

/// Renders requests with a given speech engine and audio device.
pub struct Renderer<E: SpeechEngine, D: AudioDevice> {
    synthesizer: Synthesizer<E>,
    dispatcher: Dispatcher<D>,
    placeholders: Option<Placeholders>,
}

impl<E: SpeechEngine, D: AudioDevice> Renderer<E, D> {
    /// Creates a renderer from its engine and device.
    pub fn new(engine: E, device: D) -> Self {
        Self {
            synthesizer: Synthesizer::new(engine),
            dispatcher: Dispatcher::new(device),
            placeholders: None,
        }
    }

    /// Uses fixed placeholder values instead of the current time and host name.
    pub fn with_placeholders(mut self, values: Placeholders) -> Self {
        self.placeholders = Some(values);
        self
    }

    /// The speech engine.
    pub fn engine(&self) -> &E {
        self.synthesizer.engine()
    }

    /// The playback device.
    pub fn device(&self) -> &D {
        self.dispatcher.device()
    }

    /// Speaks the request's text to its output target.
    ///
    /// The output target is resolved first, so an unusable file name fails before any speech is
    /// synthesized. Nothing is retried.
    pub fn render(&mut self, request: RenderRequest) -> Result<(), RenderError> {
        let (text, config) = request.into_parts();
        let target = config.output_target()?;
        debug!(?target, "resolved output target");

        let values = match &self.placeholders {
            Some(values) => values.clone(),
            None => Placeholders::current(),
        };
        let text = text::normalize_with(&text, &config.date_time_format, &values);
        debug!(chars = text.chars().count(), "normalized text");

        let buffer = self.synthesizer.synthesize(&text, &config)?;
        self.dispatcher.dispatch(buffer, target)?;
        info!("render complete");
        Ok(())
    }

    /// Returns the names of the voices the engine can use.
    pub fn voice_names(&self) -> Result<Vec<String>, RenderError> {
        Ok(self.synthesizer.voice_names()?)
    }
}

impl Renderer<PlatformEngine, PlatformDevice> {
    /// Creates a renderer for this platform's speech engine and default audio device.
    pub fn platform() -> Result<Self, RenderError> {
        Ok(Self::new(default_engine()?, default_device()?))
    }
}

/// Speaks a request with the platform's engine and device.
pub fn render(request: RenderRequest) -> Result<(), RenderError> {
    Renderer::platform()?.render(request)
}

/// Lists the voices installed in the platform's engine.
pub fn list_voices() -> Result<Vec<String>, RenderError> {
    Ok(Synthesizer::new(default_engine()?).voice_names()?)
}
