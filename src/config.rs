//! The validated configuration handed to the render pipeline.

use std::fmt::Display;
use std::path::PathBuf;

use crate::audio::AudioFormat;
use crate::error::{ConfigError, OutputError};
use crate::output::OutputTarget;

macro_rules! decl_clamped_int {
    {$(#[$meta:meta])* $name:ident($base:ty) in $min:literal..$max:literal, default $default:literal} => {
        $(#[$meta])*
        #[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
        pub struct $name($base);

        impl $name {
            /// Clamps the given value to the interval
            #[doc = concat!("[", stringify!($min), ", ", stringify!($max), "]")]
            /// and constructs a new instance from it.
            pub fn new(value: $base) -> Self {
                Self(value.clamp($min, $max))
            }

            /// Returns the value encapsulated by this instance.
            pub fn value(&self) -> $base {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl From<$base> for $name {
            fn from(source: $base) -> Self {
                Self::new(source)
            }
        }

        impl From<$name> for $base {
            fn from(source: $name) -> Self {
                source.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

decl_clamped_int! {
    /// Speech loudness in the interval [0, 100], with 0 muted and 100 full volume.
    Volume(i32) in 0..100, default 80
}

decl_clamped_int! {
    /// Speech rate in the interval [-10, 10], with 0 being normal speed.
    Rate(i32) in -10..10, default 0
}

impl Volume {
    #[cfg(windows)]
    pub(crate) fn sapi_value(&self) -> u16 {
        self.0 as _
    }
}

/// Everything the pipeline needs to know besides the text itself.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct RenderConfig {
    /// Exact name of the voice to use. `None` selects a female adult voice.
    pub voice_name: Option<String>,
    /// Speech loudness.
    pub loudness: Volume,
    /// Speech rate.
    pub rate: Rate,
    /// `strftime` pattern used for the date and time placeholders. Empty selects the defaults.
    pub date_time_format: String,
    /// File to write the audio to. `None` or an empty path plays it on the default device.
    pub output_path: Option<PathBuf>,
    /// PCM format the speech is rendered in.
    pub format: AudioFormat,
}

impl RenderConfig {
    /// Returns the voice name, treating an empty string as no preference.
    pub fn voice_name(&self) -> Option<&str> {
        self.voice_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Resolves where the rendered audio should go.
    pub fn output_target(&self) -> Result<OutputTarget, OutputError> {
        match &self.output_path {
            Some(path) if !path.as_os_str().is_empty() => OutputTarget::from_path(path),
            _ => Ok(OutputTarget::Device),
        }
    }
}

/// A line of text to speak, along with its configuration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RenderRequest {
    text: String,
    config: RenderConfig,
}

impl RenderRequest {
    /// Builds a request, rejecting empty text.
    pub fn new<S: Into<String>>(text: S, config: RenderConfig) -> Result<Self, ConfigError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ConfigError::MissingText);
        }
        Ok(Self {
            text,
            config,
        })
    }

    /// The text to speak, before placeholder substitution.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The render configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Splits the request into its parts.
    pub fn into_parts(self) -> (String, RenderConfig) {
        (self.text, self.config)
    }
}
