#![warn(missing_docs)]

//! Speak a line of text, or save it as a WAV or MP3 file.
//!
//! # Pipeline
//!
//! A render call takes a [`RenderRequest`], the text to speak plus its [`RenderConfig`], and runs
//! it through three stages:
//!
//! 1. The [text] module substitutes the `{NOW}`, `{DATE}`, `{TIME}` and `{COMPUTERNAME}`
//!    placeholders.
//! 2. The [tts] module drives a speech engine to render the text into a [`PcmBuffer`] with a fixed
//!    sample rate, sample width and channel count. The defaults are 16025 Hz, 16-bit, mono.
//! 3. The [output] module plays the buffer on the default audio device, or writes it as a WAV file
//!    or a variable bitrate MP3 file, depending on the extension of the output path.
//!
//! Every stage runs synchronously on the calling thread. A failure in any stage ends the call
//! with a [`RenderError`]; nothing is retried, and a file that could not be written completely is
//! not left behind.
//!
//! # Engines and devices
//!
//! On Windows, speech is synthesized and played through Microsoft's Speech API (SAPI). The engine
//! and the device are owned by a [`Renderer`] and initialize COM for as long as they live.
//!
//! Other platforms have no built-in engine: [`render`] fails with
//! [`SynthesisError::EngineUnavailable`]. Any type implementing [`SpeechEngine`] and
//! [`AudioDevice`] can be plugged into a [`Renderer`] instead.
//!
//! ```no_run
//! use tts_cli::{render, RenderConfig, RenderRequest};
//!
//! let config = RenderConfig {
//!     output_path: Some("greeting.mp3".into()),
//!     ..Default::default()
//! };
//! render(RenderRequest::new("Good morning, it is {TIME}.", config)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod config;
mod error;
pub mod output;
mod pipeline;
#[cfg(windows)]
pub mod sapi;
pub mod text;
pub mod tts;

pub use audio::{AudioFormat, PcmBuffer};
pub use config::{Rate, RenderConfig, RenderRequest, Volume};
pub use error::{ConfigError, IoError, OutputError, RenderError, SynthesisError};
pub use output::{AudioDevice, Dispatcher, FileFormat, OutputTarget};
pub use pipeline::{list_voices, render, Renderer};
pub use tts::{SpeechEngine, Synthesizer};
