use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The request could not be built from the supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No text, or only an empty string, was given.
    #[error(
        "Text is missing! Please specify the text you want to convert to speech. See help \
         (--help) for further options and information."
    )]
    MissingText,
}

/// The speech engine could not produce audio.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// There is no speech engine on this platform.
    #[error("no speech engine is available on this platform")]
    EngineUnavailable,
    /// The engine has no voices installed.
    #[error("no voices are installed")]
    NoVoices,
    /// The requested voice is not installed.
    #[error("voice \"{0}\" is not installed")]
    UnknownVoice(String),
    /// The engine cannot render into the requested PCM format.
    #[error("the speech engine cannot render {0}")]
    UnsupportedFormat(crate::audio::AudioFormat),
    /// The engine reported a failure.
    #[error("speech engine failure: {0}")]
    Engine(String),
}

#[cfg(windows)]
impl From<windows::core::Error> for SynthesisError {
    fn from(source: windows::core::Error) -> Self {
        Self::Engine(source.to_string())
    }
}

/// The output destination is not usable.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output file name has an extension other than `.wav` or `.mp3`.
    #[error("Invalid output file format \"{0}\". Either .WAV or .MP3 allowed!")]
    UnsupportedExtension(String),
}

/// Writing or playing the rendered audio failed.
#[derive(Debug, Error)]
pub enum IoError {
    /// A filesystem operation on the output file failed.
    #[error("cannot write {}: {source}", path.display())]
    File {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// The audio could not be framed as WAV.
    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),
    /// The MP3 encoder rejected its settings or the audio.
    #[error("MP3 encoding failed: {0}")]
    Encoder(String),
    /// The default audio device could not play the audio.
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Any failure of a render call.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The request was malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The speech engine failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    /// The output destination is not usable.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// Writing or playing the audio failed.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl RenderError {
    /// The process exit code reported for this error. Every kind gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Synthesis(_) => 3,
            Self::Output(_) => 4,
            Self::Io(_) => 5,
        }
    }
}
