//! Routing of rendered speech to the default audio device or to a file.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::audio::PcmBuffer;
use crate::error::{IoError, OutputError};

#[cfg(feature = "mp3")]
pub mod mp3;
pub mod wav;

/// The container written to an output file.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum FileFormat {
    /// RIFF/WAVE with PCM samples.
    Wav,
    /// MPEG audio layer III, variable bitrate.
    Mp3,
}

impl FileFormat {
    /// Determines the format from a file extension, ignoring case.
    pub fn from_extension(ext: &OsStr) -> Option<Self> {
        let ext = ext.to_str()?;
        if ext.eq_ignore_ascii_case("wav") {
            Some(Self::Wav)
        } else if cfg!(feature = "mp3") && ext.eq_ignore_ascii_case("mp3") {
            Some(Self::Mp3)
        } else {
            None
        }
    }
}

/// Where the rendered audio goes.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub enum OutputTarget {
    /// Play on the default audio device.
    Device,
    /// Write to a file.
    File {
        /// The file to create or replace.
        path: PathBuf,
        /// The container to write.
        format: FileFormat,
    },
}

impl OutputTarget {
    /// Builds a file target, choosing the format from the extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, OutputError> {
        let path = path.as_ref();
        let ext = path.extension().unwrap_or_default();
        match FileFormat::from_extension(ext) {
            Some(format) => Ok(Self::File {
                path: path.to_path_buf(),
                format,
            }),
            None if ext.is_empty() => Err(OutputError::UnsupportedExtension(String::new())),
            None => Err(OutputError::UnsupportedExtension(format!(".{}", ext.to_string_lossy()))),
        }
    }
}

/// An audio output device that plays PCM audio.
pub trait AudioDevice {
    /// Plays the buffer, blocking until playback is complete.
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), IoError>;
}

/// Sends rendered audio to its [`OutputTarget`].
pub struct Dispatcher<D: AudioDevice> {
    device: D,
}

impl<D: AudioDevice> Dispatcher<D> {
    /// Creates a dispatcher that plays through the given device.
    pub fn new(device: D) -> Self {
        Self {
            device,
        }
    }

    /// Returns the playback device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Plays or stores the buffer. A file is either written completely or not at all.
    pub fn dispatch(&mut self, buffer: PcmBuffer, target: OutputTarget) -> Result<(), IoError> {
        match target {
            OutputTarget::Device => {
                debug!(duration_ms = buffer.duration().as_millis() as u64, "playing on default device");
                self.device.play(&buffer)
            }
            OutputTarget::File {
                path,
                format,
            } => {
                let contents = match format {
                    FileFormat::Wav => wav::encode(&buffer)?,
                    #[cfg(feature = "mp3")]
                    FileFormat::Mp3 => mp3::encode(&buffer)?,
                    #[cfg(not(feature = "mp3"))]
                    FileFormat::Mp3 => {
                        return Err(IoError::Encoder("MP3 support is not compiled in".to_string()))
                    }
                };
                write_file(&path, &contents)?;
                info!(path = %path.display(), ?format, bytes = contents.len(), "wrote audio file");
                Ok(())
            }
        }
    }
}

/// Writes `contents` to a temporary file next to `path`, then moves it into place.
fn write_file(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let file_error = |source| IoError::File {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(file_error)?;
    file.write_all(contents).map_err(file_error)?;
    file.as_file().sync_all().map_err(file_error)?;
    file.persist(path).map_err(|err| file_error(err.error))?;
    Ok(())
}

/// The audio device used on Windows.
#[cfg(windows)]
pub type PlatformDevice = crate::sapi::SapiDevice;

/// Stands in for an audio device on platforms that have none. It cannot be constructed.
#[cfg(not(windows))]
#[derive(Debug)]
pub enum PlatformDevice {}

#[cfg(not(windows))]
impl AudioDevice for PlatformDevice {
    fn play(&mut self, _buffer: &PcmBuffer) -> Result<(), IoError> {
        match *self {}
    }
}

/// Opens the platform's default audio device.
pub fn default_device() -> Result<PlatformDevice, IoError> {
    #[cfg(windows)]
    {
        crate::sapi::SapiDevice::new().map_err(|err| IoError::Playback(err.to_string()))
    }
    #[cfg(not(windows))]
    {
        Err(IoError::Playback("no audio device is available on this platform".to_string()))
    }
}
