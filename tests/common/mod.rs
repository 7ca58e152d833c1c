#![allow(dead_code)]

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use tts_cli::audio::{AudioFormat, BitsPerSample, Channels, PcmBuffer};
use tts_cli::tts::{VoiceAge, VoiceGender, VoiceInfo};
use tts_cli::{AudioDevice, IoError, Rate, SpeechEngine, SynthesisError, Volume};

/// Milliseconds of audio the fake engine renders per character of text.
pub const MS_PER_CHAR: u32 = 50;

#[derive(Debug, Default)]
pub struct EngineLog {
    pub selected: Vec<String>,
    pub volume: Option<Volume>,
    pub rate: Option<Rate>,
    pub bound: Option<AudioFormat>,
    pub spoken: Vec<String>,
    pub releases: usize,
}

/// A speech engine that renders a sine tone whose length depends on the text.
pub struct FakeEngine {
    voices: Vec<VoiceInfo>,
    fail_speech: bool,
    output: Option<(AudioFormat, Vec<u8>)>,
    pub log: Rc<RefCell<EngineLog>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::with_voices(vec![
            VoiceInfo::named("Microsoft David Desktop")
                .with_gender(VoiceGender::Male)
                .with_age(VoiceAge::Adult),
            VoiceInfo::named("Microsoft Zira Desktop")
                .with_gender(VoiceGender::Female)
                .with_age(VoiceAge::Adult),
        ])
    }

    pub fn with_voices(voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
            fail_speech: false,
            output: None,
            log: Rc::new(RefCell::new(EngineLog::default())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_speech: true,
            ..Self::new()
        }
    }
}

impl SpeechEngine for FakeEngine {
    fn installed_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        Ok(self.voices.clone())
    }

    fn select_voice(&mut self, name: &str) -> Result<(), SynthesisError> {
        if !self.voices.iter().any(|voice| voice.name == name) {
            return Err(SynthesisError::UnknownVoice(name.to_string()));
        }
        self.log.borrow_mut().selected.push(name.to_string());
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), SynthesisError> {
        self.log.borrow_mut().volume = Some(volume);
        Ok(())
    }

    fn set_rate(&mut self, rate: Rate) -> Result<(), SynthesisError> {
        self.log.borrow_mut().rate = Some(rate);
        Ok(())
    }

    fn supports_format(&self, format: &AudioFormat) -> bool {
        format.sample_rate >= 8000
    }

    fn bind_memory_output(&mut self, format: &AudioFormat) -> Result<(), SynthesisError> {
        self.output = Some((*format, Vec::new()));
        self.log.borrow_mut().bound = Some(*format);
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<(), SynthesisError> {
        if self.fail_speech {
            return Err(SynthesisError::Engine("the engine crashed".to_string()));
        }
        let (format, data) = self
            .output
            .as_mut()
            .ok_or_else(|| SynthesisError::Engine("not bound".to_string()))?;
        let millis = text.chars().count() as u32 * MS_PER_CHAR;
        data.extend_from_slice(tone(*format, millis).data());
        self.log.borrow_mut().spoken.push(text.to_string());
        Ok(())
    }

    fn take_output(&mut self) -> Result<Vec<u8>, SynthesisError> {
        match &self.output {
            Some((_, data)) => Ok(data.clone()),
            None => Err(SynthesisError::Engine("not bound".to_string())),
        }
    }

    fn release_output(&mut self) {
        self.output = None;
        self.log.borrow_mut().releases += 1;
    }
}

/// A device that remembers what it was asked to play.
#[derive(Default)]
pub struct RecordingDevice {
    pub played: Rc<RefCell<Vec<PcmBuffer>>>,
}

impl AudioDevice for RecordingDevice {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), IoError> {
        self.played.borrow_mut().push(buffer.clone());
        Ok(())
    }
}

/// A 440 Hz tone in the given format.
pub fn tone(format: AudioFormat, millis: u32) -> PcmBuffer {
    let frames = (format.sample_rate as u64 * millis as u64 / 1000) as usize;
    let peak = match format.bits_per_sample {
        BitsPerSample::Bits8 => 100.0,
        BitsPerSample::Bits16 => 12000.0,
    };
    let channels = format.channels as usize;
    let samples = (0..frames).flat_map(move |frame| {
        let t = frame as f64 / format.sample_rate as f64;
        let value = (peak * (2.0 * PI * 440.0 * t).sin()) as i32;
        std::iter::repeat(value).take(channels)
    });
    PcmBuffer::from_samples(samples, format)
}

pub fn stereo_8_bit() -> AudioFormat {
    AudioFormat {
        sample_rate: 22050,
        bits_per_sample: BitsPerSample::Bits8,
        channels: Channels::Stereo,
    }
}
