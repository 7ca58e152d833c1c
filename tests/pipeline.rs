mod common;

use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;

use tts_cli::audio::AudioFormat;
use tts_cli::output::wav;
use tts_cli::text::Placeholders;
use tts_cli::tts::VoiceInfo;
use tts_cli::{
    Dispatcher, OutputError, OutputTarget, Rate, RenderConfig, RenderError, RenderRequest,
    Renderer, SynthesisError, Synthesizer, Volume,
};

use common::{stereo_8_bit, tone, FakeEngine, RecordingDevice, MS_PER_CHAR};

fn placeholders() -> Placeholders {
    Placeholders {
        now: NaiveDate::from_ymd_opt(2022, 1, 31).and_then(|d| d.and_hms_opt(7, 30, 0)).unwrap(),
        host_name: "KITCHEN".into(),
    }
}

fn renderer(engine: FakeEngine) -> Renderer<FakeEngine, RecordingDevice> {
    Renderer::new(engine, RecordingDevice::default()).with_placeholders(placeholders())
}

fn config_for(path: &Path) -> RenderConfig {
    RenderConfig {
        output_path: Some(path.to_path_buf()),
        ..Default::default()
    }
}

#[test]
fn plays_on_device_without_output_path() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut renderer = renderer(engine);

    let request = RenderRequest::new("Hello from {ComputerName}", RenderConfig::default()).unwrap();
    renderer.render(request).unwrap();

    let played = renderer.device().played.borrow();
    assert_eq!(1, played.len());
    assert_eq!(&AudioFormat::default(), played[0].format());

    let log = log.borrow();
    assert_eq!(vec!["Hello from KITCHEN".to_string()], log.spoken);
    assert_eq!(Some(Volume::new(80)), log.volume);
    assert_eq!(Some(Rate::new(0)), log.rate);
    assert_eq!(1, log.releases);
}

#[test]
fn writes_wav_with_identical_pcm() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.WAV");
    let mut renderer = renderer(FakeEngine::new());

    renderer.render(RenderRequest::new("Twelve chars", config_for(&path)).unwrap()).unwrap();

    let written = wav::read(&path).unwrap();
    let expected = tone(AudioFormat::default(), 12 * MS_PER_CHAR);
    assert_eq!(expected.format(), written.format());
    assert_eq!(expected.data(), written.data());
    assert!(renderer.device().played.borrow().is_empty());
}

#[test]
fn wav_round_trip_preserves_buffer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tone.wav");
    let buffer = tone(stereo_8_bit(), 250);

    let mut dispatcher = Dispatcher::new(RecordingDevice::default());
    dispatcher.dispatch(buffer.clone(), OutputTarget::from_path(&path).unwrap()).unwrap();

    let read_back = wav::read(&path).unwrap();
    assert_eq!(buffer.format(), read_back.format());
    assert_eq!(buffer.sample_count(), read_back.sample_count());
    assert_eq!(buffer, read_back);
}

#[test]
fn unsupported_extension_fails_before_synthesis() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.ogg");
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut renderer = renderer(engine);

    let err = renderer.render(RenderRequest::new("Hello", config_for(&path)).unwrap()).unwrap_err();

    match &err {
        RenderError::Output(OutputError::UnsupportedExtension(ext)) => assert_eq!(".ogg", ext),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(4, err.exit_code());
    assert!(!path.exists());
    assert!(log.borrow().spoken.is_empty());
}

#[test]
fn unknown_voice_fails_loudly() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut synthesizer = Synthesizer::new(engine);
    let config = RenderConfig {
        voice_name: Some("Nonexistent Voice".into()),
        ..Default::default()
    };

    let result = synthesizer.synthesize("Hello", &config);

    match result {
        Err(SynthesisError::UnknownVoice(name)) => assert_eq!("Nonexistent Voice", name),
        other => panic!("unexpected result: {:?}", other),
    }
    let log = log.borrow();
    assert!(log.spoken.is_empty());
    assert_eq!(None, log.bound);
}

#[test]
fn unknown_voice_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.wav");
    let mut renderer = renderer(FakeEngine::new());
    let config = RenderConfig {
        voice_name: Some("Nonexistent Voice".into()),
        ..config_for(&path)
    };

    let err = renderer.render(RenderRequest::new("Hello", config).unwrap()).unwrap_err();

    assert!(matches!(err, RenderError::Synthesis(SynthesisError::UnknownVoice(_))));
    assert_eq!(3, err.exit_code());
    assert!(!path.exists());
}

#[test]
fn default_voice_is_female_adult_then_named_voice_overrides() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut synthesizer = Synthesizer::new(engine);

    synthesizer.synthesize("Hi", &RenderConfig::default()).unwrap();
    assert_eq!(vec!["Microsoft Zira Desktop".to_string()], log.borrow().selected);

    let config = RenderConfig {
        voice_name: Some("Microsoft David Desktop".into()),
        ..Default::default()
    };
    synthesizer.synthesize("Hi", &config).unwrap();
    assert_eq!(
        vec![
            "Microsoft Zira Desktop".to_string(),
            "Microsoft Zira Desktop".to_string(),
            "Microsoft David Desktop".to_string(),
        ],
        log.borrow().selected
    );
}

#[test]
fn no_voices_is_a_synthesis_error() {
    let mut synthesizer = Synthesizer::new(FakeEngine::with_voices(Vec::<VoiceInfo>::new()));
    let result = synthesizer.synthesize("Hi", &RenderConfig::default());
    assert!(matches!(result, Err(SynthesisError::NoVoices)));
}

#[test]
fn output_is_released_after_engine_failure() {
    let engine = FakeEngine::failing();
    let log = engine.log.clone();
    let mut synthesizer = Synthesizer::new(engine);

    let result = synthesizer.synthesize("Hi", &RenderConfig::default());

    assert!(matches!(result, Err(SynthesisError::Engine(_))));
    assert_eq!(Some(AudioFormat::default()), log.borrow().bound);
    assert_eq!(1, log.borrow().releases);
}

#[test]
fn unsupported_format_is_rejected_before_binding() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut synthesizer = Synthesizer::new(engine);
    let config = RenderConfig {
        format: AudioFormat {
            sample_rate: 4000,
            ..AudioFormat::default()
        },
        ..Default::default()
    };

    let result = synthesizer.synthesize("Hi", &config);

    assert!(matches!(result, Err(SynthesisError::UnsupportedFormat(_))));
    let log = log.borrow();
    assert_eq!(None, log.bound);
    assert!(log.selected.is_empty());
    assert_eq!(None, log.volume);
    assert_eq!(None, log.rate);
}

#[test]
fn clamped_settings_reach_the_engine() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut synthesizer = Synthesizer::new(engine);
    let config = RenderConfig {
        loudness: Volume::new(150),
        rate: Rate::new(-20),
        ..Default::default()
    };

    let buffer = synthesizer.synthesize("Four", &config).unwrap();

    assert_eq!(Some(Volume::new(100)), log.borrow().volume);
    assert_eq!(Some(Rate::new(-10)), log.borrow().rate);
    let millis = buffer.duration().as_secs_f64() * 1000.0;
    assert!((millis - (4 * MS_PER_CHAR) as f64).abs() < 1.0, "{} ms", millis);
}

#[test]
fn placeholders_are_expanded_before_synthesis() {
    let engine = FakeEngine::new();
    let log = engine.log.clone();
    let mut renderer = renderer(engine);
    let config = RenderConfig {
        date_time_format: "%d/%m/%Y".into(),
        ..Default::default()
    };

    renderer.render(RenderRequest::new("Today is {date}.", config).unwrap()).unwrap();

    assert_eq!(vec!["Today is 31/01/2022.".to_string()], log.borrow().spoken);
}

#[test]
fn existing_file_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.wav");
    std::fs::write(&path, b"stale").unwrap();
    let mut renderer = renderer(FakeEngine::new());

    renderer.render(RenderRequest::new("Hi", config_for(&path)).unwrap()).unwrap();

    assert_eq!(tone(AudioFormat::default(), 2 * MS_PER_CHAR), wav::read(&path).unwrap());
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(1, leftovers);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("out.wav");
    let mut renderer = renderer(FakeEngine::new());

    let err = renderer.render(RenderRequest::new("Hi", config_for(&path)).unwrap()).unwrap_err();

    assert!(matches!(err, RenderError::Io(_)));
    assert_eq!(5, err.exit_code());
    assert!(!path.exists());
}

#[cfg(feature = "mp3")]
mod mp3 {
    use std::fs::File;

    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;
    use tts_cli::IoError;

    use super::*;

    /// Decodes an MP3 file, returning its sample rate, channel count and number of frames.
    fn decode(path: &Path) -> (u32, usize, u64) {
        let source = MediaSourceStream::new(Box::new(File::open(path).unwrap()), Default::default());
        let mut hint = Hint::new();
        hint.with_extension("mp3");
        let probed = symphonia::default::get_probe()
            .format(&hint, source, &FormatOptions::default(), &MetadataOptions::default())
            .unwrap();
        let mut reader = probed.format;
        let track = reader.default_track().unwrap();
        let track_id = track.id;
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .unwrap();

        let mut spec = None;
        let mut frames = 0;
        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(err) => panic!("{}", err),
            };
            if packet.track_id() != track_id {
                continue;
            }
            let decoded = decoder.decode(&packet).unwrap();
            spec = Some(*decoded.spec());
            frames += decoded.frames() as u64;
        }
        let spec = spec.unwrap();
        (spec.rate, spec.channels.count(), frames)
    }

    #[test]
    fn writes_decodable_mp3() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.Mp3");
        let format = AudioFormat {
            sample_rate: 22050,
            ..AudioFormat::default()
        };
        let config = RenderConfig {
            format,
            ..config_for(&path)
        };
        let mut renderer = renderer(FakeEngine::new());

        // 20 characters at 50 ms each
        renderer.render(RenderRequest::new("Twenty characters!!!", config).unwrap()).unwrap();

        let header = std::fs::read(&path).unwrap();
        assert!(header.starts_with(b"ID3") || (header[0] == 0xFF && header[1] & 0xE0 == 0xE0));

        let (rate, channels, frames) = decode(&path);
        assert_eq!(22050, rate);
        assert_eq!(1, channels);
        let seconds = frames as f64 / rate as f64;
        assert!((seconds - 1.0).abs() < 0.2, "decoded {} s", seconds);
    }

    #[test]
    fn default_format_is_encoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.mp3");
        let mut renderer = renderer(FakeEngine::new());

        // 40 characters at 50 ms each
        let text = "Forty characters of speech at 16025 Hz!!";
        renderer.render(RenderRequest::new(text, config_for(&path)).unwrap()).unwrap();

        // LAME resamples 16025 Hz to a rate MP3 supports
        let (rate, channels, frames) = decode(&path);
        assert_eq!(1, channels);
        let seconds = frames as f64 / rate as f64;
        assert!((seconds - 2.0).abs() < 0.2, "decoded {} s at {} Hz", seconds, rate);
    }

    #[test]
    fn empty_audio_is_not_encoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("silence.mp3");
        let buffer = tone(AudioFormat::default(), 0);
        assert!(buffer.is_empty());

        let mut dispatcher = Dispatcher::new(RecordingDevice::default());
        let result = dispatcher.dispatch(buffer, OutputTarget::from_path(&path).unwrap());

        assert!(matches!(result, Err(IoError::Encoder(_))));
        assert!(!path.exists());
    }

    #[test]
    fn stereo_8_bit_is_encoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.mp3");
        let buffer = tone(stereo_8_bit(), 500);

        let mut dispatcher = Dispatcher::new(RecordingDevice::default());
        dispatcher.dispatch(buffer, OutputTarget::from_path(&path).unwrap()).unwrap();

        let (rate, channels, frames) = decode(&path);
        assert_eq!(22050, rate);
        assert_eq!(2, channels);
        let seconds = frames as f64 / rate as f64;
        assert!((seconds - 0.5).abs() < 0.2, "decoded {} s", seconds);
    }
}
