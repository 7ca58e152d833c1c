//! Command-line front end: speak a text, or save it as a WAV or MP3 file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tts_cli::{list_voices, render, Rate, RenderConfig, RenderError, RenderRequest, Volume};

#[derive(Debug, Parser)]
#[command(name = "tts-cli", version)]
#[command(about = "This command line application will create speech output from a text.")]
#[command(after_help = "Example: tts-cli \"Hello, world!\"")]
struct Cli {
    /// List available voice names
    #[arg(short, long)]
    info: bool,

    /// Name of the voice to create the speech output
    #[arg(short, long, env = "TTS_CLI_VOICE")]
    voice: Option<String>,

    /// Volume of the output. Range is 0 (muted) to 100 (loud)
    #[arg(
        short,
        long,
        env = "TTS_CLI_LOUDNESS",
        default_value_t = 80,
        allow_negative_numbers = true
    )]
    loudness: i32,

    /// Speech rate. Range is from -10 to 10
    #[arg(short, long, env = "TTS_CLI_SPEED", default_value_t = 0, allow_negative_numbers = true)]
    speed: i32,

    /// strftime pattern for the {NOW}, {DATE} and {TIME} placeholders, e.g. "%d.%m.%Y"
    #[arg(short, long = "dateformat", env = "TTS_CLI_DATEFORMAT", default_value = "")]
    dateformat: String,

    /// Output file name. Valid extensions are .wav and .mp3. Plays on the default device if absent
    #[arg(short, long, env = "TTS_CLI_OUTPUT")]
    output: Option<PathBuf>,

    /// Log what the pipeline is doing to stderr
    #[arg(long)]
    verbose: bool,

    /// Text to convert to speech
    text: Option<String>,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            voice_name: self.voice.clone(),
            loudness: Volume::new(self.loudness),
            rate: Rate::new(self.speed),
            date_time_format: self.dateformat.clone(),
            output_path: self.output.clone(),
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), RenderError> {
    if cli.info {
        let names = list_voices()?;
        println!("Available voice names:");
        for name in names {
            println!("\t{}", name);
        }
        return Ok(());
    }

    let config = cli.render_config();
    let request = RenderRequest::new(cli.text.unwrap_or_default(), config)?;
    render(request)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "render failed");
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
