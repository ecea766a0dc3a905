use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bol_india::progress::{FileProgressStore, load_or_default};
use bol_india::voice::{
    AudioCapture, AudioPlayback, MicCheck, SAMPLE_RATE, SpeechToText, TTS_SAMPLE_RATE,
    samples_to_wav,
};
use bol_india::{App, Catalog, Config, Speaker, render};

/// Bol India - Speak English with an AI tutor
#[derive(Parser)]
#[command(name = "bol", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable microphone and speaker (text-only)
    #[arg(long, env = "BOL_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List lessons and their phrases
    Lessons,
    /// List vocabulary cards
    Vocab,
    /// Show points and streak
    Progress,
    /// Practice speaking one phrase
    Practice {
        /// Phrase id (see `bol lessons`)
        phrase: String,
    },
    /// Talk with the AI tutor
    Talk {
        /// Start in tutor mode
        #[arg(long)]
        tutor: bool,
    },
    /// Speak text with the tutor's voice
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! How are you today?")]
        text: String,
    },
    /// Record one utterance and transcribe it
    TestMic {
        /// Longest capture in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,bol_india=info",
        1 => "info,bol_india=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Setup) => return bol_india::setup::run_setup(),
        Some(Command::TestMic { duration }) => {
            return test_mic(duration, cli.disable_voice).await;
        }
        Some(Command::TestSpeaker) => return test_speaker().await,
        Some(Command::Lessons) => {
            print!("{}", render::lessons(&Catalog::embedded()?));
            return Ok(());
        }
        Some(Command::Vocab) => {
            print!("{}", render::vocabulary(&Catalog::embedded()?));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load_with_options(cli.disable_voice)?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Command::Progress) => {
            let store = FileProgressStore::new(&config.data_dir);
            let progress = load_or_default(&store);
            println!("Total points: {}", progress.total_points);
            println!("Streak:       {} Day", progress.streak);
            Ok(())
        }
        Some(Command::Say { text }) => {
            let app = App::from_config(&config)?;
            app.tutor().speak(&text).await;
            Ok(())
        }
        Some(Command::Practice { phrase }) => {
            let mut app = App::from_config(&config)?;
            app.run_practice(&phrase).await?;
            println!("\nTotal points: {}", app.shell().points());
            Ok(())
        }
        Some(Command::Talk { tutor }) => App::from_config(&config)?.run_conversation(tutor).await,
        _ => {
            tracing::info!(
                voice = config.voice.enabled,
                data_dir = %config.data_dir.display(),
                "starting bol india"
            );
            App::from_config(&config)?.run().await
        }
    }
}

/// Record one utterance through the endpoint detector and transcribe it
async fn test_mic(duration: u64, disable_voice: bool) -> anyhow::Result<()> {
    println!("Say a short phrase within {duration} seconds...");

    let max_duration = Duration::from_secs(duration);
    let samples = tokio::task::spawn_blocking(move || {
        AudioCapture::new()?.record_utterance(max_duration)
    })
    .await??;

    let check = MicCheck::from_utterance(&samples);
    println!("---");
    if !check.heard {
        println!("No utterance detected.");
        println!("Check that your mic is plugged in and selected:");
        println!("  1. Run: pactl info | grep 'Default Source'");
        println!("  2. Run: arecord -l");
        return Ok(());
    }

    println!(
        "Utterance detected: {:.1}s | RMS: {:.4} | Peak: {:.4}",
        check.seconds, check.rms, check.peak
    );

    let config = Config::load_with_options(disable_voice)?;
    match SpeechToText::from_config(&config.voice, &config.api_keys) {
        Ok(stt) => {
            let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
            println!("Heard: {}", stt.transcribe(&wav).await?);
        }
        Err(e) => println!("Skipping transcription: {e}"),
    }

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let num_samples = (TTS_SAMPLE_RATE as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / TTS_SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), TTS_SAMPLE_RATE);

    tokio::task::spawn_blocking(move || {
        AudioPlayback::new(TTS_SAMPLE_RATE)?.play_blocking(samples)
    })
    .await??;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Run: pactl list sinks short");

    Ok(())
}
