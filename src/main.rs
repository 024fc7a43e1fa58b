// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use parking_lot::Mutex;
use tracing::warn;

use keychatter::audio::{list_output_devices, AudioContext};
use keychatter::classify::{classify, TOKEN_TAB};
use keychatter::config::{load_settings, Settings};
use keychatter::cues::{ChannelRegistry, CueChannel, CueEngine};
use keychatter::resolve::Resolver;
use keychatter::verify;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Animalese keystroke sounds."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Starts the player, reading keystrokes from stdin.
    Start {
        /// The path to the asset pack.
        assets: PathBuf,
        /// The path to the settings file. Defaults are used when omitted.
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Verifies that an asset pack contains every resolvable sound.
    Verify {
        /// The path to the asset pack.
        assets: PathBuf,
    },
    /// Lists the available audio output devices.
    Devices {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { assets, settings } => {
            let settings = match settings {
                Some(path) => load_settings(&path)?,
                None => Settings::default(),
            };

            let registry = Arc::new(Mutex::new(ChannelRegistry::new()));
            let context = AudioContext::open(registry.clone())?;
            let engine = CueEngine::new(context, registry);
            let resolver = Resolver::new(&assets);

            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                for token in tokens_for_line(&line) {
                    play_token(&engine, &resolver, &token, &settings).await;
                }
            }

            engine.shutdown();
        }
        Commands::Verify { assets } => {
            let report = verify::verify_assets(&assets);
            verify::print_report(&report);
            if report.has_errors() {
                return Err("asset pack verification failed".into());
            }
        }
        Commands::Devices {} => {
            let devices = list_output_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
    }

    Ok(())
}

/// Splits a line of input into sound tokens: one per character, with tab
/// expanded to its control literal, and a newline token for the line ending.
fn tokens_for_line(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line
        .chars()
        .map(|c| {
            if c == '\t' {
                TOKEN_TAB.to_string()
            } else {
                c.to_string()
            }
        })
        .collect();
    tokens.push("\n".to_string());
    tokens
}

/// Plays a single token. Playback failures skip the event; input keeps
/// flowing.
async fn play_token(engine: &CueEngine, resolver: &Resolver, token: &str, settings: &Settings) {
    let path = resolver.resolve(token, settings.voice, settings);
    let channel = CueChannel::for_class(classify(token, settings.special_punctuation));
    if let Err(err) = engine.play(&path, token, Some(channel), settings).await {
        warn!(token, error = %err, "Skipping cue");
    }
}
