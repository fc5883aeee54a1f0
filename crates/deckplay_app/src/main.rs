// SPDX-License-Identifier: MIT OR Apache-2.0
//! `deckplay` - present a deck from the terminal
//!
//! Loads a deck (RON or JSON), presents it on the headless surface and reads
//! presenter input from stdin, one key name or command per line:
//! an empty line advances, `goto N` jumps to slide `N`, `q` exits.

use clap::Parser;
use deckplay_app::{
    FileMediaResolver, HeadlessSurface, PlaybackEvent, PlaybackSession, PlayerConfig, Result,
};
use deckplay_model::Deck;
use deckplay_sequencer::{partition_waves, WaveTrigger};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "deckplay", version, about = "Present a slide deck")]
struct Cli {
    /// Deck file (`.ron` or `.json`)
    deck: PathBuf,

    /// Slide index to start from (shown even if hidden)
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Player config file (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host frame rate, overrides the config
    #[arg(long)]
    fps: Option<u32>,

    /// Media root, overrides the config (defaults to the deck's directory)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Print each slide's animation waves and exit
    #[arg(long)]
    dump_waves: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("deckplay_app=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DeckPlay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Playback failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.frame_rate = fps;
    }
    if let Some(assets) = cli.assets {
        config.assets_root = Some(assets);
    } else if config.assets_root.is_none() {
        config.assets_root = cli.deck.parent().map(Path::to_path_buf);
    }

    let deck = Deck::load(&cli.deck)?;
    if cli.dump_waves {
        dump_waves(&deck);
        return Ok(());
    }

    let bindings = config.key_bindings.clone();
    let frame = Duration::from_secs_f32(config.frame_interval());
    let media = FileMediaResolver::new(config.assets_root.clone());
    let mut session = PlaybackSession::new(deck, HeadlessSurface::new(), media, config);

    session.start(cli.from);
    report(session.take_events());

    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = Instant::now();

    while session.is_playing() {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                session.update(now.duration_since(last).as_secs_f32());
                last = now;
            }
            line = lines.next_line() => match line? {
                Some(line) => match bindings.parse_command(&line) {
                    Some(signal) => session.handle_input(signal),
                    None => tracing::warn!("Unknown command '{}'", line.trim()),
                },
                None => {
                    tracing::info!("Input closed");
                    session.stop();
                }
            },
        }
        report(session.take_events());
    }

    Ok(())
}

fn report(events: Vec<PlaybackEvent>) {
    for event in events {
        match event {
            PlaybackEvent::SlideSelected(index) => tracing::info!("Now showing slide {index}"),
            PlaybackEvent::PresentationEnded => tracing::info!("End of presentation; advance again to exit"),
            PlaybackEvent::ModeChanged(mode) => tracing::debug!("Mode: {mode:?}"),
            PlaybackEvent::AnimationStarted { element, category } => {
                tracing::debug!("{} {} started", element, category.name());
            }
            PlaybackEvent::AnimationEnded { element, category } => {
                tracing::debug!("{} {} ended", element, category.name());
            }
        }
    }
}

fn dump_waves(deck: &Deck) {
    println!("{} ({} slides)", deck.name, deck.len());
    for (index, slide) in deck.slides.iter().enumerate() {
        let hidden = if slide.visible { "" } else { " [hidden]" };
        println!("{index}: {}{hidden}", slide.name);

        for (n, wave) in partition_waves(&slide.animations).iter().enumerate() {
            let trigger = match wave.trigger {
                WaveTrigger::Auto => "auto",
                WaveTrigger::Click => "click",
            };
            println!("  wave {n} ({trigger}, {:.2}s)", wave.duration());
            for step in &wave.steps {
                let target = slide
                    .find_element(step.target)
                    .map_or_else(|| step.target.to_string(), |e| e.name.clone());
                println!(
                    "    {} {:?} {} +{:.2}s for {:.2}s",
                    step.category.name(),
                    step.effect,
                    target,
                    step.delay,
                    step.duration
                );
            }
        }
    }
}
