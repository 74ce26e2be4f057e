//! Coreplay CLI
//!
//! Inspect, resolve, play back and export Core War battle recordings.

use std::fs::File;
use std::io::{self, BufWriter};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use coreplay::prelude::*;
use coreplay::playback::default_export_name;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Replay and export Core War battle recordings
#[derive(Parser, Debug)]
#[command(name = "coreplay", version)]
#[command(about = "Replay and export Core War battle recordings", long_about = None)]
struct Cli {
    /// Verbose output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print header, event statistics and load warnings
    Inspect {
        /// Recording file
        file: PathBuf,
    },
    /// Replay to the end and print the outcome
    Resolve {
        /// Recording file
        file: PathBuf,
    },
    /// Play back in real time, printing progress
    Play {
        /// Recording file
        file: PathBuf,
        /// Playback rate in events per second
        #[arg(long, default_value = "15")]
        speed: f64,
        /// Target playback duration in seconds (overrides --speed)
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Export one text frame per tick at a fixed frame rate
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Recording file
    file: PathBuf,
    /// Frames per second
    #[arg(long, default_value = "30")]
    fps: u32,
    /// Playback rate in events per second
    #[arg(long, default_value = "50")]
    speed: f64,
    /// Target export length in seconds (overrides --speed)
    #[arg(long)]
    duration: Option<f64>,
    /// Seconds to hold the final state
    #[arg(long, default_value = "3")]
    settle: f64,
    /// Output file (default: <stem>_<warrior1>_vs_<warrior2>.frames)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a tracing subscriber was already installed");
    }

    let result = match cli.command {
        Command::Inspect { file } => inspect(&file),
        Command::Resolve { file } => resolve(&file),
        Command::Play {
            file,
            speed,
            duration,
        } => play(&file, speed, duration),
        Command::Export(args) => export(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> CliResult<Replay> {
    let recording = Recording::open(path)?;
    Ok(Replay::from_recording(recording, ReplayConfig::default())?)
}

fn inspect(path: &Path) -> CliResult {
    let recording = Recording::open(path)?;
    print!("{}", InspectReport::new(&recording));
    Ok(())
}

fn resolve(path: &Path) -> CliResult {
    let mut replay = load(path)?;
    replay.jump_to_end();
    replay.resolve();
    let header = replay.header();
    match replay.verdict() {
        Some(verdict) => {
            println!("{}", verdict.outcome);
            println!("basis:      {:?}", verdict.basis);
            println!("executions: {} / {}", verdict.executions[0], verdict.executions[1]);
            println!("warriors:   {} vs {}", header.warrior1_name, header.warrior2_name);
        }
        None => println!("{}", BattleOutcome::Undetermined),
    }
    Ok(())
}

fn play(path: &Path, speed: f64, duration: Option<f64>) -> CliResult {
    let replay = load(path)?;
    let config = InteractiveConfig {
        rate: speed,
        target_duration: duration,
        ..InteractiveConfig::default()
    };
    let ticks_per_report = config.tick_rate_hz.round().max(1.0) as u64;
    let mut player = InteractivePlayer::with_system_clock(replay, config)?;
    info!(rate = player.rate(), "playing");

    let metrics = player.run(|view, metrics| {
        if metrics.total_ticks % ticks_per_report == 0 {
            eprintln!(
                "{:5.1}%  event {}/{}  cycle {}",
                view.progress() * 100.0,
                view.cursor.position(),
                view.total_events,
                view.cursor.cycle()
            );
        }
        if view.outcome.is_decided() {
            println!("{}", view.outcome);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    info!(ticks = metrics.total_ticks, "playback stopped");
    Ok(())
}

fn export(args: ExportArgs) -> CliResult {
    let replay = load(&args.file)?;
    let output = args
        .output
        .unwrap_or_else(|| default_export_name(&args.file, replay.header()));
    let config = ExportConfig {
        fps: args.fps,
        rate: args.speed,
        settle_seconds: args.settle,
        target_duration: args.duration,
    };
    let mut exporter = Exporter::new(replay, config)?;

    let mut sink = TextFrameSink::new(BufWriter::new(File::create(&output)?));
    let report = exporter.run(&mut sink)?;
    info!(path = %output.display(), frames = report.frames, "frames written");
    println!("{}", report.outcome);
    Ok(())
}
