//! mosaic - photomosaic generator CLI
//!
//! Covers an upscaled copy of an input image with color-shifted tiles
//! from a directory of candidates, then blends the result back against
//! the input at a configured intensity.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mosaic_scheduler::{Config, RunMode};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Global logger instance for file logging.
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

/// File logger that writes messages to a log file.
struct Logger {
    file: File,
}

impl Logger {
    /// Creates a new logger writing to the specified path (append mode).
    fn new(path: &PathBuf) -> std::io::Result<Self> {
        let file = File::options().append(true).create(true).open(path)?;
        Ok(Self { file })
    }

    /// Writes a message to the log file.
    fn log(&mut self, msg: &str) {
        let _ = writeln!(self.file, "{msg}");
    }
}

/// Logs a message to stderr and optionally to the log file.
fn log(msg: &str) {
    eprintln!("{msg}");
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(msg);
        }
    }
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbose: u8, log_path: Option<&PathBuf>) {
    let filter = match verbose {
        0 => "warn",
        1 => "mosaic=info",
        2 => "mosaic=debug",
        _ => "mosaic=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = log_path {
        let log_dir = path.parent().unwrap_or(Path::new("."));
        let log_filename = path.file_name().unwrap_or(std::ffi::OsStr::new("mosaic.log"));
        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_ansi(false)
            .with_writer(file_appender)
            .init();
    } else if verbose > 0 {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .init();
    }
}

/// Scheduling strategy, as selected by `-M`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Single-threaded.
    S,
    /// Fixed worker pool over bounded channels.
    P,
    /// Fork-join work stealing over per-worker deques.
    W,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::S => RunMode::Sequential,
            ModeArg::P => RunMode::Parallel,
            ModeArg::W => RunMode::WorkSteal,
        }
    }
}

#[derive(Parser)]
#[command(name = "mosaic")]
#[command(author, version, about = "Photomosaic generator")]
#[command(long_about = "
Builds a photomosaic: covers an upscaled copy of the input image with
tiles whose palette has been shifted toward the local region they cover,
then blends the mosaic back against the input at a configured intensity.

Example:
  mosaic -i photo.png -o mosaic.png -d tiles/ -s 32 -U 4 -I 0.8 -B 0.8 -M w -T 8
")]
struct Cli {
    /// Input image path
    #[arg(short = 'i', long = "input")]
    in_path: PathBuf,

    /// Output image path
    #[arg(short = 'o', long = "output")]
    out_path: PathBuf,

    /// Directory of candidate tile images
    #[arg(short = 'd', long = "tiles-dir")]
    tiles_dir: PathBuf,

    /// Tile edge length in pixels
    #[arg(short = 's', long = "tile-size")]
    tile_size: u32,

    /// Integer upscale factor applied to the input before composition
    #[arg(short = 'U', long = "upscale", default_value_t = 1)]
    upscale: u32,

    /// Mosaic composition weight in [0, 1] (0 = identity, 1 = full mosaic)
    #[arg(short = 'I', long = "intensity", default_value_t = 0.8)]
    intensity: f64,

    /// Color-transfer blend weight in [0, 1] (0 = raw tile, 1 = fully transferred)
    #[arg(short = 'B', long = "blendin", default_value_t = 0.8)]
    blendin: f64,

    /// Scheduling strategy: s (sequential), p (fixed pool), w (work-steal)
    #[arg(short = 'M', long = "mode", default_value = "s")]
    mode: ModeArg,

    /// Worker count for `-M p`/`-M w`
    #[arg(short = 'T', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Seed for deterministic tile selection (omit for true randomness)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write log to file (-l default, -l path.log custom)
    #[arg(short = 'l', long = "log")]
    #[allow(clippy::option_option)]
    log: Option<Option<PathBuf>>,
}

fn default_log_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        let mut log_path = exe_path;
        log_path.set_extension("log");
        log_path
    } else {
        PathBuf::from("mosaic.log")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = match &cli.log {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(default_log_path()),
        None => None,
    };
    init_tracing(cli.verbose, log_path.as_ref());
    if let Some(ref path) = log_path {
        if let Ok(logger) = Logger::new(path) {
            if let Ok(mut guard) = LOGGER.lock() {
                *guard = Some(logger);
            }
            if cli.verbose > 0 {
                log(&format!("Logging to: {}", path.display()));
            }
        }
    }

    let config = Config {
        in_path: cli.in_path,
        out_path: cli.out_path,
        tiles_dir: cli.tiles_dir,
        tile_size: cli.tile_size,
        upscale: cli.upscale,
        intensity: cli.intensity,
        blendin: cli.blendin,
        mode: cli.mode.into(),
        threads: cli.threads,
        seed: cli.seed,
    };

    let timings = mosaic_scheduler::run(&config).context("mosaic run failed")?;

    println!("stage a: {:.2}s", timings.stage_a.as_secs_f64());
    println!("stage b: {:.2}s", timings.stage_b.as_secs_f64());

    Ok(())
}
