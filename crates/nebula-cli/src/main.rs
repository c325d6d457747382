use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nebula_core::{DebugOptions, FixedTicks, LayerStack, NebulaConfig, Ticker};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the animation and write one PNG per tick
    Render(RenderArgs),
    /// Print the default configuration as JSON
    Defaults,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON configuration file; defaults are used for absent fields
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of ticks to render, at least one
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// RNG seed, overriding the configuration's
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, value_name = "DIR", default_value = "frames")]
    out: PathBuf,

    /// Draw every debug overlay
    #[arg(long)]
    debug: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    let result = match cli.command {
        Command::Render(args) => render(&args).map(|written| {
            info!(frames = written.len(), out = %args.out.display(), "Render complete.");
        }),
        Command::Defaults => print_defaults(),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_directive(level))
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
}

fn level_directive(level: LogLevel) -> Directive {
    let level = match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };
    level.into()
}

fn print_defaults() -> Result<()> {
    let json = serde_json::to_string_pretty(&NebulaConfig::default())?;
    println!("{json}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<NebulaConfig> {
    let Some(path) = path else {
        return Ok(NebulaConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

/// Runs the stack for `args.frames` ticks, writing `frame_NNNN.png` after each one.
#[instrument(level = "info", skip_all, fields(frames = args.frames))]
fn render(args: &RenderArgs) -> Result<Vec<PathBuf>> {
    let mut config = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.debug {
        config.debug = DebugOptions::all();
    }

    let mut stack = LayerStack::new(config).context("invalid configuration")?;
    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let mut written = Vec::new();
    let mut failure = None;
    Ticker::new(FixedTicks::new(args.frames)).run(&mut stack, |stack| {
        if failure.is_some() {
            return;
        }
        let path = args.out.join(format!("frame_{:04}.png", written.len()));
        match nebula_skia::write_png(&stack.frame(), &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                let context = format!("writing {}", path.display());
                failure = Some(anyhow::Error::new(e).context(context));
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(written),
    }
}
