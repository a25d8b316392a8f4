//! Binary entrypoint for the Resonantia CLI.
//!
//! Commands:
//! - `serve [--bind <addr>] [--daemon]` - run the chat proxy (`POST /api/chat`)
//! - `init` - write a starter `config.toml`
//! - `status` - print the effective configuration (credential redacted)
//! - `glitch <text> [--seed <n>] [--probability <p>] [--frames <n>]` - render glitch text
//! - `boot` - play the console boot sequence in the terminal
//! - `mode [interpretation|translation|ar|sync]` - print a mode readout
//!
//! See the library crate docs for module-level details: `resonantia::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use resonantia::config::Config;
use resonantia::console::{BootSequence, Mode, DEFAULT_READOUT};
use resonantia::glitch::{glitch, SeedClock, DEFAULT_SUBSTITUTION};

#[derive(Parser)]
#[command(name = "resonantia")]
#[command(about = "Δ Resonantia console backend: glitch engine and persona chat proxy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat proxy
    Serve {
        /// Listen address, overrides config and RESONANTIA_BIND (e.g. 0.0.0.0:3000)
        #[arg(short, long)]
        bind: Option<String>,

        /// Run as a background daemon (Unix only)
        #[arg(short, long)]
        daemon: bool,

        /// PID file location (for daemon mode)
        #[arg(long, default_value = "/tmp/resonantia.pid")]
        pid_file: String,
    },
    /// Write a default configuration file
    Init,
    /// Show the effective configuration
    Status,
    /// Render text through the glitch engine
    Glitch {
        /// Text to corrupt
        text: String,
        /// Seed of the first frame (defaults to 0)
        #[arg(short, long)]
        seed: Option<f64>,
        /// Substitution probability, overrides config
        #[arg(short, long)]
        probability: Option<f64>,
        /// Number of frames to animate, one per configured tick
        #[arg(short, long, default_value_t = 1)]
        frames: u32,
    },
    /// Play the console boot sequence
    Boot {
        /// Minimum loader duration in milliseconds
        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,
    },
    /// Print the readout of an interface mode, or the idle readout when none is given
    Mode {
        /// interpretation, translation, ar or sync
        mode: Option<String>,
        /// Seed for the glitched rendering
        #[arg(short, long)]
        seed: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Some(resolve_config(&cli.config).await?),
    };
    if !defers_logging(&cli.command) {
        init_logging(&pre_config, cli.verbose);
    }

    match cli.command {
        Commands::Serve {
            bind,
            daemon,
            pid_file,
        } => {
            let mut config = pre_config.unwrap_or_default();
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            #[cfg(all(unix, feature = "daemon"))]
            if daemon {
                daemonize_process(&config, &pid_file)?;
            }

            #[cfg(not(all(unix, feature = "daemon")))]
            if daemon {
                let _ = pid_file; // Suppress unused warning
                eprintln!("Error: Daemon mode requires Unix platform and 'daemon' feature.");
                eprintln!("Compile with: cargo build --features daemon");
                std::process::exit(1);
            }

            info!("Starting Resonantia v{}", env!("CARGO_PKG_VERSION"));
            resonantia::chat::serve(&config).await?;
        }
        Commands::Init => {
            if Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it untouched", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            info!(
                "Set {} in the environment to supply the upstream credential",
                resonantia::config::ENV_API_KEY
            );
        }
        Commands::Status => {
            let config = pre_config.unwrap_or_default();
            println!("Resonantia v{}", env!("CARGO_PKG_VERSION"));
            println!("  listen:      {}", config.server.bind);
            println!("  upstream:    {}", config.upstream.endpoint);
            println!("  model:       {}", config.upstream.model);
            println!(
                "  api key:     {}",
                if config.upstream.is_configured() {
                    "configured"
                } else {
                    "MISSING"
                }
            );
            println!(
                "  generation:  temperature {} / max_tokens {} / timeout {}s",
                config.upstream.temperature,
                config.upstream.max_tokens,
                config.upstream.timeout_seconds
            );
            println!("  persona:     {} chars", config.persona.prompt.chars().count());
            println!(
                "  glitch:      p={} tick={}ms",
                config.glitch.substitution_probability, config.glitch.tick_ms
            );
        }
        Commands::Glitch {
            text,
            seed,
            probability,
            frames,
        } => {
            let config = pre_config.unwrap_or_default();
            let p = probability.unwrap_or(config.glitch.substitution_probability);
            let offset = seed.unwrap_or(0.0);
            if frames <= 1 {
                println!("{}", glitch(&text, offset, p));
                return Ok(());
            }
            let tty = atty::is(atty::Stream::Stdout);
            let mut clock = SeedClock::new(Duration::from_millis(config.glitch.tick_ms));
            let mut out = std::io::stdout();
            for _ in 0..frames {
                let frame = glitch(&text, offset + clock.tick().await, p);
                if tty {
                    write!(out, "\r\x1b[2K{}", frame)?;
                    out.flush()?;
                } else {
                    writeln!(out, "{}", frame)?;
                }
            }
            if tty {
                writeln!(out)?;
            }
        }
        Commands::Boot { duration_ms } => {
            play_boot(BootSequence::new(
                Duration::from_millis(duration_ms),
                Duration::from_millis(duration_ms.min(800)),
            ))
            .await?;
        }
        Commands::Mode { mode, seed } => {
            let (label, readout) = match mode {
                Some(mode) => {
                    let mode: Mode = mode.parse()?;
                    (mode.key(), mode.readout())
                }
                None => ("idle", DEFAULT_READOUT),
            };
            let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as f64 / 1500.0);
            println!("[{}] {}", label, readout);
            println!("      {}", glitch(readout, seed.floor(), DEFAULT_SUBSTITUTION));
        }
    }

    Ok(())
}

/// Load the config file when present, otherwise start from defaults; then apply env overrides.
async fn resolve_config(path: &str) -> Result<Config> {
    let config = if Path::new(path).exists() {
        Config::load(path).await?
    } else {
        Config::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Daemon mode initializes logging after the re-spawn, in the child.
fn defers_logging(command: &Commands) -> bool {
    matches!(command, Commands::Serve { daemon: true, .. })
}

async fn play_boot(boot: BootSequence) -> Result<()> {
    let tty = atty::is(atty::Stream::Stdout);
    let mut out = std::io::stdout();
    let start = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut last_message = "";
    let mut seed = 0.0;
    loop {
        ticker.tick().await;
        let frame = boot.progress(start.elapsed());
        let title = glitch("Δ RESONANTIA", seed, 0.25);
        let filled = frame.percent as usize / 5;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
        if tty {
            write!(
                out,
                "\r\x1b[2K{}  [{}] {:>3}%  {}",
                title, bar, frame.percent, frame.message
            )?;
            out.flush()?;
        } else if frame.message != last_message {
            writeln!(out, "[{:>3}%] {}", frame.percent, frame.message)?;
        }
        last_message = frame.message;
        seed += 1.0;
        if frame.ready {
            break;
        }
    }
    if tty {
        writeln!(out)?;
    }
    writeln!(out, "⊚ Visitor ID: ⊚-████ · Access granted")?;
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // keep dependency chatter out of -v output
    builder.filter_module("hyper", log::LevelFilter::Warn);
    builder.filter_module("reqwest", log::LevelFilter::Warn);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // In daemon mode stdout is redirected, so this will be false
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}

/// Daemonize the process (Unix only)
///
/// Re-spawns the binary without `--daemon`, detached from the terminal with output going to
/// the log file, writes the child's PID, and exits the parent.
#[cfg(all(unix, feature = "daemon"))]
fn daemonize_process(config: &Config, pid_file: &str) -> Result<()> {
    use std::fs::OpenOptions;
    use std::process::{Command, Stdio};

    let log_path = config
        .logging
        .file
        .as_deref()
        .unwrap_or("resonantia.log");

    let current_exe = std::env::current_exe()?;
    let child_args: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| arg != "--daemon" && arg != "-d")
        .collect();

    let log_file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let child = Command::new(&current_exe)
        .args(&child_args)
        .stdin(Stdio::null())
        .stdout(log_file.try_clone()?)
        .stderr(log_file)
        .spawn()?;

    std::fs::write(pid_file, format!("{}", child.id()))?;

    // Parent exits here; the child serves
    std::process::exit(0);
}
