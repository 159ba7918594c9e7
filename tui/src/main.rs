//! Cabin TUI Entry Point
//!
//! Launches the terminal chat with the airline assistant.
//!
//! Usage:
//!   cabin-tui [OPTIONS]
//!
//! Options:
//!   --api-url <URL>           Assistant service base URL
//!   --config <PATH>           Config file (default: ~/.config/cabin-assist/config.toml)
//!   --thanks-delay-ms <MS>    How long the survey thank-you card stays up
//!   --no-health-check         Skip the startup `/health` probe
//!   --log-level <FILTER>      Log filter when RUST_LOG is unset
//!   --log-file <PATH>         Write logs to a file instead of stderr

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cabin_core::config::{load_config, load_config_from_path, ConfigOverrides};
use cabin_core::{Conductor, ConductorConfig, HttpBackend};
use cabin_tui::App;

/// Terminal chat with the cabin-assist airline assistant
#[derive(Debug, Parser)]
#[command(name = "cabin-tui", version, about)]
struct Args {
    /// Assistant service base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Config file path
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// How long the survey thank-you card stays up (milliseconds)
    #[arg(long)]
    thanks_delay_ms: Option<u64>,

    /// Skip the startup health probe
    #[arg(long)]
    no_health_check: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "CABIN_LOG", default_value = "error")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.api_url {
            overrides = overrides.with_base_url(url.clone());
        }
        if let Some(ms) = self.thanks_delay_ms {
            overrides = overrides.with_thanks_delay_ms(ms);
        }
        if self.no_health_check {
            overrides = overrides.with_health_check(false);
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(&args)?;

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: cabin-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or the session");
        eprintln!("is non-interactive (CI, container, SSH without -t).");
        std::process::exit(1);
    }

    let mut config = match args.config {
        Some(ref path) => load_config_from_path(Some(path.clone())),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        base_url = %config.base_url,
        source = %config.source(),
        "Configuration loaded"
    );

    let backend = HttpBackend::new(config.backend()).context("Failed to build HTTP client")?;
    let conductor = Conductor::new(backend, ConductorConfig::from(&config));

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let (width, height) = crossterm::terminal::size()?;
    let mut app = App::new(conductor, width, height);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Install the global subscriber
///
/// Logs go to stderr unless `--log-file` is given; the default filter keeps
/// stderr quiet while the alternate screen is up.
fn init_tracing(args: &Args) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log_level))?;

    let file_layer = match args.log_file {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}
