//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use pagesmith_core::{ProgressReporter, RunContext, RunResult};
use pagesmith_shared::{AppConfig, encode, init_config, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pagesmith: one generated question page per run.
#[derive(Parser)]
#[command(
    name = "pagesmith",
    version,
    about = "Generate a question page with Gemini, publish it, and announce it on Telegram.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.pagesmith/pagesmith.toml).
    #[arg(long, global = true, env = "PAGESMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate, publish, and announce one new page.
    Run,

    /// Rebuild sitemap.xml from the pages already on disk.
    Sitemap,

    /// Print the base64 form of a secret, for storing in the environment.
    Encode {
        /// Raw secret value.
        value: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagesmith=info",
        1 => "pagesmith=debug",
        _ => "pagesmith=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Command::Run) => cmd_run(cli.config).await,
        Some(Command::Sitemap) => cmd_sitemap(cli.config),
        Some(Command::Encode { value }) => {
            println!("{}", encode(value));
            Ok(())
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config),
        },
    }
}

fn resolve_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(&path)
            .wrap_err_with(|| format!("loading config from {}", path.display()))?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let mut ctx = RunContext::prepare(config)?;

    info!(run_id = %ctx.run_id, "generating new page");

    let reporter = CliProgress::new();
    let result = pagesmith_core::run(&mut ctx, &reporter)
        .await
        .wrap_err("Failed")?;

    println!();
    println!("  Page published!");
    println!("  Topic:    {}", result.topic);
    println!("  File:     {}", result.page_path.display());
    println!("  URL:      {}", result.page_url);
    println!("  Count:    {}", result.topic_count);
    match result.sitemap_urls {
        Some(n) => println!("  Sitemap:  {n} URLs"),
        None => println!("  Sitemap:  failed (see log)"),
    }
    println!(
        "  Notified: {}",
        if result.notified { "yes" } else { "no" }
    );
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_sitemap(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let count = pagesmith_core::regenerate_sitemap(&config)?;
    println!(
        "Sitemap written to {} ({count} URLs)",
        config.site.sitemap_path().display()
    );
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &RunResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
