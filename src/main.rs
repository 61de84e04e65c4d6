//! nowshare - Main entry point

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nowshare::config::Config;
use nowshare::error::{Error, Result};
use nowshare::format;
use nowshare::mpris::ShareWatcher;
use nowshare::service;
use nowshare::store::TrackStore;
use nowshare::track::{TrackCoreElement, TrackInfo};

#[derive(Parser)]
#[command(name = "nowshare")]
#[command(author, version, about = "Share what's playing - now-playing share text for Linux")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch MPRIS players and emit share text (runs in foreground)
    Watch,

    /// Render share text from metadata given on the command line
    Preview {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        artist: Option<String>,

        #[arg(long)]
        album: Option<String>,

        #[arg(long)]
        composer: Option<String>,

        /// Player application name for the PN placeholder
        #[arg(long)]
        player: Option<String>,

        /// Service URL for the SU placeholder
        #[arg(long)]
        url: Option<String>,

        /// Template to render (default: the configured one)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Validate a template and list the placeholders it uses
    Check {
        /// Template to check (default: the configured one)
        template: Option<String>,
    },

    /// Re-render share text for the most recently seen track
    Last,

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config.general.log_level.clone())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Watch) => run_watcher(config).await,

        Some(Commands::Preview {
            title,
            artist,
            album,
            composer,
            player,
            url,
            template,
        }) => {
            let core = TrackCoreElement {
                title,
                artist,
                album,
                composer,
            };
            let service_url = url.or_else(|| {
                config
                    .sharing
                    .include_service_url
                    .then(|| service::spotify_search_url(&core))
                    .flatten()
            });
            let track = TrackInfo {
                core,
                player_app_name: player,
                service_url,
            };
            let template = template.as_deref().unwrap_or(&config.sharing.template);
            format::validate(template)?;

            render_or_explain(template, &track, &config)
        }

        Some(Commands::Check { template }) => {
            let template = template.as_deref().unwrap_or(&config.sharing.template);
            format::validate(template)?;

            println!("Template OK: {template}");
            let mut seen = Vec::new();
            for pattern in format::contained_patterns(template) {
                if !seen.contains(&pattern) {
                    seen.push(pattern);
                    println!("  {:12} {:?}", pattern.token(), pattern);
                }
            }
            if seen.is_empty() {
                println!("  (no placeholders - output will be the template verbatim)");
            }
            Ok(())
        }

        Some(Commands::Last) | None => {
            let store = TrackStore::new(&config.data_dir()?);
            let track = store.load()?.ok_or_else(|| {
                Error::other("no track recorded yet - run 'nowshare watch' first")
            })?;
            render_or_explain(&config.sharing.template, &track, &config)
        }

        Some(Commands::Config { show, init }) => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }
    }
}

/// Render share text to stdout, or explain why the track is not ready.
fn render_or_explain(template: &str, track: &TrackInfo, config: &Config) -> Result<()> {
    match format::share_text(template, track, &config.sharing.modifiers) {
        Some(text) => {
            println!("{text}");
            Ok(())
        }
        None => Err(Error::other(
            "track not ready: title, artist and album are all required",
        )),
    }
}

async fn run_watcher(config: Config) -> Result<()> {
    use tokio::signal;

    std::fs::create_dir_all(config.data_dir()?)?;

    let watcher = Arc::new(ShareWatcher::new(&config).await?);
    let watcher_clone = watcher.clone();

    tokio::spawn(async move {
        let _ = signal::ctrl_c().await;
        tracing::info!("Received shutdown signal");
        watcher_clone.stop();
    });

    watcher.run().await
}
