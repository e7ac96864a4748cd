use channel_drop::config::{self, MirrorConfig};
use channel_drop::gallery::{Gallery, ManifestSource};
use channel_drop::{generate, output, sync};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

fn version_string() -> &'static str {
    if env!("CHANNEL_DROP_ON_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    let hash = env!("CHANNEL_DROP_GIT_HASH");
    if hash.is_empty() {
        "dev@unknown"
    } else {
        // Leaked once at startup
        Box::leak(format!("dev@{hash}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "channel-drop")]
#[command(about = "Mirror Discord channel attachments into a static file gallery")]
#[command(long_about = "\
Mirror Discord channel attachments into a static file gallery

Reads the most recent messages of one channel through the Discord REST API,
writes every attachment into a JSON manifest, and renders a gallery page
from that manifest. Point GitHub Pages at the output directory.

  docs/
  ├── files.json     # Manifest: name, url, uploaded_at, author, size
  └── index.html     # Gallery page

Environment:
  DISCORD_BOT_TOKEN    Bot token (required for sync/build, never read from config)
  DISCORD_CHANNEL_ID   Channel to mirror (overrides discord.channel_id)
  RUST_LOG             Log filter (default: info)

Run 'channel-drop gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; stock defaults apply when missing)
    #[arg(long, default_value = "channel-drop.toml", global = true)]
    config: PathBuf,

    /// Output directory (overrides output.dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch channel attachments into the manifest
    Sync,
    /// Render the gallery page from a manifest
    Render {
        /// Load the published manifest from this site URL instead of the
        /// local output directory
        #[arg(long)]
        from_url: Option<String>,
    },
    /// Run the full pipeline: sync → render
    Build,
    /// Validate config and environment without fetching
    Check,
    /// Print a stock config file with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Sync => {
            let config = resolve_config(&cli)?;
            run_sync(&config).await?;
        }
        Command::Render { from_url } => {
            let config = resolve_config(&cli)?;
            let source = match from_url {
                Some(base_url) => ManifestSource::Http {
                    base_url: base_url.clone(),
                    manifest: config.output.manifest.clone(),
                },
                None => local_source(&config),
            };
            run_render(&config, source).await?;
        }
        Command::Build => {
            let config = resolve_config(&cli)?;

            println!("==> Stage 1: Syncing channel attachments");
            run_sync(&config).await?;

            println!("==> Stage 2: Rendering gallery");
            run_render(&config, local_source(&config)).await?;

            println!("==> Build complete: {}", config.output.dir.display());
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            let token = config::bot_token(config::process_env);
            output::print_check_output(&config, token.is_ok());
            config.channel_id()?;
            token?;
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// File → environment → CLI flags.
fn resolve_config(cli: &Cli) -> Result<MirrorConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    config.apply_env(config::process_env);
    if let Some(dir) = &cli.output {
        config.output.dir = dir.clone();
    }
    Ok(config)
}

fn local_source(config: &MirrorConfig) -> ManifestSource {
    ManifestSource::File {
        path: config.output.manifest_path(),
    }
}

async fn run_sync(config: &MirrorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let token = config::bot_token(config::process_env)?;
    let report = sync::run_sync(config, &token).await?;
    output::print_sync_output(&report, config.channel_id()?);
    Ok(())
}

async fn run_render(
    config: &MirrorConfig,
    source: ManifestSource,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut gallery = Gallery::new(source, config.discord.timeout());
    gallery.load().await;
    let page = generate::generate(&gallery, config)?;
    output::print_render_output(&gallery.source().to_string(), gallery.state(), &page);
    Ok(())
}
