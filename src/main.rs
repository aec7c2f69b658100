use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use kexcli::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that every configured credential can authenticate
    Auth,

    /// Handle the K-pop artist table
    Artists(ArtistsOptions),

    /// Extract the full artist/album/track catalog into CSV tables
    Extract(ExtractOptions),

    /// Append track popularity to an extracted track table
    Popularity(PopularityOptions),

    /// Show output tables and credential configuration
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle the K-pop artist table",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct ArtistsOptions {
    /// Search for artists by name
    #[clap(long)]
    pub search: Option<String>,

    /// Subcommands under `artists` (e.g., `update`)
    #[command(subcommand)]
    pub command: Option<ArtistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArtistsSubcommand {
    /// Re-run artist discovery and rewrite today's table
    Update(ArtistsUpdateOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsUpdateOpts {
    /// Force re-discovery even if today's table exists
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractOptions {
    /// Number of parallel workers to slice the artist list across
    #[clap(long, default_value_t = 20)]
    pub workers: usize,

    /// Only process the first N artists (sanity runs)
    #[clap(long)]
    pub take: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct PopularityOptions {
    /// Number of parallel workers to slice the track list across
    #[clap(long, default_value_t = 20)]
    pub workers: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("KEXCLI_LOG")
                .from_env_lossy(),
        )
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Artists(opt) => match opt.command {
            Some(ArtistsSubcommand::Update(u)) => cli::update_artists(u.force).await,
            None => cli::list_artists(opt.search).await,
        },

        Command::Extract(opt) => cli::extract(opt.workers, opt.take).await,
        Command::Popularity(opt) => cli::popularity(opt.workers).await,

        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
