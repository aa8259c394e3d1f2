use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use trackmark::{
    Res, cli,
    config::{self, ClientConfig},
    error,
    spotify::SpotifyClient,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    json_logs: bool,

    /// Print request and cache statistics before exiting
    #[clap(long, global = true)]
    stats: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show a single track
    Track(TrackOptions),

    /// Show all tracks of a playlist
    Playlist(PlaylistOptions),

    /// Find the first playlist that contains a track
    Match(MatchOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Spotify track id
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Spotify playlist id
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct MatchOptions {
    /// Spotify track id to look for
    track_id: String,

    /// Playlist to check; repeat in priority order
    #[clap(
        short = 'p',
        long = "playlist",
        required = true,
        action = ArgAction::Append,
        num_args = 1
    )]
    playlists: Vec<String>,

    /// Also match tracks with the same name and artists under another id
    #[clap(long)]
    aliases: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => error!("Cannot set up Spotify client. Err: {}", e),
    };

    match cli.command {
        Command::Track(opt) => cli::show_track(&client, &opt.id).await,
        Command::Playlist(opt) => cli::show_playlist(&client, &opt.id).await,
        Command::Match(opt) => {
            cli::match_track(&client, &opt.track_id, &opt.playlists, opt.aliases).await
        }
        Command::Completions(_) => {}
    }

    if cli.stats {
        cli::print_stats(&client);
    }
    client.shutdown();
}

fn build_client() -> Res<SpotifyClient> {
    let config = ClientConfig::from_env()?;
    Ok(SpotifyClient::new(config)?)
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
