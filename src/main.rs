use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use offlinefy::{cli, config, error, warning};

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
    /// Download a Spotify track/playlist, a YouTube video or a song name
    Download(DownloadOptions),

    /// Read inputs line by line and download each of them
    Shell(ShellOptions),

    /// Show the resolved configuration
    Config,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// Spotify track or playlist URL, YouTube URL, or free-text song name
    #[clap(required = true, num_args = 1..)]
    input: Vec<String>,

    /// Download directory (default: OFFLINEFY_DOWNLOAD_DIR or ~/Music)
    #[clap(long, short)]
    dir: Option<PathBuf>,

    /// Do not look up and embed cover art
    #[clap(long)]
    no_cover: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShellOptions {
    /// Download directory (default: OFFLINEFY_DOWNLOAD_DIR or ~/Music)
    #[clap(long, short)]
    dir: Option<PathBuf>,

    /// Do not look up and embed cover art
    #[clap(long)]
    no_cover: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("{}", e),
    };

    match cli.command {
        Command::Download(opt) => {
            cli::download(&settings, opt.input.join(" "), opt.dir, !opt.no_cover).await
        }
        Command::Shell(opt) => cli::shell(&settings, opt.dir, !opt.no_cover).await,
        Command::Config => cli::show_config(&settings).await,
        Command::Completions(_) => {}
    }
}
