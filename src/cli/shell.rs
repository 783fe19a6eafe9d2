use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    cli::download::{context, print_report, run_job},
    config::{self, Settings},
    info, success, warning,
    worker::Job,
};

const HELP: &str = "Enter a Spotify/YouTube URL or a song name. Commands: :dir <path>, :cover on|off, :help, :quit";

/// A line typed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Download(String),
    SetDir(PathBuf),
    Cover(bool),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ShellCommand::Empty;
        }

        let Some(command) = line.strip_prefix(':') else {
            return ShellCommand::Download(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("q" | "quit" | "exit", _) => ShellCommand::Quit,
            ("h" | "help", _) => ShellCommand::Help,
            ("dir", dir) if !dir.is_empty() => ShellCommand::SetDir(PathBuf::from(dir)),
            ("cover", "on") => ShellCommand::Cover(true),
            ("cover", "off") => ShellCommand::Cover(false),
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}

/// Reads inputs line by line and downloads each one in turn.
pub async fn shell(settings: &Settings, dir: Option<PathBuf>, embed_cover: bool) {
    let mut directory = dir.unwrap_or_else(|| settings.download_dir.clone());
    let mut embed_cover = embed_cover;
    let ctx = context(settings);

    if let Err(e) = config::ensure_dir(&directory).await {
        warning!("{}", e);
    }

    info!("{}", HELP);
    info!("Download directory: {}", directory.display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warning!("Cannot read input: {}", e);
                break;
            }
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Download(input) => {
                let report = run_job(
                    Job {
                        input,
                        directory: directory.clone(),
                        embed_cover,
                    },
                    ctx.clone(),
                )
                .await;
                print_report(&report);
            }
            ShellCommand::SetDir(dir) => match config::ensure_dir(&dir).await {
                Ok(()) => {
                    success!("Selected Directory: {}", dir.display());
                    directory = dir;
                }
                Err(e) => warning!("{}", e),
            },
            ShellCommand::Cover(on) => {
                embed_cover = on;
                info!("Cover art {}", if on { "enabled" } else { "disabled" });
            }
            ShellCommand::Help => info!("{}", HELP),
            ShellCommand::Quit => break,
            ShellCommand::Empty => warning!("Please enter a valid URL or song name."),
            ShellCommand::Unknown(line) => warning!("Unknown command: {}", line),
        }
    }
}
