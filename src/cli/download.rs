use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::{self, Settings},
    downloader::YtDlp,
    error, failure, info,
    input::Request,
    spotify::SpotifyClient,
    success, tags,
    types::{Outcome, Report, Status},
    utils, warning,
    worker::{self, Context, Job},
};

/// Builds the Spotify client and the extractor from `settings`.
pub fn context(settings: &Settings) -> Context {
    Context {
        metadata: Arc::new(SpotifyClient::new(settings)),
        downloader: Arc::new(YtDlp::new(settings.ytdlp.clone(), settings.audio_quality)),
    }
}

/// Downloads a single input and prints a summary.
pub async fn download(settings: &Settings, input: String, dir: Option<PathBuf>, embed_cover: bool) {
    let input = input.trim().to_string();
    if input.is_empty() {
        error!("Please enter a valid URL or song name.");
    }

    let directory = dir.unwrap_or_else(|| settings.download_dir.clone());
    if let Err(e) = config::ensure_dir(&directory).await {
        error!("{}", e);
    }

    let ctx = context(settings);
    let report = run_job(
        Job {
            input,
            directory,
            embed_cover,
        },
        ctx,
    )
    .await;

    print_report(&report);
}

/// Runs `job` on the background worker and renders its status stream.
pub async fn run_job(job: Job, ctx: Context) -> Report {
    let request = Request::parse(&job.input);
    info!("Starting download for: {}", request);
    if request.is_playlist() {
        info!("Songs are collected in a folder and zipped when the playlist is done.");
    }
    info!("Saving to: {}", job.directory.display());

    let (handle, mut statuses) = worker::spawn(job, ctx);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    while let Some(status) = statuses.recv().await {
        if let Status::Info(msg) = &status {
            pb.set_message(msg.clone());
        }
        pb.suspend(|| print_status(&status));
    }
    pb.finish_and_clear();

    match handle.await {
        Ok(report) => report,
        Err(e) => {
            failure!("Download task failed: {}", e);
            Report::default()
        }
    }
}

pub fn print_status(status: &Status) {
    match status {
        Status::Info(msg) => info!("{}", msg),
        Status::Success(msg) => success!("{}", msg),
        Status::Warning(msg) => warning!("{}", msg),
        Status::Error(_) => failure!("{}", status),
    }
}

pub fn print_report(report: &Report) {
    if report.tracks.len() > 1 {
        println!("{}", Table::new(utils::report_table_rows(report)));
    }

    let skipped = report.count(|o| matches!(o, Outcome::Skipped));
    if report.tracks.len() > 1 || report.failed() > 0 {
        info!(
            "{} downloaded, {} skipped, {} failed.",
            report.downloaded(),
            skipped,
            report.failed()
        );
    }

    if let [track] = report.tracks.as_slice() {
        if let (Outcome::Downloaded, Some(path)) = (&track.outcome, &track.path) {
            print_tags(path);
        }
    }

    if let Some(archive) = &report.archive {
        success!("Saved {}", archive.display());
    }
}

fn print_tags(path: &Path) {
    match tags::read_metadata(path) {
        Ok(summary) => info!(
            "Tags: {} | {} | {} | cover: {}",
            summary.title.as_deref().unwrap_or("-"),
            summary.artist.as_deref().unwrap_or("-"),
            summary.album.as_deref().unwrap_or("-"),
            summary.cover_mime.as_deref().unwrap_or("none")
        ),
        Err(e) => warning!("{}", e),
    }
}
