//! The background download workflow.
//!
//! A [`Job`] is one user request: an input line and an output directory. The
//! worker classifies the input, resolves it to songs, downloads and tags
//! each song and bundles playlists into a zip archive. It runs sequentially
//! on a single background task and reports progress as [`Status`] messages
//! over a one-way channel; the final [`Report`] is the task's return value.
//!
//! Failures never abort the task with an error: they are turned into status
//! messages, and for playlists into a `Failed` entry for the affected song.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    bundle,
    downloader::{Destination, Downloader, Target},
    input::Request,
    spotify::{MetadataSource, SpotifyError},
    tags,
    types::{Outcome, Report, Resolved, SongQuery, Status, TrackMetadata},
    utils,
};

#[derive(Debug, Clone)]
pub struct Job {
    pub input: String,
    pub directory: PathBuf,
    pub embed_cover: bool,
}

/// Collaborators a job runs against.
#[derive(Clone)]
pub struct Context {
    pub metadata: Arc<dyn MetadataSource>,
    pub downloader: Arc<dyn Downloader>,
}

/// Sending half of the status stream. Messages sent after the receiver is
/// gone are dropped.
#[derive(Clone)]
pub struct StatusSender(UnboundedSender<Status>);

impl StatusSender {
    pub fn new(tx: UnboundedSender<Status>) -> Self {
        Self(tx)
    }

    fn send(&self, status: Status) {
        let _ = self.0.send(status);
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.send(Status::Info(msg.into()));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.send(Status::Success(msg.into()));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.send(Status::Warning(msg.into()));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.send(Status::Error(msg.into()));
    }
}

/// Starts `job` on a background task.
///
/// Returns the task handle, which yields the job's [`Report`], and the
/// receiving end of its status stream. The stream closes when the job ends.
pub fn spawn(job: Job, ctx: Context) -> (JoinHandle<Report>, UnboundedReceiver<Status>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let status = StatusSender::new(tx);
    let handle = tokio::spawn(async move { run(&job, &ctx, &status).await });
    (handle, rx)
}

/// Runs `job` to completion on the current task.
pub async fn run(job: &Job, ctx: &Context, status: &StatusSender) -> Report {
    let mut report = Report::default();

    let request = Request::parse(&job.input);
    if let Request::YouTube(url) = &request {
        download_video(job, ctx, status, url, &mut report).await;
        return report;
    }

    match resolve(&request, ctx.metadata.as_ref()).await {
        Ok(Resolved::Single(song)) => download_single(job, ctx, status, &song, &mut report).await,
        Ok(Resolved::Playlist { name, songs }) => {
            download_playlist(job, ctx, status, &name, &songs, &mut report).await
        }
        Err(e) => status.error(format!("Unable to fetch song details. {}", e)),
    }

    report
}

/// Turns a classified request into the songs to download.
pub async fn resolve(
    request: &Request,
    metadata: &dyn MetadataSource,
) -> Result<Resolved, SpotifyError> {
    match request {
        Request::SpotifyTrack(id) => Ok(Resolved::Single(metadata.track(id).await?)),
        Request::SpotifyPlaylist(id) => {
            let (name, songs) = metadata.playlist(id).await?;
            Ok(Resolved::Playlist { name, songs })
        }
        Request::YouTube(url) => Ok(Resolved::Single(SongQuery::text(url.clone()))),
        Request::Search(text) => Ok(Resolved::Single(SongQuery::text(text.clone()))),
    }
}

async fn download_single(
    job: &Job,
    ctx: &Context,
    status: &StatusSender,
    song: &SongQuery,
    report: &mut Report,
) {
    let file = utils::song_file_name(song);
    let target = job.directory.join(&file);

    if target.exists() {
        status.warning(format!("{} already exists. Skipping...", file));
        report.push(file, Some(target), Outcome::Skipped);
        return;
    }

    status.info(format!("Downloading song: {}", file));
    match download_song(job, ctx, status, song, &target).await {
        Ok(path) => {
            status.success("Download and metadata update completed successfully!");
            report.push(file, Some(path), Outcome::Downloaded);
        }
        Err(e) => {
            status.error(e.clone());
            report.push(file, None, Outcome::Failed(e));
        }
    }
}

async fn download_playlist(
    job: &Job,
    ctx: &Context,
    status: &StatusSender,
    name: &str,
    songs: &[SongQuery],
    report: &mut Report,
) {
    let name = utils::sanitize_name(name);
    let zip_name = utils::zip_file_name(&name);
    let zip_path = job.directory.join(&zip_name);

    if zip_path.exists() {
        status.warning(format!("{} already exists. Skipping...", zip_name));
        return;
    }

    if songs.is_empty() {
        status.warning(format!("Playlist '{}' has no tracks.", name));
        return;
    }

    let playlist_dir = job.directory.join(&name);
    if let Err(e) = async_fs::create_dir_all(&playlist_dir).await {
        status.error(format!("Cannot create {}: {}", playlist_dir.display(), e));
        return;
    }

    let total = songs.len();
    for (index, song) in songs.iter().enumerate() {
        let file = utils::song_file_name(song);
        let target = playlist_dir.join(&file);

        if target.exists() {
            status.warning(format!("{} already exists. Skipping...", file));
            report.push(file, Some(target), Outcome::Skipped);
            continue;
        }

        status.info(format!("Downloading {}/{} song: {}", index + 1, total, file));
        match download_song(job, ctx, status, song, &target).await {
            Ok(path) => report.push(file, Some(path), Outcome::Downloaded),
            Err(e) => {
                status.warning(format!("Failed to download {}: {}", file, e));
                report.push(file, None, Outcome::Failed(e));
            }
        }
    }

    match bundle_playlist(playlist_dir, zip_path.clone()).await {
        Ok(0) => status.warning(format!(
            "No song of playlist '{}' could be downloaded, {} not created.",
            name, zip_name
        )),
        Ok(_) => {
            status.success(format!(
                "Playlist download and zip completed successfully: {}",
                zip_name
            ));
            report.archive = Some(zip_path);
        }
        Err(e) => status.error(format!("Failed to create {}: {}", zip_name, e)),
    }
}

async fn download_video(
    job: &Job,
    ctx: &Context,
    status: &StatusSender,
    url: &str,
    report: &mut Report,
) {
    status.info(format!("Downloading audio of: {}", url));

    let target = Target::Url(url.to_string());
    let destination = Destination::Directory(job.directory.clone());
    let downloaded = match ctx.downloader.download(&target, &destination).await {
        Ok(d) => d,
        Err(e) => {
            status.error(e.to_string());
            report.push(url, None, Outcome::Failed(e.to_string()));
            return;
        }
    };

    let file = downloaded
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());
    let title = downloaded.title.clone().unwrap_or_else(|| {
        downloaded
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string())
    });

    // the uploader is rarely the credited artist, so the cover is looked up by title only
    let lookup = SongQuery::text(title.clone());
    let song = SongQuery {
        artist: downloaded.uploader.as_deref().map(uploader_as_artist),
        ..lookup.clone()
    };
    tag_file(job, ctx, status, &downloaded.path, &song, &lookup).await;

    status.success("Download and metadata update completed successfully!");
    report.push(file, Some(downloaded.path), Outcome::Downloaded);
}

/// Downloads `song` into `target` and tags it. Returns the written path.
async fn download_song(
    job: &Job,
    ctx: &Context,
    status: &StatusSender,
    song: &SongQuery,
    target: &Path,
) -> Result<PathBuf, String> {
    let query = Target::Search(song.search_terms());
    let destination = Destination::Stem(utils::output_stem(target));

    let downloaded = ctx
        .downloader
        .download(&query, &destination)
        .await
        .map_err(|e| e.to_string())?;

    tag_file(job, ctx, status, &downloaded.path, song, song).await;
    Ok(downloaded.path)
}

/// Writes tags for `song` into `path`; cover art is looked up with `lookup`.
///
/// Tagging problems are reported but leave the downloaded file in place.
async fn tag_file(
    job: &Job,
    ctx: &Context,
    status: &StatusSender,
    path: &Path,
    song: &SongQuery,
    lookup: &SongQuery,
) {
    let cover = if job.embed_cover {
        match ctx.metadata.cover_art(lookup).await {
            Ok(cover) => cover,
            Err(e) => {
                status.warning(format!("Failed to fetch album art: {}", e));
                None
            }
        }
    } else {
        None
    };

    let metadata = TrackMetadata {
        title: song.title.clone(),
        artist: song.artist.clone(),
        album: song.album.clone(),
        cover,
    };

    let owned_path = path.to_path_buf();
    let written =
        tokio::task::spawn_blocking(move || tags::write_metadata(&owned_path, &metadata)).await;

    match written {
        Ok(Ok(())) => match &song.artist {
            Some(artist) => status.info(format!("Metadata added to: {} by {}", song.title, artist)),
            None => status.info(format!("Metadata added to: {}", song.title)),
        },
        Ok(Err(e)) => status.warning(format!("Failed to add metadata: {}", e)),
        Err(e) => status.warning(format!("Failed to add metadata: {}", e)),
    }
}

/// Zips the playlist directory, or removes it when nothing was downloaded.
async fn bundle_playlist(dir: PathBuf, zip_path: PathBuf) -> Result<usize, String> {
    tokio::task::spawn_blocking(move || -> Result<usize, bundle::BundleError> {
        if bundle::collect_tracks(&dir)?.is_empty() {
            std::fs::remove_dir_all(&dir).map_err(|source| bundle::BundleError::Io {
                path: dir.clone(),
                source,
            })?;
            return Ok(0);
        }
        bundle::create_zip(&dir, &zip_path)
    })
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())
}

/// Drops the " - Topic" suffix YouTube adds to auto-generated artist channels.
pub fn uploader_as_artist(uploader: &str) -> String {
    uploader
        .strip_suffix(" - Topic")
        .unwrap_or(uploader)
        .trim()
        .to_string()
}
