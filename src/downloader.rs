//! Audio extraction through the `yt-dlp` executable.
//!
//! `yt-dlp` resolves a search query or URL to the best audio stream and
//! transcodes it to MP3 with `ffmpeg`. The [`Downloader`] trait keeps the
//! worker independent of the executable so it can be tested with fakes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Separator between the printed fields; not expected inside titles or paths.
const FIELD_SEPARATOR: char = '\t';
const NA: &str = "NA";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("yt-dlp failed: {0}")]
    Failed(String),

    #[error("yt-dlp reported no output file for {0}")]
    MissingOutput(String),
}

/// What to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Free-text query; the first search hit is downloaded.
    Search(String),
    /// A URL the extractor understands directly.
    Url(String),
}

impl Target {
    fn as_arg(&self) -> String {
        match self {
            Target::Search(query) => format!("ytsearch1:{}", query),
            Target::Url(url) => url.clone(),
        }
    }
}

/// Where to put the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Exact output path without extension; `.mp3` is appended.
    Stem(PathBuf),
    /// Directory; the file is named after the media title.
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub title: Option<String>,
    pub uploader: Option<String>,
}

#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(
        &self,
        target: &Target,
        destination: &Destination,
    ) -> Result<Downloaded, DownloadError>;
}

pub struct YtDlp {
    program: String,
    audio_quality: u32,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, audio_quality: u32) -> Self {
        Self {
            program: program.into(),
            audio_quality,
        }
    }

    /// Command-line arguments for one download.
    pub fn args(&self, target: &Target, destination: &Destination) -> Vec<String> {
        let template = match destination {
            Destination::Stem(stem) => format!("{}.%(ext)s", escape_template(stem)),
            Destination::Directory(dir) => {
                format!("{}/%(title)s.%(ext)s", escape_template(dir))
            }
        };

        vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            format!("{}K", self.audio_quality),
            "--no-playlist".to_string(),
            "--no-post-overwrites".to_string(),
            "--no-progress".to_string(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            format!(
                "after_move:%(filepath)s{sep}%(title)s{sep}%(uploader)s",
                sep = FIELD_SEPARATOR
            ),
            "--output".to_string(),
            template,
            target.as_arg(),
        ]
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn download(
        &self,
        target: &Target,
        destination: &Destination,
    ) -> Result<Downloaded, DownloadError> {
        let output = Command::new(&self.program)
            .args(self.args(target, destination))
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DownloadError::Failed(last_lines(
                &String::from_utf8_lossy(&output.stderr),
                3,
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut downloaded = parse_print_output(&stdout);

        if let Destination::Stem(stem) = destination {
            let expected = stem.with_extension("mp3");
            if downloaded.as_ref().is_none_or(|d| !d.path.is_file()) && expected.is_file() {
                let info = downloaded.unwrap_or_else(|| Downloaded {
                    path: expected.clone(),
                    title: None,
                    uploader: None,
                });
                downloaded = Some(Downloaded {
                    path: expected,
                    ..info
                });
            }
        }

        match downloaded {
            Some(d) if d.path.is_file() => Ok(d),
            _ => Err(DownloadError::MissingOutput(target.as_arg())),
        }
    }
}

/// Parses the line printed after the file was moved into place.
pub fn parse_print_output(stdout: &str) -> Option<Downloaded> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?;
    let mut fields = line.splitn(3, FIELD_SEPARATOR);

    let path = fields.next().map(str::trim).filter(|p| !p.is_empty())?;
    let field = |v: Option<&str>| {
        v.map(str::trim)
            .filter(|v| !v.is_empty() && *v != NA)
            .map(str::to_string)
    };

    Some(Downloaded {
        path: PathBuf::from(path),
        title: field(fields.next()),
        uploader: field(fields.next()),
    })
}

/// Escapes `%` so a literal path survives yt-dlp's output template expansion.
pub fn escape_template(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    let tail = lines[start..].join(" | ");
    if tail.is_empty() {
        "no error output".to_string()
    } else {
        tail
    }
}
