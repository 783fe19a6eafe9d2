use std::{fmt, path::PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Seconds before the real expiry at which a token is considered stale.
    pub const EXPIRY_MARGIN: u64 = 240;

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + Self::EXPIRY_MARGIN >= self.obtained_at + self.expires_in
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Page<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Page<Track>,
}

/// One song to download, resolved from a track, a playlist entry or free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
}

impl SongQuery {
    /// A query built from free text, with no known artist.
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
            cover_url: None,
        }
    }

    /// The search string handed to the extractor.
    pub fn search_terms(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} {}", self.title, artist),
            None => self.title.clone(),
        }
    }
}

/// Result of resolving a classified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Single(SongQuery),
    Playlist { name: String, songs: Vec<SongQuery> },
}

/// Cover art ready to be embedded.
#[derive(Debug, Clone)]
pub struct Cover {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Frames written into a downloaded file.
#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover: Option<Cover>,
}

/// One status update streamed from the worker to the interactive surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Info(m) | Status::Success(m) | Status::Warning(m) => write!(f, "{}", m),
            Status::Error(m) => write!(f, "Error: {}", m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    Skipped,
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Downloaded => write!(f, "downloaded"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackReport {
    pub file: String,
    pub path: Option<PathBuf>,
    pub outcome: Outcome,
}

/// Everything a finished job did, in order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub tracks: Vec<TrackReport>,
    /// Archive written for a playlist job.
    pub archive: Option<PathBuf>,
}

impl Report {
    pub fn push(&mut self, file: impl Into<String>, path: Option<PathBuf>, outcome: Outcome) {
        self.tracks.push(TrackReport {
            file: file.into(),
            path,
            outcome,
        });
    }

    pub fn count(&self, outcome: fn(&Outcome) -> bool) -> usize {
        self.tracks.iter().filter(|t| outcome(&t.outcome)).count()
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Downloaded))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }
}

#[derive(Tabled)]
pub struct ReportTableRow {
    pub file: String,
    pub result: String,
}
