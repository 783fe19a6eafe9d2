//! # Spotify Integration Module
//!
//! Metadata lookups against the Spotify Web API. Offlinefy never touches user
//! data, so it authenticates with the client-credentials grant and only reads
//! public catalogue endpoints:
//!
//! - `GET /tracks/{id}` - title, artists and album of a single track
//! - `GET /playlists/{id}` - playlist name and its first page of tracks,
//!   further pages are read by following the `next` link
//! - `GET /search?type=track&limit=1` - album art lookup by title and artist
//! - `POST /api/token` - client-credentials token
//!
//! ## Error Handling
//!
//! Every request goes through [`SpotifyClient::get`], which:
//! - waits out `429 Too Many Requests` when `Retry-After` is at most 120 seconds
//! - retries `502 Bad Gateway` after [`BAD_GATEWAY_DELAY`]
//! - drops the cached token and retries once on `401 Unauthorized`
//! - gives up after [`MAX_ATTEMPTS`] attempts
//!
//! The download worker only sees the [`MetadataSource`] trait, implemented
//! here by [`SpotifyClient`].

pub mod auth;
pub mod playlist;
pub mod search;
pub mod track;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Settings,
    management::TokenManager,
    types::{Cover, SongQuery},
};

pub const MAX_ATTEMPTS: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
/// Wait before retrying a `502 Bad Gateway`.
pub const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("gave up after {0} attempts")]
    Exhausted(u32),
}

/// Source of song metadata used by the download worker.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Resolves a track id to a single song.
    async fn track(&self, id: &str) -> Result<SongQuery, SpotifyError>;

    /// Resolves a playlist id to its name and every song it contains.
    async fn playlist(&self, id: &str) -> Result<(String, Vec<SongQuery>), SpotifyError>;

    /// Looks up and downloads cover art for `song`, if any exists.
    async fn cover_art(&self, song: &SongQuery) -> Result<Option<Cover>, SpotifyError>;
}

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    bad_gateway_delay: Duration,
}

impl SpotifyClient {
    pub fn new(settings: &Settings) -> Self {
        Self::with_token_manager(
            settings,
            TokenManager::new(settings.credentials.clone(), settings.token_url.clone()),
        )
    }

    pub fn with_token_manager(settings: &Settings, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: settings.api_url.clone(),
            tokens: Mutex::new(tokens),
            bad_gateway_delay: BAD_GATEWAY_DELAY,
        }
    }

    /// Overrides the wait before a `502 Bad Gateway` is retried.
    pub fn with_bad_gateway_delay(mut self, delay: Duration) -> Self {
        self.bad_gateway_delay = delay;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Authenticated GET of `url`, deserialized as `T`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, SpotifyError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > MAX_ATTEMPTS {
                return Err(SpotifyError::Exhausted(MAX_ATTEMPTS));
            }

            let token = self.tokens.lock().await.get_valid_token(&self.http).await?;
            let response = self.http.get(url).bearer_auth(token).send().await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(&response);
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        return Err(SpotifyError::RateLimited(retry_after));
                    }
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                StatusCode::BAD_GATEWAY => {
                    sleep(self.bad_gateway_delay).await;
                    continue;
                }
                StatusCode::UNAUTHORIZED if attempt == 1 => {
                    self.tokens.lock().await.invalidate();
                    continue;
                }
                StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                    return Err(SpotifyError::NotFound(url.to_string()));
                }
                _ => {}
            }

            let response = response.error_for_status()?;
            return Ok(response.json::<T>().await?);
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl MetadataSource for SpotifyClient {
    async fn track(&self, id: &str) -> Result<SongQuery, SpotifyError> {
        let track = track::get_track(self, id).await?;
        Ok(track::song_from_track(&track))
    }

    async fn playlist(&self, id: &str) -> Result<(String, Vec<SongQuery>), SpotifyError> {
        playlist::get_playlist_songs(self, id).await
    }

    async fn cover_art(&self, song: &SongQuery) -> Result<Option<Cover>, SpotifyError> {
        let url = match &song.cover_url {
            Some(url) => Some(url.clone()),
            None => search::album_art_url(self, &song.title, song.artist.as_deref()).await?,
        };

        match url {
            Some(url) => search::fetch_cover(self, &url).await,
            None => Ok(None),
        }
    }
}
