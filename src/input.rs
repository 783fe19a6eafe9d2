//! Classification of user input.
//!
//! A single line typed by the user is either a Spotify track, a Spotify
//! playlist, a YouTube URL or free text that is searched for.

use std::fmt;

use url::Url;

const SPOTIFY_HOST: &str = "open.spotify.com";

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SpotifyTrack(String),
    SpotifyPlaylist(String),
    YouTube(String),
    Search(String),
}

impl Request {
    /// Classifies `input`.
    ///
    /// Accepts `https://open.spotify.com/{track,playlist}/<id>` (optionally with
    /// a locale segment such as `/intl-de/` and a query string),
    /// `spotify:{track,playlist}:<id>` URIs and YouTube URLs. Links to these
    /// hosts may be pasted without `https://`. Everything else, including
    /// unrecognised URLs, is treated as a search.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if let Some(request) = parse_spotify_uri(input) {
            return request;
        }

        let normalized = with_scheme(input);
        if let Ok(url) = Url::parse(&normalized) {
            match url.host_str() {
                Some(SPOTIFY_HOST) => {
                    if let Some(request) = parse_spotify_url(&url) {
                        return request;
                    }
                }
                Some(host) if YOUTUBE_HOSTS.contains(&host) => {
                    return Request::YouTube(normalized);
                }
                _ => {}
            }
        }

        Request::Search(input.to_string())
    }

    pub fn is_playlist(&self) -> bool {
        matches!(self, Request::SpotifyPlaylist(_))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::SpotifyTrack(id) => write!(f, "Spotify track {}", id),
            Request::SpotifyPlaylist(id) => write!(f, "Spotify playlist {}", id),
            Request::YouTube(url) => write!(f, "YouTube video {}", url),
            Request::Search(text) => write!(f, "search \"{}\"", text),
        }
    }
}

/// Prepends `https://` to a known host pasted without a scheme.
fn with_scheme(input: &str) -> String {
    let known_host = std::iter::once(SPOTIFY_HOST)
        .chain(YOUTUBE_HOSTS.iter().copied())
        .any(|host| {
            input
                .strip_prefix(host)
                .is_some_and(|rest| rest.starts_with('/'))
        });

    if known_host {
        format!("https://{}", input)
    } else {
        input.to_string()
    }
}

fn parse_spotify_url(url: &Url) -> Option<Request> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    // skip locale prefixes like "intl-de"
    let segments = match segments.first() {
        Some(first) if first.starts_with("intl-") => &segments[1..],
        _ => &segments[..],
    };

    match segments {
        [kind, id, ..] => spotify_request(kind, id),
        _ => None,
    }
}

fn parse_spotify_uri(input: &str) -> Option<Request> {
    let rest = input.strip_prefix("spotify:")?;
    let (kind, id) = rest.split_once(':')?;
    spotify_request(kind, id)
}

fn spotify_request(kind: &str, id: &str) -> Option<Request> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    match kind {
        "track" => Some(Request::SpotifyTrack(id.to_string())),
        "playlist" => Some(Request::SpotifyPlaylist(id.to_string())),
        _ => None,
    }
}
