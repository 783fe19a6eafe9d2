//! Configuration management for Offlinefy.
//!
//! This module is the single place where configuration is read. It loads
//! `.env` files, resolves Spotify client credentials (either in plain text or
//! as a Fernet-encrypted pair) and builds the [`Settings`] value that is
//! passed explicitly to the Spotify client and the download worker.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf};

use fernet::Fernet;
use thiserror::Error;

/// Directory name used below the platform data directory.
pub const APP_NAME: &str = "offlinefy";

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_YTDLP: &str = "yt-dlp";
/// MP3 bitrate in kbps handed to the extractor.
pub const DEFAULT_AUDIO_QUALITY: u32 = 192;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Spotify credentials missing: set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET, or KEY and ENCRYPTED_KEY"
    )]
    MissingCredentials,

    #[error("KEY is not a valid Fernet key")]
    InvalidKey,

    #[error("ENCRYPTED_KEY cannot be decrypted with KEY")]
    Decrypt,

    #[error("decrypted credentials must have the form <client id>:<client secret>")]
    MalformedCredentials,

    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("cannot determine the home directory")]
    NoHomeDir,

    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Loads environment variables from `.env` files.
///
/// The `.env` in the current working directory (parent directories are not
/// searched) is read first, then the one in the platform-specific local data
/// directory:
/// - Linux: `~/.local/share/offlinefy/.env`
/// - macOS: `~/Library/Application Support/offlinefy/.env`
/// - Windows: `%LOCALAPPDATA%/offlinefy/.env`
///
/// Variables that are already set are never overridden, so the process
/// environment wins over both files and the working directory wins over the
/// data directory. Missing files are not an error.
///
/// # Errors
///
/// This function will return an error if:
/// - The current working directory cannot be determined
/// - The data directory cannot be created
/// - An existing `.env` file cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let cwd_env = env::current_dir()
        .map_err(|e| e.to_string())?
        .join(".env");
    if cwd_env.is_file() {
        dotenv::from_path(&cwd_env).map_err(|e| e.to_string())?;
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application directory below the platform data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

/// Returns `~/Music`, the default download directory.
pub fn default_download_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join("Music"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Creates `path` and all of its parents if they do not exist yet.
pub async fn ensure_dir(path: &std::path::Path) -> Result<(), ConfigError> {
    async_fs::create_dir_all(path)
        .await
        .map_err(|source| ConfigError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

/// Spotify client credentials for the client-credentials flow.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolves credentials from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are used when both are
    /// set. Otherwise `ENCRYPTED_KEY` is decrypted with the Fernet key in
    /// `KEY`; its plaintext is `<client id>:<client secret>`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|name| env::var(name).ok())
    }

    /// Same as [`Credentials::from_env`] with an arbitrary variable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let id = non_empty(lookup("SPOTIFY_CLIENT_ID"));
        let secret = non_empty(lookup("SPOTIFY_CLIENT_SECRET"));
        if let (Some(client_id), Some(client_secret)) = (id, secret) {
            return Ok(Self {
                client_id,
                client_secret,
            });
        }

        match (non_empty(lookup("KEY")), non_empty(lookup("ENCRYPTED_KEY"))) {
            (Some(key), Some(token)) => Self::decrypt(&key, &token),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    /// Decrypts a Fernet `token` with `key` into a credential pair.
    pub fn decrypt(key: &str, token: &str) -> Result<Self, ConfigError> {
        let cipher = Fernet::new(key.trim()).ok_or(ConfigError::InvalidKey)?;
        let plain = cipher
            .decrypt(token.trim())
            .map_err(|_| ConfigError::Decrypt)?;
        let plain = String::from_utf8(plain).map_err(|_| ConfigError::MalformedCredentials)?;

        let (client_id, client_secret) = plain
            .trim()
            .split_once(':')
            .ok_or(ConfigError::MalformedCredentials)?;
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ConfigError::MalformedCredentials);
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

/// Everything the Spotify client and the download worker need to run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    /// Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// Spotify token endpoint used for the client-credentials grant.
    pub token_url: String,
    pub download_dir: PathBuf,
    /// `yt-dlp` executable name or path.
    pub ytdlp: String,
    pub audio_quality: u32,
}

impl Settings {
    /// Builds settings from the process environment.
    ///
    /// | Variable                  | Default                                  |
    /// |---------------------------|------------------------------------------|
    /// | `SPOTIFY_API_URL`         | `https://api.spotify.com/v1`             |
    /// | `SPOTIFY_API_TOKEN_URL`   | `https://accounts.spotify.com/api/token` |
    /// | `OFFLINEFY_DOWNLOAD_DIR`  | `~/Music`                                |
    /// | `OFFLINEFY_YTDLP`         | `yt-dlp`                                 |
    /// | `OFFLINEFY_AUDIO_QUALITY` | `192`                                    |
    ///
    /// The download directory is not created here, see [`ensure_dir`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|name| env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] with an arbitrary variable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let credentials = Credentials::resolve(&lookup)?;

        let download_dir = match non_empty(lookup("OFFLINEFY_DOWNLOAD_DIR")) {
            Some(dir) => PathBuf::from(dir),
            None => default_download_dir()?,
        };

        let audio_quality = match non_empty(lookup("OFFLINEFY_AUDIO_QUALITY")) {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "OFFLINEFY_AUDIO_QUALITY",
                    value,
                })?,
            None => DEFAULT_AUDIO_QUALITY,
        };

        Ok(Self {
            credentials,
            api_url: non_empty(lookup("SPOTIFY_API_URL"))
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: non_empty(lookup("SPOTIFY_API_TOKEN_URL"))
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            download_dir,
            ytdlp: non_empty(lookup("OFFLINEFY_YTDLP")).unwrap_or_else(|| DEFAULT_YTDLP.to_string()),
            audio_quality,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
