//! Offlinefy Library
//!
//! This library turns a Spotify track or playlist URL, a YouTube URL or a
//! free-text song name into MP3 files with embedded ID3 metadata. Metadata
//! comes from the Spotify Web API, audio is extracted by `yt-dlp`, tags are
//! written with the `id3` crate and playlists are bundled into zip archives.
//!
//! # Modules
//!
//! - `bundle` - Zip archives for downloaded playlists
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management, credentials and environment variables
//! - `downloader` - `yt-dlp` integration behind the `Downloader` trait
//! - `input` - Classification of user input
//! - `management` - Token caching
//! - `spotify` - Spotify Web API client implementation
//! - `tags` - ID3 tag writing and reading
//! - `types` - Data structures and type definitions
//! - `utils` - File naming helpers
//! - `worker` - The background download workflow
//!
//! # Example
//!
//! ```
//! use offlinefy::{config, worker};
//!
//! #[tokio::main]
//! async fn main() -> offlinefy::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     // Build a worker::Job and spawn it...
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod input;
pub mod management;
pub mod spotify;
pub mod tags;
pub mod types;
pub mod utils;
pub mod worker;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Example
///
/// ```
/// use offlinefy::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting download for: {}", input);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist download and zip completed successfully: {}", zip_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Used for unrecoverable errors at the command-line surface only, such as
/// missing credentials. The download workflow never calls it; failures there
/// are reported as status messages instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("{} already exists. Skipping...", file_name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a failure message with a red cross without exiting.
///
/// Used for errors reported by a download job, after which the program
/// continues (for example with the next input in the interactive shell).
///
/// # Example
///
/// ```
/// failure!("Error: {}", reason);
/// ```
#[macro_export]
macro_rules! failure {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "x".red().bold(), std::format_args!($($arg)*));
  })
}
