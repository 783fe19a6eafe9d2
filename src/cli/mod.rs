//! # CLI Module
//!
//! This module provides the command-line interface layer for Offlinefy. It
//! collects the input and the download directory, hands them to the
//! background worker and renders the worker's status stream as it arrives.
//!
//! ## Commands
//!
//! - [`download`] - Downloads one URL or song name and prints a summary
//! - [`shell`] - Reads inputs line by line, one download after the other
//! - [`show_config`] - Prints the resolved settings and checks `yt-dlp`
//!
//! ## Output
//!
//! Status messages are printed with the crate's `info!`, `success!`,
//! `warning!` and `failure!` macros while a spinner shows the current step.
//! Jobs with more than one song end with a table of per-song results.
//!
//! ## Usage Patterns
//!
//! ```bash
//! offlinefy download https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC
//! offlinefy download https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M --dir ~/Downloads
//! offlinefy download "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
//! offlinefy download "never gonna give you up" --no-cover
//! offlinefy shell
//! ```

mod config;
mod download;
mod shell;

pub use config::show as show_config;
pub use download::context;
pub use download::download;
pub use download::print_report;
pub use download::print_status;
pub use download::run_job;
pub use shell::ShellCommand;
pub use shell::shell;
