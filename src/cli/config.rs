use tokio::process::Command;

use crate::{config, config::Settings, info, success, warning};

/// Prints the resolved settings and checks that the extractor can be run.
pub async fn show(settings: &Settings) {
    info!("Spotify API: {}", settings.api_url);
    info!("Spotify token endpoint: {}", settings.token_url);
    info!("Spotify client id: {}", settings.credentials.client_id);
    info!("Spotify client secret: <redacted>");
    info!("Download directory: {}", settings.download_dir.display());
    info!("Audio quality: {} kbps", settings.audio_quality);
    info!("Configuration file: {}", config::data_dir().join(".env").display());

    match Command::new(&settings.ytdlp).arg("--version").output().await {
        Ok(output) if output.status.success() => success!(
            "{} {}",
            settings.ytdlp,
            String::from_utf8_lossy(&output.stdout).trim()
        ),
        Ok(output) => warning!(
            "{} exited with {}: {}",
            settings.ytdlp,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => warning!(
            "{} not found ({}). Install yt-dlp and ffmpeg or set OFFLINEFY_YTDLP.",
            settings.ytdlp,
            e
        ),
    }
}
