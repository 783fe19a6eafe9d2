use reqwest::{StatusCode, header::CONTENT_TYPE};
use url::Url;

use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::{Cover, SearchResponse},
};

const DEFAULT_COVER_MIME: &str = "image/jpeg";

/// Builds the search expression used to find a song's album.
pub fn search_expression(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) => format!("track:{} artist:{}", title, artist),
        None => title.to_string(),
    }
}

/// Finds the album art URL of the best search hit for `title` and `artist`.
///
/// Returns `Ok(None)` when the search has no hit or the album has no images.
pub async fn album_art_url(
    client: &SpotifyClient,
    title: &str,
    artist: Option<&str>,
) -> Result<Option<String>, SpotifyError> {
    let base = format!("{uri}/search", uri = client.api_url());
    let api_url = Url::parse_with_params(
        &base,
        &[
            ("q", search_expression(title, artist).as_str()),
            ("type", "track"),
            ("limit", "1"),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", base, e)))?;

    let res = client.get::<SearchResponse>(api_url.as_str()).await?;

    Ok(res
        .tracks
        .items
        .first()
        .and_then(|track| track.album.as_ref())
        .and_then(|album| album.images.first())
        .map(|image| image.url.clone()))
}

/// Downloads the image at `url`.
///
/// Image hosts are public, so no token is sent. A non-200 response yields
/// `Ok(None)`; the MIME type comes from `Content-Type` and defaults to JPEG.
pub async fn fetch_cover(client: &SpotifyClient, url: &str) -> Result<Option<Cover>, SpotifyError> {
    let response = client.http().get(url).send().await?;
    if response.status() != StatusCode::OK {
        return Ok(None);
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| v.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_COVER_MIME.to_string());

    let data = response.bytes().await?.to_vec();
    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(Cover { mime_type, data }))
}
