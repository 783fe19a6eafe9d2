use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::{SongQuery, Track},
};

/// Fetches a single track from `GET /tracks/{id}`.
pub async fn get_track(client: &SpotifyClient, id: &str) -> Result<Track, SpotifyError> {
    let api_url = format!("{uri}/tracks/{id}", uri = client.api_url(), id = id);
    client.get::<Track>(&api_url).await
}

/// Turns a track into a download query.
///
/// Only the first credited artist is used, matching how the file is named.
/// The cover is the first album image, which Spotify lists widest first.
pub fn song_from_track(track: &Track) -> SongQuery {
    let album = track.album.as_ref();

    SongQuery {
        title: track.name.clone(),
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty()),
        album: album.map(|a| a.name.clone()).filter(|n| !n.is_empty()),
        cover_url: album.and_then(|a| a.images.first()).map(|i| i.url.clone()),
    }
}
