use crate::{
    spotify::{SpotifyClient, SpotifyError, track::song_from_track},
    types::{Page, Playlist, PlaylistItem, SongQuery},
};

/// Fields requested for a playlist; keeps responses small for long playlists.
const PLAYLIST_FIELDS: &str = "id,name,tracks(next,total,items(track(id,name,artists(id,name),album(id,name,images))))";
const PAGE_FIELDS: &str = "next,total,items(track(id,name,artists(id,name),album(id,name,images)))";

/// Fetches a playlist and every page of its tracks.
///
/// `GET /playlists/{id}` returns the first page of tracks; the remaining pages
/// are read by following each page's `next` link until it is empty.
pub async fn get_playlist_songs(
    client: &SpotifyClient,
    id: &str,
) -> Result<(String, Vec<SongQuery>), SpotifyError> {
    let api_url = format!(
        "{uri}/playlists/{id}?fields={fields}",
        uri = client.api_url(),
        id = id,
        fields = PLAYLIST_FIELDS
    );
    let playlist = client.get::<Playlist>(&api_url).await?;

    let mut songs = songs_from_items(&playlist.tracks.items);
    let mut next = playlist.tracks.next.clone();

    while let Some(next_url) = next {
        let page_url = with_fields(&next_url, PAGE_FIELDS);
        let page = client.get::<Page<PlaylistItem>>(&page_url).await?;
        songs.extend(songs_from_items(&page.items));
        next = page.next;
    }

    Ok((playlist.name, songs))
}

/// Converts playlist entries to queries, skipping removed or local entries
/// that come back with a `null` track.
pub fn songs_from_items(items: &[PlaylistItem]) -> Vec<SongQuery> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter(|track| !track.name.trim().is_empty())
        .map(song_from_track)
        .collect()
}

fn with_fields(url: &str, fields: &str) -> String {
    if url.contains("fields=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&fields={}", url, fields)
    } else {
        format!("{}?fields={}", url, fields)
    }
}
