use offlinefy::input::Request;

#[test]
fn test_spotify_track_url() {
    let request = Request::parse("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(request, Request::SpotifyTrack("4uLU6hMCjMI75M1A2tKUQC".to_string()));
}

#[test]
fn test_spotify_track_url_with_query_string() {
    let request =
        Request::parse("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123&utm=x");
    assert_eq!(request, Request::SpotifyTrack("4uLU6hMCjMI75M1A2tKUQC".to_string()));
}

#[test]
fn test_spotify_playlist_url() {
    let request = Request::parse("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=1");
    assert_eq!(
        request,
        Request::SpotifyPlaylist("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );
    assert!(request.is_playlist());
}

#[test]
fn test_spotify_url_with_locale_segment() {
    let request = Request::parse("https://open.spotify.com/intl-de/track/4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(request, Request::SpotifyTrack("4uLU6hMCjMI75M1A2tKUQC".to_string()));
}

#[test]
fn test_spotify_uri() {
    assert_eq!(
        Request::parse("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
        Request::SpotifyTrack("4uLU6hMCjMI75M1A2tKUQC".to_string())
    );
    assert_eq!(
        Request::parse("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M"),
        Request::SpotifyPlaylist("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );
}

#[test]
fn test_other_spotify_urls_are_searched() {
    // albums and artists are not downloadable inputs
    let input = "https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3";
    assert_eq!(Request::parse(input), Request::Search(input.to_string()));

    let input = "spotify:artist:1dfeR4HaWDbWqFHLkxsg1d";
    assert_eq!(Request::parse(input), Request::Search(input.to_string()));
}

#[test]
fn test_youtube_urls() {
    for url in [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtube.com/watch?v=dQw4w9WgXcQ",
        "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
    ] {
        assert_eq!(Request::parse(url), Request::YouTube(url.to_string()), "{}", url);
    }
}

#[test]
fn test_free_text_is_searched() {
    assert_eq!(
        Request::parse("  bohemian rhapsody queen  "),
        Request::Search("bohemian rhapsody queen".to_string())
    );
    assert_eq!(
        Request::parse("Queen: Bohemian Rhapsody"),
        Request::Search("Queen: Bohemian Rhapsody".to_string())
    );
}

#[test]
fn test_unknown_urls_are_searched() {
    let input = "https://soundcloud.com/some/track";
    assert_eq!(Request::parse(input), Request::Search(input.to_string()));
}

#[test]
fn test_links_without_scheme() {
    assert_eq!(
        Request::parse("open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"),
        Request::SpotifyTrack("4uLU6hMCjMI75M1A2tKUQC".to_string())
    );
    assert_eq!(
        Request::parse("open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=x"),
        Request::SpotifyPlaylist("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );
    assert_eq!(
        Request::parse("www.youtube.com/watch?v=dQw4w9WgXcQ"),
        Request::YouTube("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string())
    );
    assert_eq!(
        Request::parse("youtu.be/dQw4w9WgXcQ"),
        Request::YouTube("https://youtu.be/dQw4w9WgXcQ".to_string())
    );
}

#[test]
fn test_host_prefix_without_slash_is_searched() {
    // only a host followed by a path counts as a link
    assert_eq!(
        Request::parse("youtu.berlin mix"),
        Request::Search("youtu.berlin mix".to_string())
    );
    assert_eq!(
        Request::parse("open.spotify.com"),
        Request::Search("open.spotify.com".to_string())
    );
}
