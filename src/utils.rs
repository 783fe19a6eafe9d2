use std::path::{Path, PathBuf};

use crate::types::{Report, ReportTableRow, SongQuery};

/// Replaces path separators so `name` is usable as a single path component.
///
/// Surrounding whitespace is trimmed; an empty result becomes `untitled`.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            '\0' => ' ',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `"{artist} - {title}.mp3"`, or `"{title}.mp3"` when the artist is unknown.
pub fn song_file_name(song: &SongQuery) -> String {
    match &song.artist {
        Some(artist) => format!("{} - {}.mp3", sanitize_name(artist), sanitize_name(&song.title)),
        None => format!("{}.mp3", sanitize_name(&song.title)),
    }
}

pub fn zip_file_name(playlist_name: &str) -> String {
    format!("{}.zip", sanitize_name(playlist_name))
}

/// The path handed to the extractor: the target file without its extension.
pub fn output_stem(target: &Path) -> PathBuf {
    target.with_extension("")
}

pub fn report_table_rows(report: &Report) -> Vec<ReportTableRow> {
    report
        .tracks
        .iter()
        .map(|t| ReportTableRow {
            file: t.file.clone(),
            result: t.outcome.to_string(),
        })
        .collect()
}
