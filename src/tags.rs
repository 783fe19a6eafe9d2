//! Write and read back the ID3 frames Offlinefy cares about.

use std::path::Path;

use id3::frame::{Content, Picture, PictureType};
use id3::{Tag, TagLike, Version};
use thiserror::Error;

use crate::types::TrackMetadata;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("cannot write tags to {path}: {source}")]
    Write { path: String, source: id3::Error },

    #[error("cannot read tags from {path}: {source}")]
    Read { path: String, source: id3::Error },
}

/// Tag contents as read from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_mime: Option<String>,
}

/// Helper: set a text frame, or remove it for `None`/blank values.
fn set_text_opt(tag: &mut Tag, id: &str, v: Option<&str>) {
    match v.map(str::trim) {
        Some(s) if !s.is_empty() => tag.set_text(id, s.to_string()),
        _ => {
            let _ = tag.remove(id);
        }
    }
}

/// Writes title, artist, album and front cover into `path` as ID3v2.4.
///
/// An existing tag is updated in place; a file without a tag gets a new one.
/// Any previous `APIC` frame is replaced when a cover is given and kept
/// otherwise.
pub fn write_metadata(path: &Path, metadata: &TrackMetadata) -> Result<(), TagError> {
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    set_text_opt(&mut tag, "TIT2", Some(&metadata.title)); // title
    set_text_opt(&mut tag, "TPE1", metadata.artist.as_deref()); // artist
    if metadata.album.is_some() {
        set_text_opt(&mut tag, "TALB", metadata.album.as_deref()); // album
    }

    if let Some(cover) = &metadata.cover {
        let _ = tag.remove("APIC");
        tag.add_frame(Picture {
            mime_type: cover.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data: cover.data.clone(),
        });
    }

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|source| TagError::Write {
            path: path.display().to_string(),
            source,
        })
}

/// Reads back the frames written by [`write_metadata`].
pub fn read_metadata(path: &Path) -> Result<TagSummary, TagError> {
    let tag = Tag::read_from_path(path).map_err(|source| TagError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let cover_mime = tag.frames().find_map(|f| match f.content() {
        Content::Picture(p) if p.picture_type == PictureType::CoverFront => {
            Some(p.mime_type.clone())
        }
        _ => None,
    });

    Ok(TagSummary {
        title: tag.title().map(str::to_string),
        artist: tag.artist().map(str::to_string),
        album: tag.album().map(str::to_string),
        cover_mime,
    })
}
