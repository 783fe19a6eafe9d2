//! Playlist bundles: one zip archive per downloaded playlist.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> BundleError + '_ {
    move |source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Every `*.mp3` directly inside `dir`, sorted by file name.
pub fn collect_tracks(dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        let is_mp3 = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
        if path.is_file() && is_mp3 {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Archives the MP3 files in `dir` into `zip_path`, then deletes them and `dir`.
///
/// Entries are stored without recompression under their bare file names.
/// The archive is written to a temporary name first and renamed when
/// complete, so an interrupted run never leaves a truncated `zip_path` that
/// would make the next run skip the playlist. Returns the number of files
/// archived.
pub fn create_zip(dir: &Path, zip_path: &Path) -> Result<usize, BundleError> {
    let files = collect_tracks(dir)?;
    let partial = zip_path.with_extension("zip.part");

    let file = File::create(&partial).map_err(io_err(&partial))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let zip_err = |source| BundleError::Zip {
        path: zip_path.to_path_buf(),
        source,
    };

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        zip.start_file(name, options).map_err(zip_err)?;
        let mut src = File::open(path).map_err(io_err(path))?;
        io::copy(&mut src, &mut zip).map_err(io_err(path))?;
    }
    zip.finish().map_err(zip_err)?;

    fs::rename(&partial, zip_path).map_err(io_err(zip_path))?;

    for path in &files {
        fs::remove_file(path).map_err(io_err(path))?;
    }
    fs::remove_dir_all(dir).map_err(io_err(dir))?;

    Ok(files.len())
}
