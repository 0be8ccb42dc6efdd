//! Read-only structural inspection of mod archives.
//!
//! Archives are never mutated here; every question is answered by listing
//! entry names from the central directory. Reads are repeatable, so callers
//! may open the same file several times without coordination.

use crate::models::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::BufReader;
use thiserror::Error;
use zip::ZipArchive;

/// Entry name the launcher reserves for its own per-profile metadata.
/// Archives that already ship a file by this name collide with the metadata
/// the writer emits and can yield installable-but-corrupt profiles.
pub const PROFILE_METADATA_NAME: &str = "profile.xml";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("failed to read archive {path}")]
    Unreadable {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive {path} is not a valid zip")]
    Corrupt {
        path: Utf8PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Open an archive read-only for inspection.
pub fn open(path: &Utf8Path) -> Result<ZipArchive<BufReader<File>>, ArchiveError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArchiveError::NotFound(path.to_path_buf())
        } else {
            ArchiveError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Case-sensitive exact match of `exact_path` against full entry paths.
pub fn contains_entry(archive: &Utf8Path, exact_path: &str) -> Result<bool, ArchiveError> {
    let zip = open(archive)?;
    Ok(zip.file_names().any(|name| name == exact_path))
}

/// Whether the archive carries a runtime entry point for `platform`.
///
/// Any marker in the platform table satisfies the check. Platforms without
/// markers (Android) pass unconditionally; their validation is owned by the
/// target package format.
pub fn has_runtime_marker(archive: &Utf8Path, platform: Platform) -> Result<bool, ArchiveError> {
    let markers = platform.spec().runtime_markers;
    if markers.is_empty() {
        return Ok(true);
    }

    let zip = open(archive)?;
    let found = zip
        .file_names()
        .any(|name| markers.contains(&name));
    if !found {
        tracing::debug!("no {platform} runtime marker in {archive}");
    }
    Ok(found)
}

/// Whether any entry's file name is `profile.xml`, in any directory.
///
/// Presence is not an error; the orchestrator surfaces it as a
/// warn-and-confirm because the collision can corrupt the installed profile.
pub fn has_profile_metadata(archive: &Utf8Path) -> Result<bool, ArchiveError> {
    let zip = open(archive)?;
    Ok(zip.file_names().any(|name| {
        name.trim_end_matches('/')
            .rsplit('/')
            .next()
            .is_some_and(|file_name| file_name == PROFILE_METADATA_NAME)
    }))
}
