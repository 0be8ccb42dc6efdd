//! Reference-distribution verification.
//!
//! Packaging is only legal against an unmodified base distribution, so the
//! orchestrator validates the base archive exactly once per run and halts on
//! anything other than [`ValidationResult::Valid`]. The check itself is a
//! collaborator behind [`IntegrityChecker`]; the shipped implementation
//! compares archive contents against the MD5 manifest from
//! `ModPacker Main.yaml`.

use crate::services::archive::{self, ArchiveError};
use camino::Utf8Path;
use indexmap::IndexMap;
use std::fmt;
use std::io::Read;

/// Outcome of the reference-distribution check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    /// The archive is a pristine reference distribution.
    Valid,
    /// Readable zip, but its contents do not match the reference manifest.
    WrongContents,
    /// The file exists but cannot be read as a zip archive.
    Corrupt,
    /// No file at the given path.
    NotFound,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationResult::Valid => "Valid",
            ValidationResult::WrongContents => "WrongContents",
            ValidationResult::Corrupt => "Corrupt",
            ValidationResult::NotFound => "NotFound",
        };
        f.write_str(text)
    }
}

/// Collaborator answering "is this the unmodified base game archive?".
pub trait IntegrityChecker {
    fn verify_reference(&self, archive: &Utf8Path) -> ValidationResult;
}

/// Manifest-driven checker: every manifest entry must exist in the archive
/// and hash to its recorded MD5 sum.
pub struct ManifestIntegrityChecker {
    manifest: IndexMap<String, String>,
}

impl ManifestIntegrityChecker {
    pub fn new(manifest: IndexMap<String, String>) -> Self {
        Self { manifest }
    }

    fn check(&self, path: &Utf8Path) -> Result<ValidationResult, ArchiveError> {
        let mut zip = archive::open(path)?;

        for (entry, expected_md5) in &self.manifest {
            let mut file = match zip.by_name(entry) {
                Ok(file) => file,
                Err(zip::result::ZipError::FileNotFound) => {
                    tracing::info!("base archive {path} is missing {entry}");
                    return Ok(ValidationResult::WrongContents);
                }
                Err(source) => {
                    return Err(ArchiveError::Corrupt {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|source| ArchiveError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

            let actual = format!("{:x}", md5::compute(&contents));
            if !actual.eq_ignore_ascii_case(expected_md5) {
                tracing::info!("base archive {path}: {entry} hashes to {actual}, expected {expected_md5}");
                return Ok(ValidationResult::WrongContents);
            }
        }

        Ok(ValidationResult::Valid)
    }
}

impl IntegrityChecker for ManifestIntegrityChecker {
    fn verify_reference(&self, path: &Utf8Path) -> ValidationResult {
        match self.check(path) {
            Ok(result) => result,
            Err(ArchiveError::NotFound(_)) => ValidationResult::NotFound,
            Err(err) => {
                tracing::warn!("base archive {path} unreadable: {err}");
                ValidationResult::Corrupt
            }
        }
    }
}
