//! Sequential packaging pipeline over the selected platforms.
//!
//! One run walks `Idle → ValidatingBase → per-platform loop → Idle`. Inside
//! the loop each platform goes through marker validation, the metadata-file
//! conflict check, output-path selection and the writer. Runs are synchronous
//! and exclusive: the orchestrator owns the model snapshot and the shared
//! temp directory, so no locking is needed.

use crate::models::{MetadataError, Platform, ProfileModel, ResolvedProfile};
use crate::services::archive::{self, ArchiveError};
use crate::services::integrity::{IntegrityChecker, ValidationResult};
use crate::services::save_paths;
use crate::services::writer::{ProfileWriter, WriteError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Status line shown whenever a run or a platform is abandoned.
pub const ABORTED_STATUS: &str = "Mod packaging aborted!";

/// Front-end collaborator. Prompts block until the user decides; declining is
/// a normal negative answer, not an interrupt.
pub trait PackagerUi {
    /// Show a warning and ask whether to continue.
    fn warn_confirm(&self, message: &str) -> bool;

    /// Ask where to write the packaged archive for `platform`. `None` means
    /// the user backed out.
    fn choose_output_path(
        &self,
        platform: Platform,
        suggested_name: &str,
    ) -> Option<Utf8PathBuf>;

    /// Render terminal status text.
    fn status(&self, message: &str);
}

/// Why a single platform was dropped from an otherwise continuing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Runtime marker missing and the user declined to continue.
    MarkerDeclined,
    /// No output path was chosen.
    NoOutputPath,
}

/// What a finished (non-fatal) run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackagingOutcome {
    /// Platforms whose archives were written, in packaging order.
    pub completed: Vec<Platform>,
    /// Platforms dropped individually; the run continued past them.
    pub skipped: Vec<(Platform, SkipReason)>,
    /// True when a metadata-file conflict was declined and the remaining
    /// platforms were abandoned. Completed outputs stand.
    pub aborted: bool,
}

impl PackagingOutcome {
    /// Every targeted platform was packaged.
    pub fn is_full_success(&self) -> bool {
        !self.aborted && self.skipped.is_empty() && !self.completed.is_empty()
    }
}

/// Fatal run failures. Per-platform skips are data on
/// [`PackagingOutcome`], not errors.
#[derive(Error, Debug)]
pub enum PackagingError {
    #[error(transparent)]
    InvalidMetadata(#[from] MetadataError),

    #[error("base archive is not a valid reference distribution: {0}")]
    BaseArchiveInvalid(ValidationResult),

    #[error("cannot inspect the {platform} mod archive")]
    Inspection {
        platform: Platform,
        #[source]
        source: ArchiveError,
    },

    #[error("failed to write the {platform} profile archive")]
    Write {
        platform: Platform,
        #[source]
        source: WriteError,
    },
}

/// Shared scratch space. Only the orchestrator touches it, and only by
/// deleting; deletion always tolerates absence.
pub fn default_temp_dir() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
        .join("AM2RModPacker")
}

pub struct PackagingOrchestrator<'a> {
    integrity: &'a dyn IntegrityChecker,
    writer: &'a dyn ProfileWriter,
    ui: &'a dyn PackagerUi,
    temp_dir: Utf8PathBuf,
}

impl<'a> PackagingOrchestrator<'a> {
    pub fn new(
        integrity: &'a dyn IntegrityChecker,
        writer: &'a dyn ProfileWriter,
        ui: &'a dyn PackagerUi,
    ) -> Self {
        Self {
            integrity,
            writer,
            ui,
            temp_dir: default_temp_dir(),
        }
    }

    /// Override the shared temp directory (tests).
    pub fn with_temp_dir(mut self, temp_dir: Utf8PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Execute one packaging run over the model's targets.
    ///
    /// Returns `Err` only for fatal conditions (bad metadata, bad base
    /// archive, unreadable mod archive, writer failure); every fatal path has
    /// already cleaned up and reported the aborted status. User-declined
    /// prompts and unchosen output paths land in the returned
    /// [`PackagingOutcome`] instead.
    pub fn run(&self, model: &ProfileModel) -> Result<PackagingOutcome, PackagingError> {
        if let Err(err) = model.metadata.validate() {
            return Err(self.abort(err.into()));
        }

        let base = match model.base_archive_path.as_deref() {
            Some(base) => base,
            None => {
                return Err(self.abort(PackagingError::BaseArchiveInvalid(
                    ValidationResult::NotFound,
                )));
            }
        };

        let verdict = self.integrity.verify_reference(base);
        if verdict != ValidationResult::Valid {
            tracing::warn!("base archive {base} rejected: {verdict}");
            return Err(self.abort(PackagingError::BaseArchiveInvalid(verdict)));
        }

        self.ui
            .status("Packaging mod profile(s)... this can take a while!");

        let mut outcome = PackagingOutcome::default();
        for platform in model.packaging_targets() {
            let Some(mod_archive) = model.archive_for(platform) else {
                // packaging_targets() only yields supplied platforms.
                continue;
            };

            match self.package_platform(model, platform, mod_archive) {
                Ok(PlatformStep::Packaged) => outcome.completed.push(platform),
                Ok(PlatformStep::Skipped(reason)) => {
                    self.ui.status(ABORTED_STATUS);
                    outcome.skipped.push((platform, reason));
                }
                Ok(PlatformStep::AbortRemaining) => {
                    self.ui.status(ABORTED_STATUS);
                    self.cleanup_temp_dir();
                    outcome.aborted = true;
                    break;
                }
                Err(err) => return Err(self.abort(err)),
            }
        }

        if !outcome.aborted {
            if outcome.completed.is_empty() {
                self.ui.status(ABORTED_STATUS);
            } else {
                self.ui.status("Mod package(s) created!");
            }
        }

        Ok(outcome)
    }

    fn package_platform(
        &self,
        model: &ProfileModel,
        platform: Platform,
        mod_archive: &Utf8Path,
    ) -> Result<PlatformStep, PackagingError> {
        let has_marker = archive::has_runtime_marker(mod_archive, platform)
            .map_err(|source| PackagingError::Inspection { platform, source })?;
        if !has_marker {
            // Soft validation: alternate build layouts make false negatives
            // possible, so the user may push through.
            let message = format!(
                "Modded {platform} game not found, make sure it's not placed in any subfolders.\n\
                 The created profile will likely not be installable. Continue anyway?"
            );
            if !self.ui.warn_confirm(&message) {
                tracing::info!("{platform} skipped: runtime marker missing, user declined");
                return Ok(PlatformStep::Skipped(SkipReason::MarkerDeclined));
            }
        }

        let has_conflict = archive::has_profile_metadata(mod_archive)
            .map_err(|source| PackagingError::Inspection { platform, source })?;
        if has_conflict {
            let message = format!(
                "profile.xml found in the {platform} archive. The launcher uses this file for \
                 profile stats and its inclusion may make the profile uninstallable. \
                 Continue anyway?"
            );
            if !self.ui.warn_confirm(&message) {
                tracing::info!("run aborted at {platform}: profile.xml conflict declined");
                return Ok(PlatformStep::AbortRemaining);
            }
        }

        let metadata = &model.metadata;
        let token =
            save_paths::effective_token(metadata.custom_save_enabled, &metadata.save_location_token);
        let save_location = save_paths::resolve_for_platform(token, platform);

        let extension = platform.spec().archive_extension;
        let suggested_name = format!("{}_{platform}.{extension}", metadata.name);
        let Some(chosen) = self.ui.choose_output_path(platform, &suggested_name) else {
            tracing::info!("{platform} skipped: no output path chosen");
            return Ok(PlatformStep::Skipped(SkipReason::NoOutputPath));
        };
        let output = normalize_extension(chosen, extension);

        let profile = ResolvedProfile {
            name: metadata.name.clone(),
            author: metadata.author.clone(),
            version: metadata.version.clone(),
            notes: metadata.notes.clone(),
            uses_custom_music: metadata.uses_custom_music,
            uses_yyc: metadata.uses_yyc,
            supports_android: metadata.supports_android,
            operating_system: platform.to_string(),
            save_location,
            mod_archive_path: mod_archive.to_path_buf(),
            apk_archive_path: model
                .archive_for(Platform::Android)
                .map(Utf8Path::to_path_buf),
        };

        self.writer
            .write(&profile, platform, &output)
            .map_err(|source| PackagingError::Write { platform, source })?;
        self.ui
            .status(&format!("Packaged {platform} profile to {output}"));
        Ok(PlatformStep::Packaged)
    }

    /// Report the aborted status and restore a clean state, then hand the
    /// fatal error back for propagation.
    fn abort(&self, err: PackagingError) -> PackagingError {
        self.ui.status(ABORTED_STATUS);
        self.cleanup_temp_dir();
        err
    }

    /// Delete the shared temp directory if present. Safe to call repeatedly
    /// and when the directory was never created.
    pub fn cleanup_temp_dir(&self) {
        match fs::remove_dir_all(&self.temp_dir) {
            Ok(()) => tracing::debug!("removed temp directory {}", self.temp_dir),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!("could not remove temp directory {}: {err}", self.temp_dir),
        }
    }
}

enum PlatformStep {
    Packaged,
    Skipped(SkipReason),
    AbortRemaining,
}

/// Some file pickers do not append the extension; make sure the packaged
/// archive always carries it.
fn normalize_extension(path: Utf8PathBuf, extension: &str) -> Utf8PathBuf {
    let suffix = format!(".{extension}");
    if path.as_str().to_lowercase().ends_with(&suffix) {
        path
    } else {
        Utf8PathBuf::from(format!("{path}{suffix}"))
    }
}
