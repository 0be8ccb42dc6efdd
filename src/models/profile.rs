use crate::models::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// Characters that may not appear in a mod name. The name becomes part of the
/// suggested output file name, and profiles are cross-platform artifacts, so
/// the Windows superset applies on every host.
pub const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Errors from pre-flight metadata validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("mod {0} field is empty")]
    EmptyField(&'static str),

    #[error("mod name contains reserved character {0:?}")]
    ReservedNameCharacter(char),
}

/// User-entered metadata embedded into every packaged profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileMetadata {
    pub name: String,
    pub author: String,
    pub version: String,
    pub notes: String,
    pub uses_custom_music: bool,
    pub uses_yyc: bool,
    pub supports_android: bool,
    /// Whether the user opted into a custom save directory at all.
    pub custom_save_enabled: bool,
    /// Portable `%localappdata%/...` token, empty until a directory has been
    /// chosen and translated.
    pub save_location_token: String,
}

impl ProfileMetadata {
    /// Pre-flight check run once per packaging trigger: mandatory fields
    /// present and the name usable as a file-name fragment.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.name.trim().is_empty() {
            return Err(MetadataError::EmptyField("name"));
        }
        if self.author.trim().is_empty() {
            return Err(MetadataError::EmptyField("author"));
        }
        if self.version.trim().is_empty() {
            return Err(MetadataError::EmptyField("version"));
        }
        if let Some(c) = self
            .name
            .chars()
            .find(|c| c.is_control() || RESERVED_NAME_CHARS.contains(c))
        {
            return Err(MetadataError::ReservedNameCharacter(c));
        }
        Ok(())
    }
}

/// In-memory record of one packaging session.
///
/// Created empty at session start, mutated incrementally through
/// [`StateManager`](crate::state::StateManager) setters as the front-end
/// reports user selections, and consumed read-only by the
/// [`PackagingOrchestrator`](crate::services::packaging::PackagingOrchestrator).
/// Discarded at session end; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileModel {
    /// Reference distribution archive. Must be set before any packaging.
    pub base_archive_path: Option<Utf8PathBuf>,

    /// Modded archive supplied per platform. Absent key = not supplied.
    pub archive_paths: IndexMap<Platform, Utf8PathBuf>,

    /// Platforms the user intends to package. Independent of whether the
    /// archive path has been supplied yet.
    pub selected: IndexSet<Platform>,

    pub metadata: ProfileMetadata,
}

impl ProfileModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_for(&self, platform: Platform) -> Option<&Utf8Path> {
        self.archive_paths.get(&platform).map(Utf8PathBuf::as_path)
    }

    pub fn is_supplied(&self, platform: Platform) -> bool {
        self.archive_paths.contains_key(&platform)
    }

    pub fn is_selected(&self, platform: Platform) -> bool {
        self.selected.contains(&platform)
    }

    /// Readiness gate for the "create" action. Pure, no side effects; the
    /// state layer re-evaluates it after every mutation.
    ///
    /// All four conditions must hold:
    /// - the base archive is supplied;
    /// - every selected platform has its archive supplied;
    /// - at least one desktop platform has an archive (Android alone is not a
    ///   standalone profile);
    /// - custom saves are disabled, or a non-empty token is present.
    pub fn can_create(&self) -> bool {
        self.base_archive_path.is_some()
            && self
                .selected
                .iter()
                .all(|&p| self.is_supplied(p))
            && Platform::DESKTOP.iter().any(|&p| self.is_supplied(p))
            && (!self.metadata.custom_save_enabled
                || !self.metadata.save_location_token.is_empty())
    }

    /// Desktop platforms that will actually be packaged, in the fixed
    /// packaging order.
    pub fn packaging_targets(&self) -> Vec<Platform> {
        Platform::DESKTOP
            .into_iter()
            .filter(|&p| self.is_selected(p) && self.is_supplied(p))
            .collect()
    }
}

/// Fully resolved writer input for a single target platform: the model
/// snapshot with the save location expanded for that platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub author: String,
    pub version: String,
    pub notes: String,
    pub uses_custom_music: bool,
    pub uses_yyc: bool,
    pub supports_android: bool,
    /// Platform display name as embedded into `profile.xml`.
    pub operating_system: String,
    /// Save location after per-platform expansion; see
    /// [`resolve_for_platform`](crate::services::save_paths::resolve_for_platform).
    pub save_location: String,
    /// The modded build archive for the target platform.
    pub mod_archive_path: Utf8PathBuf,
    /// APK to embed when the profile supports Android.
    pub apk_archive_path: Option<Utf8PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_base() -> ProfileModel {
        let mut model = ProfileModel::new();
        model.base_archive_path = Some(Utf8PathBuf::from("/tmp/AM2R_11.zip"));
        model
    }

    #[test]
    fn test_empty_model_cannot_create() {
        assert!(!ProfileModel::new().can_create());
    }

    #[test]
    fn test_base_alone_cannot_create() {
        // No desktop archive supplied yet.
        assert!(!model_with_base().can_create());
    }

    #[test]
    fn test_one_desktop_archive_suffices() {
        let mut model = model_with_base();
        model.selected.insert(Platform::Linux);
        model
            .archive_paths
            .insert(Platform::Linux, Utf8PathBuf::from("/tmp/linux.zip"));
        assert!(model.can_create());
    }

    #[test]
    fn test_selected_platform_without_archive_blocks() {
        let mut model = model_with_base();
        model.selected.insert(Platform::Linux);
        model
            .archive_paths
            .insert(Platform::Linux, Utf8PathBuf::from("/tmp/linux.zip"));
        model.selected.insert(Platform::Windows);
        assert!(!model.can_create());
    }

    #[test]
    fn test_android_alone_is_not_a_profile() {
        let mut model = model_with_base();
        model.selected.insert(Platform::Android);
        model
            .archive_paths
            .insert(Platform::Android, Utf8PathBuf::from("/tmp/mod.apk"));
        assert!(!model.can_create());
    }

    #[test]
    fn test_custom_save_requires_token() {
        let mut model = model_with_base();
        model.selected.insert(Platform::Windows);
        model
            .archive_paths
            .insert(Platform::Windows, Utf8PathBuf::from("/tmp/win.zip"));
        model.metadata.custom_save_enabled = true;
        assert!(!model.can_create());

        model.metadata.save_location_token = "%localappdata%/AM2R/mysave".to_string();
        assert!(model.can_create());
    }

    #[test]
    fn test_packaging_targets_keep_fixed_order() {
        let mut model = model_with_base();
        for p in [Platform::Mac, Platform::Windows] {
            model.selected.insert(p);
            model
                .archive_paths
                .insert(p, Utf8PathBuf::from(format!("/tmp/{p}.zip")));
        }
        // Insertion order was Mac first; packaging order is fixed.
        assert_eq!(
            model.packaging_targets(),
            vec![Platform::Windows, Platform::Mac]
        );
    }

    #[test]
    fn test_metadata_validation() {
        let mut meta = ProfileMetadata {
            name: "Community Updates".to_string(),
            author: "Someone".to_string(),
            version: "1.5.5".to_string(),
            ..ProfileMetadata::default()
        };
        assert!(meta.validate().is_ok());

        meta.author.clear();
        assert_eq!(meta.validate(), Err(MetadataError::EmptyField("author")));

        meta.author = "Someone".to_string();
        meta.name = "Bad/Name".to_string();
        assert_eq!(
            meta.validate(),
            Err(MetadataError::ReservedNameCharacter('/'))
        );
    }
}
