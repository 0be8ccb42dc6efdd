use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Main configuration from `ModPacker Main.yaml`.
///
/// Carries the reference-distribution manifest the integrity check runs
/// against. Shipped with defaults; users normally never edit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    #[serde(rename = "ModPacker_Data")]
    pub packer_data: PackerData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerData {
    pub version: String,

    /// Archive entries a pristine AM2R 1.1 distribution must contain, mapped
    /// to their MD5 sums. Order is preserved so the file stays diffable.
    #[serde(rename = "Reference_Manifest")]
    pub reference_manifest: IndexMap<String, String>,
}

/// User configuration from `ModPacker Config.yaml`.
///
/// Front-end conveniences only; nothing here affects packaging semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "ModPacker_Settings")]
    pub packer_settings: PackerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerSettings {
    /// Directory offered for packaged profiles when none is given on the
    /// command line. Empty means ask per platform.
    #[serde(rename = "Default Output Dir", default)]
    pub default_output_dir: String,

    /// Answer every warn-and-confirm prompt with yes.
    #[serde(rename = "Assume Yes", default)]
    pub assume_yes: bool,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for PackerSettings {
    fn default() -> Self {
        Self {
            default_output_dir: String::new(),
            assume_yes: false,
            debug_mode: false,
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            packer_settings: PackerSettings::default(),
        }
    }
}

impl MainConfig {
    /// Entry names the manifest covers, in manifest order.
    pub fn manifest_entries(&self) -> impl Iterator<Item = &str> {
        self.packer_data.reference_manifest.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packer_settings_defaults() {
        let settings = PackerSettings::default();
        assert!(settings.default_output_dir.is_empty());
        assert!(!settings.assume_yes);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_user_config_round_trips_through_yaml() {
        let config = UserConfig::default();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let loaded: UserConfig = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(
            loaded.packer_settings.assume_yes,
            config.packer_settings.assume_yes
        );
    }

    #[test]
    fn test_missing_settings_fall_back_to_defaults() {
        let loaded: UserConfig =
            serde_yaml_ng::from_str("ModPacker_Settings:\n  Debug Mode: true\n").unwrap();
        assert!(loaded.packer_settings.debug_mode);
        assert!(!loaded.packer_settings.assume_yes);
    }
}
