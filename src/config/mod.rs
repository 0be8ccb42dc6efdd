use crate::models::{MainConfig, PackerData, UserConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two files:
/// - Main config (`ModPacker Main.yaml`): the reference-distribution manifest
/// - User config (`ModPacker Config.yaml`): front-end preferences
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    main_config_path: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at `config_dir`, creating the
    /// directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {config_dir}"))?;
        }

        Ok(Self {
            main_config_path: config_dir.join("ModPacker Main.yaml"),
            user_config_path: config_dir.join("ModPacker Config.yaml"),
            config_dir,
        })
    }

    /// Load the main configuration, falling back to the built-in manifest
    /// when the file does not exist.
    pub fn load_main_config(&self) -> Result<MainConfig> {
        if !self.main_config_path.exists() {
            tracing::warn!(
                "Main config not found at {}, using built-in reference manifest",
                self.main_config_path
            );
            return Ok(Self::default_main_config());
        }

        let file_contents = fs::read_to_string(&self.main_config_path)
            .with_context(|| format!("Failed to read main config: {}", self.main_config_path))?;

        let config: MainConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse main config: {}", self.main_config_path))?;

        tracing::info!("Loaded main config from {}", self.main_config_path);
        Ok(config)
    }

    pub fn save_main_config(&self, config: &MainConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize main config to YAML")?;

        fs::write(&self.main_config_path, yaml_string)
            .with_context(|| format!("Failed to write main config: {}", self.main_config_path))?;

        tracing::info!("Saved main config to {}", self.main_config_path);
        Ok(())
    }

    /// Load the user configuration, or defaults if the file does not exist.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        if !self.user_config_path.exists() {
            tracing::warn!(
                "User config not found at {}, using defaults",
                self.user_config_path
            );
            return Ok(UserConfig::default());
        }

        let file_contents = fs::read_to_string(&self.user_config_path)
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::info!("Loaded user config from {}", self.user_config_path);
        Ok(config)
    }

    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    /// Built-in reference manifest for the unmodified AM2R 1.1 distribution.
    pub fn default_main_config() -> MainConfig {
        let mut reference_manifest = IndexMap::new();
        reference_manifest.insert(
            "AM2R.exe".to_string(),
            "cc7bf6ea4bfb98a3d84e02f6c4754c7c".to_string(),
        );
        reference_manifest.insert(
            "data.win".to_string(),
            "f2b84fe5ba64cb64e284be1066ca8a8b".to_string(),
        );
        reference_manifest.insert(
            "D3DX9_43.dll".to_string(),
            "86e39e9161c3d930d93822f1563c280d".to_string(),
        );

        MainConfig {
            packer_data: PackerData {
                version: env!("CARGO_PKG_VERSION").to_string(),
                reference_manifest,
            },
        }
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_load_save_user_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = UserConfig::default();
        config.packer_settings.assume_yes = true;
        manager.save_user_config(&config).unwrap();

        let loaded = manager.load_user_config().unwrap();
        assert!(loaded.packer_settings.assume_yes);
    }

    #[test]
    fn test_missing_user_config_uses_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let loaded = manager.load_user_config().unwrap();
        assert!(!loaded.packer_settings.assume_yes);
    }

    #[test]
    fn test_default_main_config_covers_reference_files() {
        let config = ConfigManager::default_main_config();
        let entries: Vec<&str> = config.manifest_entries().collect();
        assert_eq!(entries, vec!["AM2R.exe", "data.win", "D3DX9_43.dll"]);
    }

    #[test]
    fn test_main_config_round_trip() {
        let (manager, _temp_dir) = create_test_config_manager();
        let config = ConfigManager::default_main_config();
        manager.save_main_config(&config).unwrap();

        let loaded = manager.load_main_config().unwrap();
        assert_eq!(
            loaded.packer_data.reference_manifest,
            config.packer_data.reference_manifest
        );
    }
}
