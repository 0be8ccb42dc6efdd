use std::fmt;

/// Operating systems a mod profile can target.
///
/// The launcher distinguishes three desktop targets plus Android. Android is
/// never packaged on its own: APK support is a property of a desktop profile
/// (see [`crate::services::packaging`]), which is why [`Platform::DESKTOP`]
/// drives the packaging loop while [`Platform::ALL`] drives the UI state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Windows,
    Linux,
    Mac,
    Android,
}

/// Static per-platform data: runtime markers, save-path grammar, extensions.
///
/// Everything that differs between platforms lives in this table instead of
/// scattered branching, so adding a platform is a one-entry change.
pub struct PlatformSpec {
    /// Display name, also embedded into `profile.xml` as `OperatingSystem`.
    pub name: &'static str,

    /// Archive entries (full paths, case-sensitive) that prove the archive is
    /// a real runtime build for this platform. Any single match satisfies the
    /// check; an empty list means no marker check is defined.
    pub runtime_markers: &'static [&'static str],

    /// Expected extension of both the supplied and the packaged archive.
    pub archive_extension: &'static str,

    /// Canonical save-directory prefix relative to the user's home directory,
    /// in the platform's native path grammar. `None` for platforms whose save
    /// handling is owned by the target package format (Android).
    pub save_prefix: Option<&'static str>,
}

const WINDOWS_SPEC: PlatformSpec = PlatformSpec {
    name: "Windows",
    runtime_markers: &["AM2R.exe"],
    archive_extension: "zip",
    save_prefix: Some(r"\AppData\Local\"),
};

const LINUX_SPEC: PlatformSpec = PlatformSpec {
    name: "Linux",
    // Two historical build layouts exist; either entry counts.
    runtime_markers: &["AM2R", "runner"],
    archive_extension: "zip",
    save_prefix: Some("/.config/"),
};

const MAC_SPEC: PlatformSpec = PlatformSpec {
    name: "Mac",
    runtime_markers: &["AM2R.app/Contents/MacOS/Mac_Runner"],
    archive_extension: "zip",
    save_prefix: Some("/Library/Application Support/"),
};

const ANDROID_SPEC: PlatformSpec = PlatformSpec {
    name: "Android",
    // APK structural validation happens on install, not here.
    runtime_markers: &[],
    archive_extension: "apk",
    save_prefix: None,
};

impl Platform {
    /// All platforms, in the order the UI presents them.
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Linux,
        Platform::Mac,
        Platform::Android,
    ];

    /// Desktop platforms in the fixed packaging order.
    pub const DESKTOP: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::Mac];

    /// Static data for this platform.
    pub fn spec(self) -> &'static PlatformSpec {
        match self {
            Platform::Windows => &WINDOWS_SPEC,
            Platform::Linux => &LINUX_SPEC,
            Platform::Mac => &MAC_SPEC,
            Platform::Android => &ANDROID_SPEC,
        }
    }

    pub fn is_desktop(self) -> bool {
        !matches!(self, Platform::Android)
    }

    /// The platform this process is running on, if it is one we package for.
    pub fn host() -> Option<Platform> {
        if cfg!(target_os = "windows") {
            Some(Platform::Windows)
        } else if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Platform::Mac)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_packaging_order() {
        assert_eq!(
            Platform::DESKTOP,
            [Platform::Windows, Platform::Linux, Platform::Mac]
        );
    }

    #[test]
    fn test_linux_has_two_markers() {
        assert_eq!(Platform::Linux.spec().runtime_markers, &["AM2R", "runner"]);
    }

    #[test]
    fn test_android_has_no_marker_or_save_prefix() {
        let spec = Platform::Android.spec();
        assert!(spec.runtime_markers.is_empty());
        assert!(spec.save_prefix.is_none());
        assert_eq!(spec.archive_extension, "apk");
    }

    #[test]
    fn test_display_matches_spec_name() {
        assert_eq!(Platform::Mac.to_string(), "Mac");
        assert_eq!(Platform::Windows.to_string(), "Windows");
    }
}
