//! Save-directory translation between native paths and portable tokens.
//!
//! The packed profile stores one OS-agnostic save location,
//! `%localappdata%/...`, which the launcher expands per platform. Translation
//! is asymmetric on purpose: the grammar mirrors where the GameMaker runtime
//! actually writes saves on each OS, and those conventions differ in shape,
//! not just in prefix. The concrete input/output pairs in the tests are
//! load-bearing for save detection on end-user machines; do not "simplify"
//! them.

use crate::models::Platform;
use regex::Regex;
use thiserror::Error;

/// Save location written into profiles when the user keeps vanilla saves.
pub const DEFAULT_SAVE_LOCATION: &str = "%localappdata%/AM2R";

/// Token prefix of vanilla and vanilla-nested save locations. The runtime
/// emits lowercase directory names for custom saves created in-game, so
/// anything under this prefix is lower-cased to match (case mismatches break
/// save detection on case-sensitive filesystems).
pub const VANILLA_SAVE_PREFIX: &str = "%localappdata%/AM2R/";

/// macOS bundle identifier the runtime uses for vanilla saves.
const MAC_VANILLA_BUNDLE: &str = "com.yoyogames.am2r";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SavePathError {
    #[error("custom save directories are not supported for {platform}")]
    Unsupported { platform: Platform },

    #[error("{dir} is outside the canonical {platform} save tree")]
    OutsideCanonicalTree { platform: Platform, dir: String },
}

/// Translate a user-chosen save directory into the portable token.
///
/// Fails unless `selected_dir` begins with the platform's canonical
/// save-directory prefix under `home` — a profile pointing anywhere else
/// would never find its save data at runtime.
pub fn to_portable_token(
    selected_dir: &str,
    platform: Platform,
    home: &str,
) -> Result<String, SavePathError> {
    let prefix = platform
        .spec()
        .save_prefix
        .ok_or(SavePathError::Unsupported { platform })?;

    // Home is runtime data, so both parts are escaped; the pattern itself
    // cannot fail to compile.
    let pattern = Regex::new(&format!(
        "^{}{}",
        regex::escape(home),
        regex::escape(prefix)
    ))
    .expect("escaped save prefix pattern is always valid");

    let matched = pattern
        .find(selected_dir)
        .ok_or_else(|| SavePathError::OutsideCanonicalTree {
            platform,
            dir: selected_dir.to_string(),
        })?;

    let mut token = format!("%localappdata%/{}", &selected_dir[matched.end()..]);

    // The packaged format is slash-delimited regardless of source OS.
    if platform == Platform::Windows {
        token = token.replace('\\', "/");
    }

    // On Mac the runtime nests saves under its bundle identifier; fold that
    // back to the name the token grammar uses.
    if platform == Platform::Mac {
        token = token.replace(MAC_VANILLA_BUNDLE, "AM2R");
    }

    if let Some(rest) = token.strip_prefix(VANILLA_SAVE_PREFIX) {
        token = format!("{VANILLA_SAVE_PREFIX}{}", rest.to_lowercase());
    }

    Ok(token)
}

/// Expand the portable token into the final save location embedded into a
/// profile for `platform`.
///
/// Windows keeps the token verbatim; the environment expands
/// `%localappdata%` there. Linux maps it onto `~/.config`. Mac rewrites onto
/// the bundle-identifier convention: the vanilla identifier when the token
/// contains the default location, otherwise an identifier derived from the
/// token's final directory name. The Mac branch is containment-based, exactly
/// as the launcher expects.
pub fn resolve_for_platform(token: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows | Platform::Android => token.to_string(),
        Platform::Linux => token.replace("%localappdata%", "~/.config"),
        Platform::Mac => {
            if token.contains(DEFAULT_SAVE_LOCATION) {
                token.replace(
                    DEFAULT_SAVE_LOCATION,
                    "~/Library/Application Support/com.yoyogames.am2r",
                )
            } else {
                format!(
                    "~/Library/Application Support/com.yoyogames.{}",
                    final_dir_name(token).to_lowercase()
                )
            }
        }
    }
}

/// The effective token for a profile: the custom one when enabled and
/// present, the vanilla default otherwise.
pub fn effective_token(custom_save_enabled: bool, token: &str) -> &str {
    if custom_save_enabled && !token.trim().is_empty() {
        token
    } else {
        DEFAULT_SAVE_LOCATION
    }
}

fn final_dir_name(token: &str) -> &str {
    token
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(token)
}
