//! Integration tests for save-path translation.
//!
//! These pin the concrete token/resolution pairs the launcher depends on.
//! The pairs are load-bearing: a "simplified" grammar silently breaks save
//! detection on end-user machines.

use modpacker::models::Platform;
use modpacker::services::save_paths::{
    DEFAULT_SAVE_LOCATION, SavePathError, resolve_for_platform, to_portable_token,
};
use proptest::prelude::*;

const LINUX_HOME: &str = "/home/samus";
const MAC_HOME: &str = "/Users/samus";
const WIN_HOME: &str = r"C:\Users\samus";

#[test]
fn linux_vanilla_save_round_trips() {
    let token = to_portable_token(
        "/home/samus/.config/AM2R/MySave",
        Platform::Linux,
        LINUX_HOME,
    )
    .unwrap();
    assert_eq!(token, "%localappdata%/AM2R/mysave");
    assert_eq!(
        resolve_for_platform(&token, Platform::Linux),
        "~/.config/AM2R/mysave"
    );
}

#[test]
fn mac_vanilla_save_round_trips_through_bundle_identifier() {
    let token = to_portable_token(
        "/Users/samus/Library/Application Support/com.yoyogames.am2r/MySave",
        Platform::Mac,
        MAC_HOME,
    )
    .unwrap();
    assert_eq!(token, "%localappdata%/AM2R/mysave");
    assert_eq!(
        resolve_for_platform(&token, Platform::Mac),
        "~/Library/Application Support/com.yoyogames.am2r/mysave"
    );
}

#[test]
fn mac_non_default_save_uses_lowercased_directory_name() {
    assert_eq!(
        resolve_for_platform("%localappdata%/CustomGame", Platform::Mac),
        "~/Library/Application Support/com.yoyogames.customgame"
    );
}

#[test]
fn windows_save_outside_appdata_is_rejected() {
    let err = to_portable_token(r"C:\Temp\Save", Platform::Windows, WIN_HOME).unwrap_err();
    assert!(matches!(err, SavePathError::OutsideCanonicalTree { .. }));
}

#[test]
fn windows_token_is_slash_delimited_and_unresolved() {
    let token = to_portable_token(
        r"C:\Users\samus\AppData\Local\AM2R\MySave",
        Platform::Windows,
        WIN_HOME,
    )
    .unwrap();
    assert_eq!(token, "%localappdata%/AM2R/mysave");
    // Windows keeps the placeholder; the runtime environment expands it.
    assert_eq!(resolve_for_platform(&token, Platform::Windows), token);
}

#[test]
fn default_save_location_resolves_per_platform() {
    assert_eq!(
        resolve_for_platform(DEFAULT_SAVE_LOCATION, Platform::Linux),
        "~/.config/AM2R"
    );
    assert_eq!(
        resolve_for_platform(DEFAULT_SAVE_LOCATION, Platform::Mac),
        "~/Library/Application Support/com.yoyogames.am2r"
    );
}

proptest! {
    /// Any directory under the Linux config tree tokenizes and resolves
    /// without losing its (lowercased) trailing segment.
    #[test]
    fn linux_round_trip_for_arbitrary_names(name in "[A-Za-z][A-Za-z0-9]{0,14}") {
        let dir = format!("/home/samus/.config/AM2R/{name}");
        let token = to_portable_token(&dir, Platform::Linux, LINUX_HOME).unwrap();
        prop_assert_eq!(&token, &format!("%localappdata%/AM2R/{}", name.to_lowercase()));

        let resolved = resolve_for_platform(&token, Platform::Linux);
        prop_assert_eq!(resolved, format!("~/.config/AM2R/{}", name.to_lowercase()));
    }

    /// Windows tokens never carry backslashes, whatever the input segments.
    #[test]
    fn windows_tokens_are_always_slash_delimited(
        first in "[A-Za-z][A-Za-z0-9]{0,10}",
        second in "[A-Za-z][A-Za-z0-9]{0,10}",
    ) {
        let dir = format!(r"C:\Users\samus\AppData\Local\{first}\{second}");
        let token = to_portable_token(&dir, Platform::Windows, WIN_HOME).unwrap();
        prop_assert!(!token.contains('\\'));
        prop_assert!(token.starts_with("%localappdata%/"));
    }
}
