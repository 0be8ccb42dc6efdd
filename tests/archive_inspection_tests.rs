//! Integration tests for archive inspection and the reference check.
//!
//! Fixtures are real zip archives written into temp directories, so these
//! exercise the same read path the packaging pipeline uses.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use modpacker::models::Platform;
use modpacker::services::archive::{contains_entry, has_profile_metadata, has_runtime_marker};
use modpacker::services::{IntegrityChecker, ManifestIntegrityChecker, ValidationResult};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_zip(dir: &TempDir, file: &str, entries: &[(&str, &[u8])]) -> Utf8PathBuf {
    let path = Utf8PathBuf::try_from(dir.path().join(file)).unwrap();
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn manifest_for(entries: &[(&str, &[u8])]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(name, data)| (name.to_string(), format!("{:x}", md5::compute(data))))
        .collect()
}

const BASE_ENTRIES: &[(&str, &[u8])] = &[
    ("AM2R.exe", b"reference runner"),
    ("data.win", b"reference data"),
    ("D3DX9_43.dll", b"reference dll"),
];

#[test]
fn linux_marker_accepts_both_historical_layouts() {
    let dir = TempDir::new().unwrap();
    let am2r_layout = write_zip(&dir, "a.zip", &[("AM2R", b"elf"), ("assets/game.unx", b"x")]);
    let runner_layout = write_zip(&dir, "b.zip", &[("runner", b"elf")]);

    assert!(has_runtime_marker(&am2r_layout, Platform::Linux).unwrap());
    assert!(has_runtime_marker(&runner_layout, Platform::Linux).unwrap());
}

#[test]
fn nested_runner_does_not_count_as_marker() {
    let dir = TempDir::new().unwrap();
    let nested = write_zip(&dir, "nested.zip", &[("subdir/AM2R", b"elf")]);

    assert!(!has_runtime_marker(&nested, Platform::Linux).unwrap());
    assert!(contains_entry(&nested, "subdir/AM2R").unwrap());
    assert!(!contains_entry(&nested, "AM2R").unwrap());
}

#[test]
fn windows_marker_requires_exact_root_entry() {
    let dir = TempDir::new().unwrap();
    let good = write_zip(&dir, "good.zip", &[("AM2R.exe", b"pe"), ("data.win", b"d")]);
    let nested = write_zip(&dir, "bad.zip", &[("AM2R/AM2R.exe", b"pe")]);

    assert!(has_runtime_marker(&good, Platform::Windows).unwrap());
    assert!(!has_runtime_marker(&nested, Platform::Windows).unwrap());
}

#[test]
fn profile_metadata_is_flagged_anywhere_in_the_tree() {
    let dir = TempDir::new().unwrap();
    let nested = write_zip(
        &dir,
        "mod.zip",
        &[("AM2R.exe", b"pe"), ("extras/profile.xml", b"<profile/>")],
    );

    assert!(has_profile_metadata(&nested).unwrap());
}

#[test]
fn pristine_base_archive_validates() {
    let dir = TempDir::new().unwrap();
    let base = write_zip(&dir, "AM2R_11.zip", BASE_ENTRIES);
    let checker = ManifestIntegrityChecker::new(manifest_for(BASE_ENTRIES));

    assert_eq!(checker.verify_reference(&base), ValidationResult::Valid);
}

#[test]
fn modified_base_archive_is_rejected() {
    let dir = TempDir::new().unwrap();
    let tampered = write_zip(
        &dir,
        "AM2R_11.zip",
        &[
            ("AM2R.exe", b"reference runner"),
            ("data.win", b"patched data"),
            ("D3DX9_43.dll", b"reference dll"),
        ],
    );
    let checker = ManifestIntegrityChecker::new(manifest_for(BASE_ENTRIES));

    assert_eq!(
        checker.verify_reference(&tampered),
        ValidationResult::WrongContents
    );
}

#[test]
fn unreadable_and_missing_bases_map_to_distinct_results() {
    let dir = TempDir::new().unwrap();
    let garbage = Utf8PathBuf::try_from(dir.path().join("AM2R_11.zip")).unwrap();
    std::fs::write(&garbage, b"not a zip at all").unwrap();

    let checker = ManifestIntegrityChecker::new(manifest_for(BASE_ENTRIES));
    assert_eq!(checker.verify_reference(&garbage), ValidationResult::Corrupt);
    assert_eq!(
        checker.verify_reference(Utf8Path::new("/nonexistent/AM2R_11.zip")),
        ValidationResult::NotFound
    );
}
