//! Default profile-archive writer.
//!
//! A packaged profile is the modded build archive with the launcher's
//! `profile.xml` metadata appended (plus the APK under `android/` when the
//! profile supports Android). Entries from the source archive are copied in
//! raw form, so nothing is recompressed.

use crate::models::{Platform, ResolvedProfile};
use crate::services::archive::{self, ArchiveError, PROFILE_METADATA_NAME};
use camino::Utf8Path;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io;
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Version of the metadata schema embedded into `profile.xml`.
const PROFILE_XML_VERSION: &str = "1";

/// Entry name for the embedded Android build.
const APK_ENTRY_NAME: &str = "android/AM2R.apk";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O failure while writing profile archive")]
    Io(#[from] io::Error),

    #[error("zip failure while writing profile archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to render profile metadata")]
    Metadata(#[from] quick_xml::Error),

    #[error(transparent)]
    SourceArchive(#[from] ArchiveError),
}

/// Collaborator producing the final packaged archive. The orchestrator only
/// constructs its input and reacts to success or failure.
pub trait ProfileWriter {
    fn write(
        &self,
        profile: &ResolvedProfile,
        platform: Platform,
        output: &Utf8Path,
    ) -> Result<(), WriteError>;
}

/// The shipped [`ProfileWriter`]: raw-copies the modded build and appends
/// generated metadata.
#[derive(Debug, Default)]
pub struct ZipProfileWriter;

impl ZipProfileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ProfileWriter for ZipProfileWriter {
    fn write(
        &self,
        profile: &ResolvedProfile,
        platform: Platform,
        output: &Utf8Path,
    ) -> Result<(), WriteError> {
        let mut source = archive::open(&profile.mod_archive_path)?;
        let mut zip = ZipWriter::new(File::create(output)?);

        for index in 0..source.len() {
            let entry = source.by_index_raw(index)?;
            // The writer owns the root metadata entry; a colliding one from
            // the source was already confirmed away by the user.
            if entry.name() == PROFILE_METADATA_NAME {
                continue;
            }
            zip.raw_copy_file(entry)?;
        }

        if profile.supports_android {
            if let Some(apk) = &profile.apk_archive_path {
                zip.start_file(APK_ENTRY_NAME, SimpleFileOptions::default())?;
                let mut apk_file = File::open(apk)?;
                io::copy(&mut apk_file, &mut zip)?;
            }
        }

        zip.start_file(PROFILE_METADATA_NAME, SimpleFileOptions::default())?;
        let metadata = render_profile_xml(profile)?;
        io::Write::write_all(&mut zip, &metadata)?;

        zip.finish()?;
        tracing::info!("wrote {platform} profile archive to {output}");
        Ok(())
    }
}

/// Render the launcher's per-profile metadata file.
pub fn render_profile_xml(profile: &ResolvedProfile) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("profile")))?;

    write_element(&mut writer, "XMLVersion", PROFILE_XML_VERSION)?;
    write_element(&mut writer, "Name", &profile.name)?;
    write_element(&mut writer, "Author", &profile.author)?;
    write_element(&mut writer, "Version", &profile.version)?;
    write_element(&mut writer, "OperatingSystem", &profile.operating_system)?;
    write_element(&mut writer, "UsesCustomMusic", bool_text(profile.uses_custom_music))?;
    write_element(&mut writer, "UsesYYC", bool_text(profile.uses_yyc))?;
    write_element(&mut writer, "SupportsAndroid", bool_text(profile.supports_android))?;
    write_element(&mut writer, "SaveLocation", &profile.save_location)?;
    write_element(&mut writer, "ProfileNotes", &profile.notes)?;

    writer.write_event(Event::End(BytesEnd::new("profile")))?;
    Ok(writer.into_inner())
}

fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
