//! AM2R ModPacker - mod profile validation and packaging pipeline
//!
//! CLI entry point. The terminal is the "external collaborator" of the
//! packaging core: it supplies paths and metadata, renders warnings as y/N
//! prompts and prints terminal status text.
//!
//! # Exit codes
//!
//! - `0` - every selected platform was packaged
//! - `2` - input validation failed (metadata, readiness gate, base archive)
//! - `3` - the user backed out of a prompt or output-path selection
//! - `4` - the archive writer failed

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use clap::Parser;
use modpacker::models::Platform;
use modpacker::services::packaging::{PackagingError, PackagingOrchestrator};
use modpacker::services::save_paths;
use modpacker::services::{ManifestIntegrityChecker, ZipProfileWriter};
use modpacker::ui::ConsoleUi;
use modpacker::{APP_NAME, ConfigManager, StateManager, VERSION};
use std::process::ExitCode;

const EXIT_VALIDATION: u8 = 2;
const EXIT_CANCELLED: u8 = 3;
const EXIT_WRITE: u8 = 4;

/// Package AM2R mod builds into launcher profile archives.
#[derive(Parser, Debug)]
#[command(name = "modpacker", version, about)]
struct Cli {
    /// Unmodified AM2R 1.1 distribution zip (required for every profile)
    #[arg(long, value_name = "ZIP")]
    base: Utf8PathBuf,

    /// Modded Windows build zip
    #[arg(long, value_name = "ZIP")]
    windows: Option<Utf8PathBuf>,

    /// Modded Linux build zip
    #[arg(long, value_name = "ZIP")]
    linux: Option<Utf8PathBuf>,

    /// Modded Mac build zip (incompatible with --yyc)
    #[arg(long, value_name = "ZIP")]
    mac: Option<Utf8PathBuf>,

    /// Android package; embedded into the desktop profiles
    #[arg(long, value_name = "APK")]
    apk: Option<Utf8PathBuf>,

    /// Mod name (becomes part of the output file name)
    #[arg(long)]
    name: String,

    /// Mod author
    #[arg(long)]
    author: String,

    /// Mod version string
    #[arg(long = "mod-version", value_name = "VERSION")]
    mod_version: String,

    /// Free-text profile notes
    #[arg(long, default_value = "")]
    notes: String,

    /// The mod ships custom music
    #[arg(long)]
    custom_music: bool,

    /// The mod was compiled with the YoYo Compiler
    #[arg(long)]
    yyc: bool,

    /// Custom save-data directory (must live inside the platform's canonical
    /// save tree)
    #[arg(long, value_name = "DIR")]
    save_dir: Option<Utf8PathBuf>,

    /// Write packaged profiles into this directory without prompting
    #[arg(long, value_name = "DIR")]
    output_dir: Option<Utf8PathBuf>,

    /// Answer every warning prompt with yes
    #[arg(long)]
    yes: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Configuration directory
    #[arg(long, value_name = "DIR", default_value = "ModPacker Data")]
    config_dir: Utf8PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_VALIDATION)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let main_config = config_manager.load_main_config()?;
    let user_config = config_manager.load_user_config()?;
    let settings = &user_config.packer_settings;

    let _guard = modpacker::logging::setup_logging(
        "logs",
        "modpacker",
        cli.debug || settings.debug_mode,
        cli.debug,
    )?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    if cli.yyc && cli.mac.is_some() {
        return Err(anyhow!("the YoYo Compiler is not supported with Mac"));
    }

    let state = StateManager::new();
    state.update_metadata(|meta| {
        meta.name = cli.name.clone();
        meta.author = cli.author.clone();
        meta.version = cli.mod_version.clone();
        meta.notes = cli.notes.clone();
        meta.uses_custom_music = cli.custom_music;
        meta.supports_android = cli.apk.is_some();
    });
    state.set_uses_yyc(cli.yyc);
    state.set_base_archive(Some(cli.base.clone()));
    state.set_platform_archive(Platform::Windows, cli.windows.clone());
    state.set_platform_archive(Platform::Linux, cli.linux.clone());
    state.set_platform_archive(Platform::Mac, cli.mac.clone());
    state.set_platform_archive(Platform::Android, cli.apk.clone());

    if let Some(save_dir) = &cli.save_dir {
        let token = translate_save_dir(save_dir)?;
        tracing::info!("custom save location token: {token}");
        state.set_custom_save_enabled(true);
        state.set_save_location_token(token);
    }

    if !state.can_create() {
        return Err(anyhow!(
            "profile is not ready for packaging: supply the base archive and a modded \
             archive for at least one desktop platform (Android alone is not a profile)"
        ));
    }

    let checker =
        ManifestIntegrityChecker::new(main_config.packer_data.reference_manifest.clone());
    let writer = ZipProfileWriter::new();
    let output_dir = cli.output_dir.clone().or_else(|| {
        let dir = settings.default_output_dir.trim();
        (!dir.is_empty()).then(|| Utf8PathBuf::from(dir))
    });
    let ui = ConsoleUi::new(cli.yes || settings.assume_yes, output_dir);

    let orchestrator = PackagingOrchestrator::new(&checker, &writer, &ui);
    let model = state.snapshot();

    match orchestrator.run(&model) {
        Ok(outcome) if outcome.is_full_success() => Ok(ExitCode::SUCCESS),
        Ok(outcome) => {
            tracing::info!(
                "run ended without full success: {} packaged, {} skipped, aborted={}",
                outcome.completed.len(),
                outcome.skipped.len(),
                outcome.aborted
            );
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Err(err @ PackagingError::Write { .. }) => {
            eprintln!("Error: {:#}", anyhow::Error::new(err));
            Ok(ExitCode::from(EXIT_WRITE))
        }
        Err(err) => {
            eprintln!("Error: {:#}", anyhow::Error::new(err));
            Ok(ExitCode::from(EXIT_VALIDATION))
        }
    }
}

/// Translate the user's save directory into the portable token using the
/// host platform's path grammar.
fn translate_save_dir(save_dir: &Utf8PathBuf) -> Result<String> {
    let host = Platform::host()
        .context("custom save directories can only be translated on Windows, Linux or Mac")?;
    let home = dirs::home_dir().context("could not determine the home directory")?;
    let home = Utf8PathBuf::try_from(home)
        .map_err(|_| anyhow!("home directory is not valid UTF-8"))?;

    save_paths::to_portable_token(save_dir.as_str(), host, home.as_str())
        .map_err(|err| anyhow!(err))
}
