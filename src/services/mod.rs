//! Services module - the packaging pipeline's business logic.
//!
//! Everything here is framework-agnostic: no terminal code, no dialogs, only
//! explicit parameters and collaborator traits, which keeps the pipeline
//! testable against scripted front-ends.
//!
//! # Components
//!
//! - [`save_paths`]: translation between native save directories and the
//!   portable `%localappdata%/...` token, plus per-platform expansion
//! - [`archive`]: read-only structural inspection of zip archives (runtime
//!   markers, metadata-file conflicts)
//! - [`integrity`]: reference-distribution verification behind the
//!   [`IntegrityChecker`] trait
//! - [`writer`]: profile-archive assembly behind the [`ProfileWriter`] trait
//! - [`packaging`]: the [`PackagingOrchestrator`] tying the above together,
//!   one sequential run per trigger

pub mod archive;
pub mod integrity;
pub mod packaging;
pub mod save_paths;
pub mod writer;

pub use archive::ArchiveError;
pub use integrity::{IntegrityChecker, ManifestIntegrityChecker, ValidationResult};
pub use packaging::{
    PackagerUi, PackagingError, PackagingOrchestrator, PackagingOutcome, SkipReason,
};
pub use save_paths::{DEFAULT_SAVE_LOCATION, SavePathError, VANILLA_SAVE_PREFIX};
pub use writer::{ProfileWriter, WriteError, ZipProfileWriter};
