//! Data models for the mod packer.
//!
//! - [`Platform`]: closed enumeration of packaging targets, with a static
//!   [`PlatformSpec`] table holding each platform's runtime markers and
//!   save-path grammar
//! - [`ProfileModel`]: the in-memory record of one packaging session,
//!   including the readiness gate [`ProfileModel::can_create`]
//! - [`ResolvedProfile`]: the per-platform writer input snapshot
//! - [`MainConfig`] / [`UserConfig`]: YAML-backed configuration structs
//!
//! `ProfileModel` is wrapped in `Arc<RwLock<_>>` by
//! [`StateManager`](crate::state::StateManager); all mutations go through its
//! setters so change events and invariants stay consistent.

pub mod config;
pub mod platform;
pub mod profile;

pub use config::{MainConfig, PackerData, PackerSettings, UserConfig};
pub use platform::{Platform, PlatformSpec};
pub use profile::{
    MetadataError, ProfileMetadata, ProfileModel, RESERVED_NAME_CHARS, ResolvedProfile,
};
