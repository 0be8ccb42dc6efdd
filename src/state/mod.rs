// State management module
//
// Wraps the session's ProfileModel in Arc<RwLock<T>> and reports change
// events from every mutation, so front-ends can keep the "create" action in
// sync without polling.

use crate::models::{Platform, ProfileMetadata, ProfileModel};
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};

/// Change events reported when the session model is modified.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The readiness gate flipped; `can_create` is its new value.
    ReadinessChanged { can_create: bool },

    /// The base archive was supplied or cleared.
    BaseArchiveChanged { supplied: bool },

    /// A platform's modded archive was supplied or cleared.
    PlatformArchiveChanged { platform: Platform, supplied: bool },

    /// A platform was selected or deselected for packaging.
    SelectionChanged { platform: Platform, selected: bool },

    /// Any metadata field changed.
    MetadataChanged,

    /// The model was reset to its empty session-start state.
    StateReset,
}

/// Owner of the single per-session [`ProfileModel`].
///
/// All mutations go through [`update()`](Self::update) (or the convenience
/// setters built on it), which diffs the model before and after and returns
/// the emitted [`StateChange`] events. Invariants that span fields — YYC
/// excluding Mac, deselection clearing the archive path — are enforced here
/// so the model itself stays a plain record.
pub struct StateManager {
    state: Arc<RwLock<ProfileModel>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ProfileModel::new())),
        }
    }

    /// Read-only clone of the current model, safe to hold across prompts.
    pub fn snapshot(&self) -> ProfileModel {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the model.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ProfileModel) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Whether the "create" action may currently be offered.
    pub fn can_create(&self) -> bool {
        self.read(ProfileModel::can_create)
    }

    /// Apply a mutation and report what changed.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ProfileModel),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        detect_changes(&old_state, &state)
    }

    // Convenience setters mirroring the front-end's controls.

    pub fn set_base_archive(&self, path: Option<Utf8PathBuf>) -> Vec<StateChange> {
        self.update(|state| {
            state.base_archive_path = path;
        })
    }

    /// Supply or clear the modded archive for a platform. Supplying also
    /// selects the platform, matching how the front-end's picker behaves.
    pub fn set_platform_archive(
        &self,
        platform: Platform,
        path: Option<Utf8PathBuf>,
    ) -> Vec<StateChange> {
        self.update(|state| {
            match path {
                Some(path) => {
                    if platform == Platform::Mac && state.metadata.uses_yyc {
                        tracing::warn!("ignoring Mac archive: YYC profiles cannot target Mac");
                        return;
                    }
                    state.archive_paths.insert(platform, path);
                    state.selected.insert(platform);
                }
                None => {
                    state.archive_paths.shift_remove(&platform);
                }
            };
        })
    }

    /// Select or deselect a platform. Deselecting clears the supplied
    /// archive; selecting Mac is refused while YYC is enabled.
    pub fn set_platform_selected(&self, platform: Platform, selected: bool) -> Vec<StateChange> {
        self.update(|state| {
            if selected {
                if platform == Platform::Mac && state.metadata.uses_yyc {
                    tracing::warn!("ignoring Mac selection: YYC profiles cannot target Mac");
                    return;
                }
                state.selected.insert(platform);
            } else {
                state.selected.shift_remove(&platform);
                state.archive_paths.shift_remove(&platform);
            }
        })
    }

    /// Enable or disable the YoYo Compiler flag. Enabling strips Mac from
    /// the session: YYC builds cannot target it.
    pub fn set_uses_yyc(&self, uses_yyc: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.metadata.uses_yyc = uses_yyc;
            if uses_yyc {
                state.selected.shift_remove(&Platform::Mac);
                state.archive_paths.shift_remove(&Platform::Mac);
            }
        })
    }

    pub fn set_custom_save_enabled(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.metadata.custom_save_enabled = enabled;
            if !enabled {
                state.metadata.save_location_token.clear();
            }
        })
    }

    pub fn set_save_location_token(&self, token: String) -> Vec<StateChange> {
        self.update(|state| {
            state.metadata.save_location_token = token;
        })
    }

    /// Batch metadata edits (name, author, version, notes, flags).
    pub fn update_metadata<F>(&self, metadata_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ProfileMetadata),
    {
        self.update(|state| metadata_fn(&mut state.metadata))
    }

    /// Reset to the empty session-start model.
    pub fn reset(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            *state = ProfileModel::new();
        });
        changes.push(StateChange::StateReset);
        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

fn detect_changes(old: &ProfileModel, new: &ProfileModel) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if old.base_archive_path.is_some() != new.base_archive_path.is_some() {
        changes.push(StateChange::BaseArchiveChanged {
            supplied: new.base_archive_path.is_some(),
        });
    }

    for platform in Platform::ALL {
        let was = old.is_supplied(platform);
        let is = new.is_supplied(platform);
        if was != is {
            changes.push(StateChange::PlatformArchiveChanged {
                platform,
                supplied: is,
            });
        }

        let was_selected = old.is_selected(platform);
        let is_selected = new.is_selected(platform);
        if was_selected != is_selected {
            changes.push(StateChange::SelectionChanged {
                platform,
                selected: is_selected,
            });
        }
    }

    if old.metadata != new.metadata {
        changes.push(StateChange::MetadataChanged);
    }

    if old.can_create() != new.can_create() {
        changes.push(StateChange::ReadinessChanged {
            can_create: new.can_create(),
        });
    }

    changes
}
