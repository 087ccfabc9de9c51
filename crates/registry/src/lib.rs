//! Registry layer for buddydesk.
//!
//! This crate sits between the embedded document store
//! (`buddydesk-store`) and the page handlers, providing:
//!
//! - Identity store with separately stored bcrypt credentials
//! - Mentee/note store with composite keys and cascading deletes
//! - Asset store with an owner index
//! - Manually maintained secondary indexes
//! - Pure authorization rules returning tagged decisions
//!
//! Callers construct a [`Registry`] once at process startup and pass it
//! around; there is no ambient global store handle.

#![deny(unsafe_code)]

mod asset;
mod authz;
mod error;
mod identity;
mod index;
mod mentee;

use buddydesk_store::StorageEngine;
use buddydesk_types::{RegistryConfig, User};
use snafu::ResultExt;

pub use asset::AssetStore;
pub use authz::{Decision, can_mutate_mentee, can_mutate_note, check_delete_user};
pub use error::{RegistryError, Result};
pub use identity::IdentityStore;
pub use index::IndexManager;
pub use mentee::MenteeStore;

use crate::error::EngineSnafu;

/// The registry: an explicitly constructed handle owning the storage
/// engine and the three stores over it.
///
/// Cheap to clone; all clones share the same engine.
#[derive(Clone)]
pub struct Registry {
    engine: StorageEngine,
    identity: IdentityStore,
    mentees: MenteeStore,
    assets: AssetStore,
}

impl Registry {
    /// Opens a registry per the configuration.
    ///
    /// A configured `data_path` selects the file-backed engine; without
    /// one the registry runs in memory.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Engine`] if the store cannot be opened.
    pub fn open(config: &RegistryConfig) -> Result<Self> {
        let engine = match &config.data_path {
            Some(path) => StorageEngine::open(path),
            None => StorageEngine::open_in_memory(),
        }
        .context(EngineSnafu)?;
        Ok(Self::with_engine(engine, config.clone()))
    }

    /// Opens an in-memory registry, ignoring any configured data path.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Engine`] if the backend cannot be created.
    pub fn open_in_memory(config: &RegistryConfig) -> Result<Self> {
        let engine = StorageEngine::open_in_memory().context(EngineSnafu)?;
        Ok(Self::with_engine(engine, config.clone()))
    }

    /// Builds a registry over an already-opened engine.
    pub fn with_engine(engine: StorageEngine, config: RegistryConfig) -> Self {
        let identity = IdentityStore::new(engine.clone(), config.clone());
        let mentees = MenteeStore::new(engine.clone(), config.clone());
        let assets = AssetStore::new(engine.clone(), config);
        Self { engine, identity, mentees, assets }
    }

    /// Returns the identity store.
    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// Returns the mentee/note store.
    pub fn mentees(&self) -> &MenteeStore {
        &self.mentees
    }

    /// Returns the asset store.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Returns the underlying storage engine.
    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    /// Decides whether `actor` may delete `target`, gathering the
    /// target's mentee and asset counts from the stores and delegating to
    /// the pure rule [`check_delete_user`].
    ///
    /// # Errors
    ///
    /// Returns a storage error if either count query fails. The
    /// authorization outcome itself is always a [`Decision`], never an
    /// error.
    pub fn can_delete_user(&self, actor: &User, target: &User) -> Result<Decision> {
        let mentee_count = self.mentees.get_mentee_count(&target.id)?;
        let asset_count = self.assets.get_asset_count(&target.id)?;
        Ok(check_delete_user(actor, target, mentee_count, asset_count))
    }
}
