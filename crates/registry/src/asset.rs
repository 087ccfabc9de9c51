//! Asset store.
//!
//! Assets are equipment or material records owned by a user. The owner
//! index backs the user-deletion rule: a user owning assets can not be
//! deleted until the assets are reassigned or removed.

use buddydesk_store::{StorageEngine, Tables};
use buddydesk_types::{
    Asset, AssetId, NewAsset, RegistryConfig, UserId, decode, encode,
    keys::asset_key,
    validation::validate_name,
};
use chrono::Utc;
use redb::ReadableTable;
use snafu::ResultExt;

use crate::error::{
    CodecSnafu, CommitSnafu, RegistryError, Result, StorageSnafu, TableSnafu, TransactionSnafu,
    ValidationSnafu,
};
use crate::index::IndexManager;

/// Store for asset records.
#[derive(Clone)]
pub struct AssetStore {
    engine: StorageEngine,
    config: RegistryConfig,
}

impl AssetStore {
    pub(crate) fn new(engine: StorageEngine, config: RegistryConfig) -> Self {
        Self { engine, config }
    }

    /// Creates an asset.
    ///
    /// Generates a fresh opaque identifier and stamps the creation
    /// timestamp; record and owner index entry go in one transaction. The
    /// stored record is re-read and returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input, a storage error if
    /// persistence fails, or [`RegistryError::ReadBack`] if the fresh
    /// record cannot be re-read.
    pub fn create_asset(&self, new_asset: NewAsset) -> Result<Asset> {
        validate_name("name", &new_asset.name, &self.config.validation).context(ValidationSnafu)?;

        let asset = Asset {
            id: AssetId::generate(),
            name: new_asset.name,
            description: new_asset.description,
            owner_id: new_asset.owner_id,
            created_at: Utc::now(),
        };

        let key = asset_key(&asset.id);
        let doc = encode(&asset).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;
            assets.insert(key.as_str(), doc.as_slice()).context(StorageSnafu)?;

            let mut by_owner = txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
            IndexManager::add(&mut by_owner, asset.owner_id.as_str(), &key)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(asset_id = %asset.id, owner_id = %asset.owner_id, "created asset");

        match self.get_asset(&asset.id)? {
            Some(stored) => Ok(stored),
            None => Err(RegistryError::ReadBack { key }),
        }
    }

    /// Returns an asset by identifier.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails or a codec error if the
    /// stored record cannot be decoded.
    pub fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        let key = asset_key(id);

        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;

        match assets.get(key.as_str()).context(StorageSnafu)? {
            Some(data) => {
                let asset = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(asset))
            }
            None => Ok(None),
        }
    }

    /// Lists all assets.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails or a codec error if any
    /// stored record cannot be decoded.
    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;

        let mut records = Vec::new();
        for result in assets.iter().context(StorageSnafu)? {
            let (_, value) = result.context(StorageSnafu)?;
            let asset: Asset = decode(value.value()).context(CodecSnafu)?;
            records.push(asset);
        }
        Ok(records)
    }

    /// Replaces an asset record wholesale, re-pointing the owner index
    /// entry when ownership changed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input or a storage error if
    /// the write fails.
    pub fn update_asset(&self, asset: &Asset) -> Result<()> {
        validate_name("name", &asset.name, &self.config.validation).context(ValidationSnafu)?;

        let key = asset_key(&asset.id);
        let doc = encode(asset).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;
            let old: Option<Asset> = match assets.get(key.as_str()).context(StorageSnafu)? {
                Some(data) => Some(decode(data.value()).context(CodecSnafu)?),
                None => None,
            };
            assets.insert(key.as_str(), doc.as_slice()).context(StorageSnafu)?;

            let mut by_owner = txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
            match old {
                Some(old) if old.owner_id == asset.owner_id => {}
                Some(old) => {
                    IndexManager::remove(&mut by_owner, old.owner_id.as_str(), &key)?;
                    IndexManager::add(&mut by_owner, asset.owner_id.as_str(), &key)?;
                }
                None => {
                    IndexManager::add(&mut by_owner, asset.owner_id.as_str(), &key)?;
                }
            }
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(asset_id = %asset.id, "updated asset");
        Ok(())
    }

    /// Deletes an asset and its owner index entry.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn delete_asset(&self, id: &AssetId) -> Result<()> {
        let key = asset_key(id);
        let old = self.get_asset(id)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;
            assets.remove(key.as_str()).context(StorageSnafu)?;

            if let Some(old) = &old {
                let mut by_owner = txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
                IndexManager::remove(&mut by_owner, old.owner_id.as_str(), &key)?;
            }
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(asset_id = %id, "deleted asset");
        Ok(())
    }

    /// Lists the assets owned by a user, via the owner index.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a read fails or a codec error if a
    /// record cannot be decoded.
    pub fn get_assets_of_owner(&self, owner_id: &UserId) -> Result<Vec<Asset>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let by_owner = txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
        let assets = txn.open_table(Tables::ASSETS).context(TableSnafu)?;

        let mut records = Vec::new();
        for key in IndexManager::get(&by_owner, owner_id.as_str())? {
            if let Some(data) = assets.get(key.as_str()).context(StorageSnafu)? {
                let asset: Asset = decode(data.value()).context(CodecSnafu)?;
                records.push(asset);
            }
        }
        Ok(records)
    }

    /// Returns the number of assets owned by a user.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the index read fails.
    pub fn get_asset_count(&self, owner_id: &UserId) -> Result<usize> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let by_owner = txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
        IndexManager::count(&by_owner, owner_id.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn store() -> AssetStore {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        AssetStore::new(engine, RegistryConfig::default())
    }

    fn new_asset(name: &str, owner: &str) -> NewAsset {
        NewAsset {
            name: name.to_string(),
            description: String::new(),
            owner_id: UserId::from_email(owner),
        }
    }

    #[test]
    fn test_create_and_count_by_owner() {
        let store = store();
        let owner = UserId::from_email("owner@example.com");

        store.create_asset(new_asset("Laptop", "owner@example.com")).expect("create");
        store.create_asset(new_asset("Badge", "owner@example.com")).expect("create");
        store.create_asset(new_asset("Key", "other@example.com")).expect("create");

        assert_eq!(store.get_asset_count(&owner).expect("count"), 2);
        let owned = store.get_assets_of_owner(&owner).expect("list");
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_reassignment_moves_index_entry() {
        let store = store();
        let mut asset = store.create_asset(new_asset("Laptop", "a@example.com")).expect("create");

        asset.owner_id = UserId::from_email("b@example.com");
        store.update_asset(&asset).expect("update");

        assert_eq!(store.get_asset_count(&UserId::from_email("a@example.com")).unwrap(), 0);
        assert_eq!(store.get_asset_count(&UserId::from_email("b@example.com")).unwrap(), 1);
    }

    #[test]
    fn test_delete_clears_index_entry() {
        let store = store();
        let asset = store.create_asset(new_asset("Laptop", "a@example.com")).expect("create");

        store.delete_asset(&asset.id).expect("delete");

        assert!(store.get_asset(&asset.id).expect("get").is_none());
        assert_eq!(store.get_asset_count(&UserId::from_email("a@example.com")).unwrap(), 0);
    }

    #[test]
    fn test_list_assets_sees_all_owners() {
        let store = store();
        store.create_asset(new_asset("Laptop", "a@example.com")).expect("create");
        store.create_asset(new_asset("Badge", "b@example.com")).expect("create");
        assert_eq!(store.list_assets().expect("list").len(), 2);
    }
}
