//! Secondary index maintenance.
//!
//! The store has no native secondary indexes, so the registry maintains
//! them by hand: each index table maps an index value (a buddy id, a
//! lowercased email, an owner id) to a serialized set of record keys.
//! Index rows are mutated inside the same write transaction as the primary
//! record, and a row is removed entirely once its set empties.

use buddydesk_types::{decode, encode};
use redb::{ReadOnlyTable, ReadableTable, Table};
use snafu::ResultExt;

use crate::error::{CodecSnafu, Result, StorageSnafu};

/// Serialized value of an index row: the set of record keys filed under
/// one index value. Kept sorted for deterministic listings.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct IdSet {
    ids: Vec<String>,
}

/// Index table maintenance over `index value → id set` tables.
pub struct IndexManager;

impl IndexManager {
    /// Adds a record key under an index value. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read or write fails, or a codec
    /// error if the stored set cannot be re-encoded.
    pub fn add(
        table: &mut Table<'_, &'static str, &'static [u8]>,
        index_value: &str,
        id: &str,
    ) -> Result<()> {
        let mut set: IdSet = match table.get(index_value).context(StorageSnafu)? {
            Some(data) => decode(data.value()).context(CodecSnafu)?,
            None => IdSet::default(),
        };

        if let Err(pos) = set.ids.binary_search_by(|existing| existing.as_str().cmp(id)) {
            set.ids.insert(pos, id.to_string());
            let encoded = encode(&set).context(CodecSnafu)?;
            table.insert(index_value, encoded.as_slice()).context(StorageSnafu)?;
        }

        Ok(())
    }

    /// Removes a record key from under an index value.
    ///
    /// Removing a key that was never filed is a no-op; the row disappears
    /// once its set empties.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read or write fails, or a codec
    /// error if the stored set cannot be re-encoded.
    pub fn remove(
        table: &mut Table<'_, &'static str, &'static [u8]>,
        index_value: &str,
        id: &str,
    ) -> Result<()> {
        let existing: Option<IdSet> = match table.get(index_value).context(StorageSnafu)? {
            Some(data) => Some(decode(data.value()).context(CodecSnafu)?),
            None => None,
        };

        let Some(mut set) = existing else {
            return Ok(());
        };

        set.ids.retain(|existing| existing != id);

        if set.ids.is_empty() {
            table.remove(index_value).context(StorageSnafu)?;
        } else {
            let encoded = encode(&set).context(CodecSnafu)?;
            table.insert(index_value, encoded.as_slice()).context(StorageSnafu)?;
        }

        Ok(())
    }

    /// Returns the record keys filed under an index value.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails, or a codec error if the
    /// stored set cannot be decoded.
    pub fn get(
        table: &ReadOnlyTable<&'static str, &'static [u8]>,
        index_value: &str,
    ) -> Result<Vec<String>> {
        match table.get(index_value).context(StorageSnafu)? {
            Some(data) => {
                let set: IdSet = decode(data.value()).context(CodecSnafu)?;
                Ok(set.ids)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Returns the number of record keys filed under an index value.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails, or a codec error if the
    /// stored set cannot be decoded.
    pub fn count(
        table: &ReadOnlyTable<&'static str, &'static [u8]>,
        index_value: &str,
    ) -> Result<usize> {
        Ok(Self::get(table, index_value)?.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use buddydesk_store::{StorageEngine, Tables};

    use super::*;

    #[test]
    fn test_add_get_remove_round_trip() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::MENTEES_BY_BUDDY).expect("open table");
                IndexManager::add(&mut table, "User#buddy@example.com", "Mentee#m1").expect("add");
                IndexManager::add(&mut table, "User#buddy@example.com", "Mentee#m2").expect("add");
            }
            txn.commit().expect("commit");
        }

        {
            let txn = db.begin_read().expect("begin read");
            let table = txn.open_table(Tables::MENTEES_BY_BUDDY).expect("open table");
            let ids = IndexManager::get(&table, "User#buddy@example.com").expect("get");
            assert_eq!(ids, vec!["Mentee#m1".to_string(), "Mentee#m2".to_string()]);
            assert_eq!(IndexManager::count(&table, "User#buddy@example.com").expect("count"), 2);
        }

        {
            let txn = db.begin_write().expect("begin write");
            {
                let mut table = txn.open_table(Tables::MENTEES_BY_BUDDY).expect("open table");
                IndexManager::remove(&mut table, "User#buddy@example.com", "Mentee#m1")
                    .expect("remove");
            }
            txn.commit().expect("commit");
        }

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::MENTEES_BY_BUDDY).expect("open table");
        let ids = IndexManager::get(&table, "User#buddy@example.com").expect("get");
        assert_eq!(ids, vec!["Mentee#m2".to_string()]);
    }

    #[test]
    fn test_duplicate_add_is_idempotent() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        let txn = db.begin_write().expect("begin write");
        {
            let mut table = txn.open_table(Tables::MENTEE_BY_EMAIL).expect("open table");
            IndexManager::add(&mut table, "m@example.com", "Mentee#m1").expect("add");
            IndexManager::add(&mut table, "m@example.com", "Mentee#m1").expect("add");
        }
        txn.commit().expect("commit");

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::MENTEE_BY_EMAIL).expect("open table");
        assert_eq!(IndexManager::count(&table, "m@example.com").expect("count"), 1);
    }

    #[test]
    fn test_row_vanishes_when_set_empties() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        let txn = db.begin_write().expect("begin write");
        {
            let mut table = txn.open_table(Tables::ASSETS_BY_OWNER).expect("open table");
            IndexManager::add(&mut table, "User#o@example.com", "Asset#a1").expect("add");
            IndexManager::remove(&mut table, "User#o@example.com", "Asset#a1").expect("remove");
        }
        txn.commit().expect("commit");

        let txn = db.begin_read().expect("begin read");
        let table = txn.open_table(Tables::ASSETS_BY_OWNER).expect("open table");
        assert!(table.get("User#o@example.com").expect("get").is_none());
    }

    #[test]
    fn test_remove_unknown_value_is_noop() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let db = engine.db();

        let txn = db.begin_write().expect("begin write");
        {
            let mut table = txn.open_table(Tables::MENTEES_BY_BUDDY).expect("open table");
            IndexManager::remove(&mut table, "User#nobody@example.com", "Mentee#m1")
                .expect("remove");
        }
        txn.commit().expect("commit");
    }
}
