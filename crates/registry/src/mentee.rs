//! Mentee and note store.
//!
//! Mentees and their notes share one table with a composite `(pk, sk)`
//! key: the partition key is `Mentee#<id>`, the mentee's own record sits
//! at `pk == sk`, and notes sit at `Note#<id>` sort keys. One range scan
//! per partition returns the mentee followed by all of its notes.
//!
//! Two secondary indexes are maintained alongside the primary record:
//! buddy id → mentee partition keys, and lowercased email → mentee
//! partition keys (the uniqueness check reads the latter).

use buddydesk_store::{StorageEngine, Tables};
use buddydesk_types::{
    Mentee, MenteeId, MenteeStatus, NewMentee, Note, NoteId, RegistryConfig, SortKey, UserId,
    decode, encode,
    keys::NOTE_PREFIX,
    mentee_partition,
    validation::{validate_email, validate_name, validate_note_content},
};
use chrono::Utc;
use redb::ReadableTable;
use snafu::ResultExt;

use crate::error::{
    CodecSnafu, CommitSnafu, RegistryError, Result, StorageSnafu, TableSnafu, TransactionSnafu,
    ValidationSnafu,
};
use crate::index::IndexManager;

/// Store for mentee records and their co-located notes.
#[derive(Clone)]
pub struct MenteeStore {
    engine: StorageEngine,
    config: RegistryConfig,
}

impl MenteeStore {
    pub(crate) fn new(engine: StorageEngine, config: RegistryConfig) -> Self {
        Self { engine, config }
    }

    // =========================================================================
    // Mentee Operations
    // =========================================================================

    /// Creates a mentee.
    ///
    /// Generates a fresh opaque identifier, forces the initial status to
    /// [`MenteeStatus::Assigned`] regardless of caller intent, and
    /// lowercases the email. The record and both index entries are
    /// persisted in one transaction; the stored record is then re-read and
    /// returned.
    ///
    /// Email uniqueness is not enforced here; callers check it via
    /// [`MenteeStore::is_email_unique`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input, a storage error if
    /// persistence fails, or [`RegistryError::ReadBack`] if the fresh
    /// record cannot be re-read.
    pub fn create_mentee(&self, new_mentee: NewMentee) -> Result<Mentee> {
        let limits = &self.config.validation;
        validate_email("email", &new_mentee.email, limits).context(ValidationSnafu)?;
        validate_name("country_code", &new_mentee.country_code, limits).context(ValidationSnafu)?;
        validate_name("home_university", &new_mentee.home_university, limits)
            .context(ValidationSnafu)?;
        validate_name("host_faculty", &new_mentee.host_faculty, limits).context(ValidationSnafu)?;

        let mentee = Mentee {
            id: MenteeId::generate(),
            buddy_id: new_mentee.buddy_id,
            country_code: new_mentee.country_code,
            home_university: new_mentee.home_university,
            host_faculty: new_mentee.host_faculty,
            email: new_mentee.email.to_lowercase(),
            gender: new_mentee.gender,
            degree: new_mentee.degree,
            agreement_start: new_mentee.agreement_start,
            agreement_end: new_mentee.agreement_end,
            status: MenteeStatus::Assigned,
        };

        let pk = mentee_partition(&mentee.id);
        let doc = encode(&mentee).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            mentees.insert((pk.as_str(), pk.as_str()), doc.as_slice()).context(StorageSnafu)?;

            let mut by_buddy = txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
            IndexManager::add(&mut by_buddy, mentee.buddy_id.as_str(), &pk)?;

            let mut by_email = txn.open_table(Tables::MENTEE_BY_EMAIL).context(TableSnafu)?;
            IndexManager::add(&mut by_email, &mentee.email, &pk)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(mentee_id = %mentee.id, buddy_id = %mentee.buddy_id, "created mentee");

        // Read-after-write: return the canonical stored record.
        match self.get_mentee_by_id(&mentee.id)? {
            Some(stored) => Ok(stored),
            None => Err(RegistryError::ReadBack { key: pk }),
        }
    }

    /// Returns a mentee by identifier.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails or a codec error if the
    /// stored record cannot be decoded.
    pub fn get_mentee_by_id(&self, id: &MenteeId) -> Result<Option<Mentee>> {
        let pk = mentee_partition(id);

        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        match mentees.get((pk.as_str(), pk.as_str())).context(StorageSnafu)? {
            Some(data) => {
                let mentee = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(mentee))
            }
            None => Ok(None),
        }
    }

    /// Lists all mentees.
    ///
    /// Scans the collection and keeps the rows where `pk == sk`, skipping
    /// every note.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails or a codec error if any
    /// mentee record cannot be decoded.
    pub fn get_all_mentees(&self) -> Result<Vec<Mentee>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        let mut records = Vec::new();
        for result in mentees.iter().context(StorageSnafu)? {
            let (key, value) = result.context(StorageSnafu)?;
            let (pk, sk) = key.value();
            if pk != sk {
                continue;
            }
            let mentee: Mentee = decode(value.value()).context(CodecSnafu)?;
            records.push(mentee);
        }
        Ok(records)
    }

    /// Lists the mentees assigned to a buddy, via the buddy index.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a read fails or a codec error if a
    /// record cannot be decoded.
    pub fn get_mentee_list_items(&self, buddy_id: &UserId) -> Result<Vec<Mentee>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let by_buddy = txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        let mut records = Vec::new();
        for pk in IndexManager::get(&by_buddy, buddy_id.as_str())? {
            if let Some(data) = mentees.get((pk.as_str(), pk.as_str())).context(StorageSnafu)? {
                let mentee: Mentee = decode(data.value()).context(CodecSnafu)?;
                records.push(mentee);
            }
        }
        Ok(records)
    }

    /// Returns the number of mentees assigned to a buddy.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the index read fails.
    pub fn get_mentee_count(&self, buddy_id: &UserId) -> Result<usize> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let by_buddy = txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
        IndexManager::count(&by_buddy, buddy_id.as_str())
    }

    /// Replaces a mentee record wholesale, preserving its identifier and
    /// key structure.
    ///
    /// The email is lowercased, and the buddy and email index entries are
    /// re-pointed in the same transaction when those fields changed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input or a storage error if
    /// the write fails.
    pub fn update_mentee(&self, mentee: &Mentee) -> Result<()> {
        let limits = &self.config.validation;
        validate_email("email", &mentee.email, limits).context(ValidationSnafu)?;
        validate_name("country_code", &mentee.country_code, limits).context(ValidationSnafu)?;

        let mut updated = mentee.clone();
        updated.email = updated.email.to_lowercase();

        let pk = mentee_partition(&updated.id);
        let doc = encode(&updated).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            let old: Option<Mentee> =
                match mentees.get((pk.as_str(), pk.as_str())).context(StorageSnafu)? {
                    Some(data) => Some(decode(data.value()).context(CodecSnafu)?),
                    None => None,
                };
            mentees.insert((pk.as_str(), pk.as_str()), doc.as_slice()).context(StorageSnafu)?;

            let mut by_buddy = txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
            let mut by_email = txn.open_table(Tables::MENTEE_BY_EMAIL).context(TableSnafu)?;
            match old {
                Some(old) => {
                    if old.buddy_id != updated.buddy_id {
                        IndexManager::remove(&mut by_buddy, old.buddy_id.as_str(), &pk)?;
                        IndexManager::add(&mut by_buddy, updated.buddy_id.as_str(), &pk)?;
                    }
                    if old.email != updated.email {
                        IndexManager::remove(&mut by_email, &old.email, &pk)?;
                        IndexManager::add(&mut by_email, &updated.email, &pk)?;
                    }
                }
                None => {
                    IndexManager::add(&mut by_buddy, updated.buddy_id.as_str(), &pk)?;
                    IndexManager::add(&mut by_email, &updated.email, &pk)?;
                }
            }
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(mentee_id = %updated.id, "updated mentee");
        Ok(())
    }

    /// Patches only the status field of a mentee.
    ///
    /// This is the sole partial-update path in the model. Any of the eight
    /// statuses may be set; no transition table is enforced here.
    ///
    /// Returns the updated record, or `Ok(None)` when the mentee does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read or write fails.
    pub fn update_mentee_status(
        &self,
        id: &MenteeId,
        status: MenteeStatus,
    ) -> Result<Option<Mentee>> {
        let pk = mentee_partition(id);

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        let updated = {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            let old: Option<Mentee> =
                match mentees.get((pk.as_str(), pk.as_str())).context(StorageSnafu)? {
                    Some(data) => Some(decode(data.value()).context(CodecSnafu)?),
                    None => None,
                };
            match old {
                Some(mut mentee) => {
                    mentee.status = status;
                    let doc = encode(&mentee).context(CodecSnafu)?;
                    mentees
                        .insert((pk.as_str(), pk.as_str()), doc.as_slice())
                        .context(StorageSnafu)?;
                    Some(mentee)
                }
                None => None,
            }
        };
        txn.commit().context(CommitSnafu)?;

        if updated.is_some() {
            tracing::info!(mentee_id = %id, status = %status, "updated mentee status");
        }
        Ok(updated)
    }

    /// Deletes a mentee together with all of its notes.
    ///
    /// The mentee record and its index entries go in one commit; each note
    /// is then deleted in its own commit with no rollback. A crash
    /// part-way leaves orphaned notes.
    ///
    /// # Errors
    ///
    /// Returns a storage error if any delete fails; a partially completed
    /// cascade is not reported distinctly.
    pub fn delete_mentee(&self, id: &MenteeId) -> Result<()> {
        let pk = mentee_partition(id);
        let old = self.get_mentee_by_id(id)?;
        let note_keys = self.note_sort_keys(&pk)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            mentees.remove((pk.as_str(), pk.as_str())).context(StorageSnafu)?;

            if let Some(old) = &old {
                let mut by_buddy = txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
                IndexManager::remove(&mut by_buddy, old.buddy_id.as_str(), &pk)?;

                let mut by_email = txn.open_table(Tables::MENTEE_BY_EMAIL).context(TableSnafu)?;
                IndexManager::remove(&mut by_email, &old.email, &pk)?;
            }
        }
        txn.commit().context(CommitSnafu)?;

        for sk in &note_keys {
            let txn = db.begin_write().context(TransactionSnafu)?;
            {
                let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
                mentees.remove((pk.as_str(), sk.as_str())).context(StorageSnafu)?;
            }
            txn.commit().context(CommitSnafu)?;
        }

        tracing::info!(mentee_id = %id, notes = note_keys.len(), "deleted mentee");
        Ok(())
    }

    /// Returns true when no mentee carries the given email.
    ///
    /// The email is lowercased before the index lookup, matching the
    /// normalization applied on creation.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the index read fails.
    pub fn is_email_unique(&self, email: &str) -> Result<bool> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let by_email = txn.open_table(Tables::MENTEE_BY_EMAIL).context(TableSnafu)?;
        Ok(IndexManager::count(&by_email, &email.to_lowercase())? == 0)
    }

    // =========================================================================
    // Note Operations
    // =========================================================================

    /// Creates a note under a mentee's partition.
    ///
    /// Stamps the creation timestamp; the update timestamp stays empty
    /// until the first edit. Authorization (see `can_mutate_note`) is the
    /// caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected content or a storage error
    /// if the write fails.
    pub fn create_note(
        &self,
        mentee_id: &MenteeId,
        author_id: &UserId,
        content: &str,
    ) -> Result<Note> {
        validate_note_content(content, &self.config.validation).context(ValidationSnafu)?;

        let note = Note {
            id: NoteId::generate(),
            content: content.to_string(),
            author_id: author_id.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let pk = mentee_partition(mentee_id);
        let sk = SortKey::Note(note.id.clone()).encode();
        let doc = encode(&note).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            mentees.insert((pk.as_str(), sk.as_str()), doc.as_slice()).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(mentee_id = %mentee_id, note_id = %note.id, "created note");
        Ok(note)
    }

    /// Returns a single note from a mentee's partition.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails or a codec error if the
    /// stored record cannot be decoded.
    pub fn get_note(&self, mentee_id: &MenteeId, note_id: &NoteId) -> Result<Option<Note>> {
        let pk = mentee_partition(mentee_id);
        let sk = SortKey::Note(note_id.clone()).encode();

        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        match mentees.get((pk.as_str(), sk.as_str())).context(StorageSnafu)? {
            Some(data) => {
                let note = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    /// Lists all notes of a mentee via a prefix range over the partition.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails or a codec error if any
    /// note cannot be decoded.
    pub fn get_notes_of_mentee(&self, mentee_id: &MenteeId) -> Result<Vec<Note>> {
        let pk = mentee_partition(mentee_id);

        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        let mut notes = Vec::new();
        for result in mentees.range((pk.as_str(), NOTE_PREFIX)..).context(StorageSnafu)? {
            let (key, value) = result.context(StorageSnafu)?;
            let (row_pk, row_sk) = key.value();
            if row_pk != pk.as_str() || !row_sk.starts_with(NOTE_PREFIX) {
                break;
            }
            let note: Note = decode(value.value()).context(CodecSnafu)?;
            notes.push(note);
        }
        Ok(notes)
    }

    /// Replaces a note's content, always stamping the update timestamp.
    ///
    /// Returns the updated note, or `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected content or a storage error
    /// if the read or write fails.
    pub fn update_note(
        &self,
        mentee_id: &MenteeId,
        note_id: &NoteId,
        content: &str,
    ) -> Result<Option<Note>> {
        validate_note_content(content, &self.config.validation).context(ValidationSnafu)?;

        let pk = mentee_partition(mentee_id);
        let sk = SortKey::Note(note_id.clone()).encode();

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        let updated = {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            let old: Option<Note> =
                match mentees.get((pk.as_str(), sk.as_str())).context(StorageSnafu)? {
                    Some(data) => Some(decode(data.value()).context(CodecSnafu)?),
                    None => None,
                };
            match old {
                Some(mut note) => {
                    note.content = content.to_string();
                    note.updated_at = Some(Utc::now());
                    let doc = encode(&note).context(CodecSnafu)?;
                    mentees
                        .insert((pk.as_str(), sk.as_str()), doc.as_slice())
                        .context(StorageSnafu)?;
                    Some(note)
                }
                None => None,
            }
        };
        txn.commit().context(CommitSnafu)?;

        Ok(updated)
    }

    /// Deletes a single note from a mentee's partition.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn delete_note(&self, mentee_id: &MenteeId, note_id: &NoteId) -> Result<()> {
        let pk = mentee_partition(mentee_id);
        let sk = SortKey::Note(note_id.clone()).encode();

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            mentees.remove((pk.as_str(), sk.as_str())).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(mentee_id = %mentee_id, note_id = %note_id, "deleted note");
        Ok(())
    }

    /// Collects the sort keys of every note in a partition.
    fn note_sort_keys(&self, pk: &str) -> Result<Vec<String>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let mentees = txn.open_table(Tables::MENTEES).context(TableSnafu)?;

        let mut keys = Vec::new();
        for result in mentees.range((pk, NOTE_PREFIX)..).context(StorageSnafu)? {
            let (key, _) = result.context(StorageSnafu)?;
            let (row_pk, row_sk) = key.value();
            if row_pk != pk || !row_sk.starts_with(NOTE_PREFIX) {
                break;
            }
            keys.push(row_sk.to_string());
        }
        Ok(keys)
    }
}
