//! Identity store: user records and their separately stored credentials.
//!
//! User identifiers are derived from lowercased emails, so by-email and
//! by-id lookups always agree and no secondary index is needed. Passwords
//! live in their own table under the same key; only the bcrypt hash is
//! ever stored, and verification goes through `bcrypt::verify`.

use buddydesk_store::{StorageEngine, Tables};
use buddydesk_types::{
    NewUser, PasswordRecord, RegistryConfig, User, UserId, ValidationError, decode, encode,
    validation::{validate_email, validate_name},
};
use redb::ReadableTable;
use snafu::ResultExt;

use crate::error::{
    CodecSnafu, CommitSnafu, HashSnafu, RegistryError, Result, StorageSnafu, TableSnafu,
    TransactionSnafu, ValidationSnafu,
};

/// Store for user and password records.
#[derive(Clone)]
pub struct IdentityStore {
    engine: StorageEngine,
    config: RegistryConfig,
}

impl IdentityStore {
    pub(crate) fn new(engine: StorageEngine, config: RegistryConfig) -> Self {
        Self { engine, config }
    }

    /// Creates a user together with its hashed credential.
    ///
    /// The email is lowercased, the identifier derived from it, and the
    /// password bcrypt-hashed at the configured cost. After the write the
    /// record is immediately re-read and returned; a failed read-back is
    /// an internal-consistency fault, not absence.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input, a hash error if
    /// bcrypt fails, a storage error if persistence fails, or
    /// [`RegistryError::ReadBack`] if the fresh record cannot be re-read.
    pub fn create_user(&self, new_user: NewUser, password: &str) -> Result<User> {
        self.validate_user_fields(&new_user.email, &new_user.first_name, &new_user.last_name)?;
        if password.is_empty() {
            return Err(RegistryError::Validation {
                source: ValidationError {
                    field: "password".to_string(),
                    constraint: "must not be empty".to_string(),
                },
            });
        }

        let email = new_user.email.to_lowercase();
        let id = UserId::from_email(&email);
        let user = User {
            id: id.clone(),
            email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            faculty: new_user.faculty,
            role: new_user.role,
            agreement_start: new_user.agreement_start,
            agreement_end: new_user.agreement_end,
        };

        let hash = bcrypt::hash(password, self.config.password.cost).context(HashSnafu)?;
        let password_doc = encode(&PasswordRecord { hash }).context(CodecSnafu)?;
        let user_doc = encode(&user).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut passwords = txn.open_table(Tables::PASSWORDS).context(TableSnafu)?;
            passwords.insert(id.as_str(), password_doc.as_slice()).context(StorageSnafu)?;

            let mut users = txn.open_table(Tables::USERS).context(TableSnafu)?;
            users.insert(id.as_str(), user_doc.as_slice()).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(user_id = %id, role = %user.role, "created user");

        // Read-after-write: return the canonical stored record.
        match self.get_user_by_id(&id)? {
            Some(stored) => Ok(stored),
            None => Err(RegistryError::ReadBack { key: id.as_str().to_string() }),
        }
    }

    /// Returns a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails or a codec error if the
    /// stored record cannot be decoded.
    pub fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let users = txn.open_table(Tables::USERS).context(TableSnafu)?;

        match users.get(id.as_str()).context(StorageSnafu)? {
            Some(data) => {
                let user = decode(data.value()).context(CodecSnafu)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Returns a user by email address.
    ///
    /// Derives the identifier from the lowercased email and delegates, so
    /// this always agrees with [`IdentityStore::get_user_by_id`].
    ///
    /// # Errors
    ///
    /// Same as [`IdentityStore::get_user_by_id`].
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_id(&UserId::from_email(email))
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the scan fails or a codec error if any
    /// stored record cannot be decoded.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let users = txn.open_table(Tables::USERS).context(TableSnafu)?;

        let mut records = Vec::new();
        for result in users.iter().context(StorageSnafu)? {
            let (_, value) = result.context(StorageSnafu)?;
            let user: User = decode(value.value()).context(CodecSnafu)?;
            records.push(user);
        }
        Ok(records)
    }

    /// Verifies a login attempt.
    ///
    /// Returns the user only when the stored hash verifies against the
    /// supplied plaintext. An unknown email and a wrong password both
    /// return `Ok(None)`; callers cannot tell the two apart, so a failed
    /// login never confirms whether an account exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a read fails, a codec error if a stored
    /// record cannot be decoded, or a hash error if the stored hash is
    /// malformed.
    pub fn verify_login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let id = UserId::from_email(email);

        let db = self.engine.db();
        let txn = db.begin_read().context(TransactionSnafu)?;
        let users = txn.open_table(Tables::USERS).context(TableSnafu)?;
        let passwords = txn.open_table(Tables::PASSWORDS).context(TableSnafu)?;

        let user: User = match users.get(id.as_str()).context(StorageSnafu)? {
            Some(data) => decode(data.value()).context(CodecSnafu)?,
            None => return Ok(None),
        };
        let record: PasswordRecord = match passwords.get(id.as_str()).context(StorageSnafu)? {
            Some(data) => decode(data.value()).context(CodecSnafu)?,
            None => return Ok(None),
        };

        if bcrypt::verify(password, &record.hash).context(HashSnafu)? {
            Ok(Some(user))
        } else {
            tracing::debug!(user_id = %id, "login verification failed");
            Ok(None)
        }
    }

    /// Replaces a user record wholesale.
    ///
    /// The identifier must still equal `User#<lowercased email>`; a record
    /// whose email disagrees with its id is rejected rather than written
    /// under a stale key.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected input or a storage error if
    /// the write fails.
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.validate_user_fields(&user.email, &user.first_name, &user.last_name)?;
        if user.id != UserId::from_email(&user.email) {
            return Err(RegistryError::Validation {
                source: ValidationError {
                    field: "email".to_string(),
                    constraint: "does not match the user identifier".to_string(),
                },
            });
        }

        let user_doc = encode(user).context(CodecSnafu)?;

        let db = self.engine.db();
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut users = txn.open_table(Tables::USERS).context(TableSnafu)?;
            users.insert(user.id.as_str(), user_doc.as_slice()).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(user_id = %user.id, "updated user");
        Ok(())
    }

    /// Deletes a user and its password record.
    ///
    /// The two deletes are independent commits with no rollback: a crash
    /// between them leaves a dangling password record. Authorization is
    /// the caller's responsibility (see `check_delete_user`).
    ///
    /// # Errors
    ///
    /// Returns a storage error if either delete fails; a partially
    /// completed delete is not reported distinctly.
    pub fn delete_user(&self, id: &UserId) -> Result<()> {
        let db = self.engine.db();

        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut users = txn.open_table(Tables::USERS).context(TableSnafu)?;
            users.remove(id.as_str()).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            let mut passwords = txn.open_table(Tables::PASSWORDS).context(TableSnafu)?;
            passwords.remove(id.as_str()).context(StorageSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;

        tracing::info!(user_id = %id, "deleted user");
        Ok(())
    }

    /// Deletes a user addressed by email address.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityStore::delete_user`].
    pub fn delete_user_by_email(&self, email: &str) -> Result<()> {
        self.delete_user(&UserId::from_email(email))
    }

    fn validate_user_fields(&self, email: &str, first_name: &str, last_name: &str) -> Result<()> {
        let limits = &self.config.validation;
        validate_email("email", email, limits).context(ValidationSnafu)?;
        validate_name("first_name", first_name, limits).context(ValidationSnafu)?;
        validate_name("last_name", last_name, limits).context(ValidationSnafu)?;
        Ok(())
    }
}
