//! Error types for registry operations.

use buddydesk_types::{CodecError, ValidationError};
use snafu::Snafu;

/// Errors returned by registry store operations.
///
/// Absence on a point lookup is never an error; lookups return
/// `Ok(None)`. These variants cover store faults, codec faults, rejected
/// input, and the read-back consistency check after creation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RegistryError {
    /// Opening the storage engine failed.
    #[snafu(display("Engine error: {source}"))]
    Engine {
        /// The underlying engine error.
        source: buddydesk_store::EngineError,
    },

    /// Beginning a transaction failed.
    #[snafu(display("Transaction error: {source}"))]
    Transaction {
        /// The underlying redb error.
        source: redb::TransactionError,
    },

    /// Opening a table failed.
    #[snafu(display("Table error: {source}"))]
    Table {
        /// The underlying redb error.
        source: redb::TableError,
    },

    /// A read or write inside a transaction failed.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// The underlying redb error.
        source: redb::StorageError,
    },

    /// Committing a transaction failed.
    #[snafu(display("Commit error: {source}"))]
    Commit {
        /// The underlying redb error.
        source: redb::CommitError,
    },

    /// Serialization or deserialization of a document failed.
    #[snafu(display("Codec error: {source}"))]
    Codec {
        /// The underlying codec error.
        source: CodecError,
    },

    /// Password hashing or verification failed.
    #[snafu(display("Credential hashing error: {source}"))]
    Hash {
        /// The underlying bcrypt error.
        source: bcrypt::BcryptError,
    },

    /// Caller-supplied input was rejected.
    #[snafu(display("Invalid input: {source}"))]
    Validation {
        /// The violated constraint.
        source: ValidationError,
    },

    /// A freshly written record could not be re-read.
    ///
    /// This is an internal-consistency fault: the store accepted the write
    /// but an immediate read returned nothing. It should not happen under
    /// a correctly functioning store.
    #[snafu(display("Record at {key} could not be re-read after write"))]
    ReadBack {
        /// The key whose read-back failed.
        key: String,
    },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
