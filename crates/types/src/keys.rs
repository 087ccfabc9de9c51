//! Record key encoding for the document layout.
//!
//! The store co-locates a mentee with its notes in a single logical
//! partition: the partition key is `Mentee#<id>`, the mentee's own record
//! sits at sort key `Mentee#<id>` (so `pk == sk`), and each note sits at
//! `Note#<id>`. Because `"Mentee#..."` sorts before `"Note#..."`, a single
//! range scan over a partition yields the mentee record followed by all of
//! its notes.
//!
//! All string-format knowledge for keys lives in this module. Identifier
//! wire formats:
//! - user: `User#<lowercased-email>`
//! - mentee partition: `Mentee#<opaque-id>`
//! - note sort key: `Note#<opaque-id>`
//! - asset: `Asset#<opaque-id>`

use crate::ids::{AssetId, MenteeId, NoteId};

/// Prefix for user identifiers and user/password primary keys.
pub const USER_PREFIX: &str = "User#";

/// Prefix for mentee partition keys and mentee sort keys.
pub const MENTEE_PREFIX: &str = "Mentee#";

/// Prefix for note sort keys within a mentee partition.
pub const NOTE_PREFIX: &str = "Note#";

/// Prefix for asset primary keys.
pub const ASSET_PREFIX: &str = "Asset#";

/// Encodes the partition key for a mentee.
///
/// Pattern: `Mentee#<id>`
pub fn mentee_partition(id: &MenteeId) -> String {
    format!("{MENTEE_PREFIX}{id}")
}

/// Parses a mentee identifier from a partition key.
///
/// Returns `None` if the key doesn't match the expected pattern.
pub fn parse_mentee_partition(key: &str) -> Option<MenteeId> {
    key.strip_prefix(MENTEE_PREFIX).map(MenteeId::new)
}

/// Encodes the primary key for an asset.
///
/// Pattern: `Asset#<id>`
pub fn asset_key(id: &AssetId) -> String {
    format!("{ASSET_PREFIX}{id}")
}

/// Parses an asset identifier from a primary key.
pub fn parse_asset_key(key: &str) -> Option<AssetId> {
    key.strip_prefix(ASSET_PREFIX).map(AssetId::new)
}

/// Tagged sort key within a mentee partition.
///
/// Distinguishes the mentee's own record (`pk == sk`) from its notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// The mentee record itself; encodes identically to the partition key.
    Mentee(MenteeId),
    /// A note under the partition.
    Note(NoteId),
}

impl SortKey {
    /// Serializes the sort key to its wire format.
    pub fn encode(&self) -> String {
        match self {
            Self::Mentee(id) => format!("{MENTEE_PREFIX}{id}"),
            Self::Note(id) => format!("{NOTE_PREFIX}{id}"),
        }
    }

    /// Parses a sort key from its wire format.
    ///
    /// Returns `None` for keys outside the partition's key scheme.
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(id) = key.strip_prefix(MENTEE_PREFIX) {
            return Some(Self::Mentee(MenteeId::new(id)));
        }
        if let Some(id) = key.strip_prefix(NOTE_PREFIX) {
            return Some(Self::Note(NoteId::new(id)));
        }
        None
    }

    /// Returns true when this sort key addresses a note record.
    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note(_))
    }
}
