//! Core types for the buddydesk registry.
//!
//! This crate provides the foundational types used throughout buddydesk:
//! - String identifier newtypes (UserId, MenteeId, NoteId, AssetId)
//! - Record key encoding for the composite-key document layout
//! - The ordered role hierarchy and the mentee status lifecycle
//! - Record and input structs for users, mentees, notes, and assets
//! - JSON codec, input validation, and configuration

#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod ids;
pub mod keys;
pub mod records;
pub mod role;
pub mod status;
pub mod validation;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode, encode};
pub use config::{PasswordConfig, RegistryConfig, ValidationConfig};
pub use ids::{AssetId, MenteeId, NoteId, UserId};
pub use keys::{SortKey, mentee_partition, parse_mentee_partition};
pub use records::{Asset, Mentee, NewAsset, NewMentee, NewUser, Note, PasswordRecord, User};
pub use role::Role;
pub use status::MenteeStatus;
pub use validation::ValidationError;
