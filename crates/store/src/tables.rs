//! Table definitions for redb storage.
//!
//! All record values are serialized documents; key encoding is handled by
//! the `buddydesk-types` keys module. Secondary index tables map an index
//! value to a serialized id set and are maintained in the same write
//! transaction as the primary record.

use redb::TableDefinition;

/// Table definitions for registry storage.
pub struct Tables;

impl Tables {
    // =========================================================================
    // Identity Tables
    // =========================================================================

    /// User records: `User#<email>` → serialized User
    pub const USERS: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("users");

    /// Password records, keyed identically to the owning user:
    /// `User#<email>` → serialized PasswordRecord
    pub const PASSWORDS: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("passwords");

    // =========================================================================
    // Mentee Collection (composite key)
    // =========================================================================

    /// Mentee partition: `(pk, sk)` → serialized Mentee or Note
    /// where pk = `Mentee#<id>` and sk = `Mentee#<id>` (own record, pk == sk)
    /// or `Note#<id>`. Tuple keys order component-wise, so one range scan
    /// per partition returns the mentee record followed by its notes.
    pub const MENTEES: TableDefinition<'static, (&'static str, &'static str), &'static [u8]> =
        TableDefinition::new("mentees");

    // =========================================================================
    // Index Tables
    // =========================================================================

    /// Buddy index: `User#<email>` → serialized set of mentee partition keys
    pub const MENTEES_BY_BUDDY: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("mentees_by_buddy");

    /// Email index: lowercased mentee email → serialized set of mentee
    /// partition keys
    pub const MENTEE_BY_EMAIL: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("mentee_by_email");

    // =========================================================================
    // Asset Tables
    // =========================================================================

    /// Asset records: `Asset#<id>` → serialized Asset
    pub const ASSETS: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("assets");

    /// Owner index: `User#<email>` → serialized set of asset keys
    pub const ASSETS_BY_OWNER: TableDefinition<'static, &'static str, &'static [u8]> =
        TableDefinition::new("assets_by_owner");
}

#[cfg(test)]
mod tests {
    use redb::TableHandle;

    use super::*;

    #[test]
    fn test_table_names_unique() {
        let names = [
            Tables::USERS.name(),
            Tables::PASSWORDS.name(),
            Tables::MENTEES.name(),
            Tables::MENTEES_BY_BUDDY.name(),
            Tables::MENTEE_BY_EMAIL.name(),
            Tables::ASSETS.name(),
            Tables::ASSETS_BY_OWNER.name(),
        ];

        let mut sorted = names.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len(), "Table names must be unique");
    }
}
