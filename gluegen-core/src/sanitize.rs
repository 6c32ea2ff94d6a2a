//! Removal of server-assigned and non-portable fields from catalog records.

use crate::models::{CatalogRecord, SanitizedRecord};

/// Top-level fields the catalog assigns on its own. Carrying them into a
/// template would either be rejected on deploy or pin values that belong to
/// the source account.
pub const VOLATILE_FIELDS: [&str; 8] = [
    "CreateTime",
    "CreateTableDefaultPermissions",
    "UpdateTime",
    "LastAccessTime",
    "CreatedBy",
    "Owner",
    "IsRegisteredWithLakeFormation",
    "Retention",
];

/// Strips [`VOLATILE_FIELDS`] from the record's top level.
///
/// Absent fields are ignored and nested values are left untouched, so the
/// operation is idempotent.
pub fn sanitize(record: CatalogRecord) -> SanitizedRecord {
    let mut fields = record.into_fields();
    for key in VOLATILE_FIELDS {
        if fields.remove(key).is_some() {
            tracing::trace!("Dropped volatile field {}", key);
        }
    }
    SanitizedRecord::from_fields(fields)
}
