//! Projection of staged catalog records into deployment templates.
//!
//! Each object kind has a fixed allow-list mapping a record key to the place
//! in the template where its value lands. The lists encode the shape the
//! downstream CloudFormation templates expect:
//!
//! | Kind     | Record key          | Template path                                                  |
//! |----------|---------------------|----------------------------------------------------------------|
//! | database | `Name`              | `Parameters.Name.Default`                                      |
//! | database | `Description`       | `Parameters.Description.Default`                               |
//! | database | `Parameters`        | `Resources.GlueDatabase.Properties.DatabaseInput.Parameters`   |
//! | table    | `Name`              | `Parameters.Name.Default`                                      |
//! | table    | `Description`       | `Parameters.Description.Default`                               |
//! | table    | `TableType`         | `Parameters.TableType.Default`                                 |
//! | table    | `DatabaseName`      | `Parameters.GlueDatabase.Default`                              |
//! | table    | `PartitionKeys`     | `Resources.GlueTable.Properties.TableInput.PartitionKeys`      |
//! | table    | `StorageDescriptor` | `Resources.GlueTable.Properties.TableInput.StorageDescriptor`  |
//! | table    | `Parameters`        | `Resources.GlueTable.Properties.TableInput.Parameters`         |
//!
//! Keys outside the list are reported and dropped; the merge never fails
//! because of them.

use crate::Result;
use crate::config::WorkspaceLayout;
use crate::error::GlueGenError;
use crate::models::{ObjectKind, SanitizedRecord, TemplateDocument};
use crate::output::{load_json, save_json};
use crate::staging::ScratchArea;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where one recognized record key is written in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Top-level key of the staged record
    pub key: &'static str,
    /// Object path inside the template
    pub path: &'static [&'static str],
}

const fn field(key: &'static str, path: &'static [&'static str]) -> FieldMapping {
    FieldMapping { key, path }
}

/// Allow-list for database templates.
pub const DATABASE_FIELDS: &[FieldMapping] = &[
    field("Name", &["Parameters", "Name", "Default"]),
    field("Description", &["Parameters", "Description", "Default"]),
    field(
        "Parameters",
        &["Resources", "GlueDatabase", "Properties", "DatabaseInput", "Parameters"],
    ),
];

/// Allow-list for table templates.
pub const TABLE_FIELDS: &[FieldMapping] = &[
    field("Name", &["Parameters", "Name", "Default"]),
    field("Description", &["Parameters", "Description", "Default"]),
    field("TableType", &["Parameters", "TableType", "Default"]),
    field("DatabaseName", &["Parameters", "GlueDatabase", "Default"]),
    field(
        "PartitionKeys",
        &["Resources", "GlueTable", "Properties", "TableInput", "PartitionKeys"],
    ),
    field(
        "StorageDescriptor",
        &["Resources", "GlueTable", "Properties", "TableInput", "StorageDescriptor"],
    ),
    field(
        "Parameters",
        &["Resources", "GlueTable", "Properties", "TableInput", "Parameters"],
    ),
];

/// Allow-list for `kind`.
pub const fn field_mappings(kind: ObjectKind) -> &'static [FieldMapping] {
    match kind {
        ObjectKind::Database => DATABASE_FIELDS,
        ObjectKind::Table => TABLE_FIELDS,
    }
}

/// Template path for `key`, or `None` if the key is not recognized for `kind`.
pub fn destination(kind: ObjectKind, key: &str) -> Option<&'static [&'static str]> {
    field_mappings(kind)
        .iter()
        .find(|mapping| mapping.key == key)
        .map(|mapping| mapping.path)
}

/// Result of projecting one record into a template.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The template with recognized fields overwritten
    pub template: TemplateDocument,
    /// Record keys that were written
    pub applied: Vec<String>,
    /// Record keys with no destination; dropped
    pub unrecognized: Vec<String>,
}

/// Writes every recognized field of `record` into `template`.
///
/// `template_path` only labels errors.
///
/// # Errors
/// [`GlueGenError::TemplateShape`] when a non-object value sits on a
/// destination path.
pub fn apply_record(
    kind: ObjectKind,
    mut template: TemplateDocument,
    record: &SanitizedRecord,
    template_path: &Path,
) -> Result<MergeOutcome> {
    let mut applied = Vec::new();
    let mut unrecognized = Vec::new();

    for (key, value) in record.iter() {
        let Some(path) = destination(kind, key) else {
            warn!("Couldn't find key {} in {} template", key, kind);
            unrecognized.push(key.clone());
            continue;
        };

        template
            .set_path(path, value.clone())
            .map_err(|blocked| GlueGenError::TemplateShape {
                template: template_path.to_path_buf(),
                path: blocked,
            })?;
        applied.push(key.clone());
    }

    Ok(MergeOutcome {
        template,
        applied,
        unrecognized,
    })
}

/// A template written to the output area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTemplate {
    /// Scratch name the template was generated from
    pub name: String,
    /// Written `.template` file
    pub output: PathBuf,
    /// Record keys that were dropped
    pub unrecognized: Vec<String>,
}

/// Merges staged records of one kind into a generic template.
pub struct TemplateMerger<'a> {
    kind: ObjectKind,
    scratch: &'a ScratchArea,
    layout: &'a WorkspaceLayout,
}

impl<'a> TemplateMerger<'a> {
    /// Merger for `kind` reading from `scratch` and writing to the layout's output area.
    pub const fn new(kind: ObjectKind, scratch: &'a ScratchArea, layout: &'a WorkspaceLayout) -> Self {
        Self {
            kind,
            scratch,
            layout,
        }
    }

    /// Loads `template_path`, applies the record staged as `output_name`,
    /// and writes `output_dir/<output_name>.template`.
    ///
    /// # Errors
    /// [`GlueGenError::MissingStagedRecord`] when nothing was staged under
    /// `output_name`; no file is written in that case.
    pub async fn merge(&self, template_path: &Path, output_name: &str) -> Result<MergedTemplate> {
        let template: TemplateDocument = load_json(template_path).await?;
        let record = self.scratch.load(output_name).await?;

        let outcome = apply_record(self.kind, template, &record, template_path)?;
        debug!(
            "{}: applied {:?}, dropped {:?}",
            output_name, outcome.applied, outcome.unrecognized
        );

        let output = self.layout.template_output(output_name);
        save_json(&outcome.template, &output).await?;
        info!("Wrote {} template {}", self.kind, output.display());

        Ok(MergedTemplate {
            name: output_name.to_string(),
            output,
            unrecognized: outcome.unrecognized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogRecord;
    use crate::sanitize::sanitize;
    use serde_json::{Value, json};

    fn table_template() -> Value {
        json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Parameters": {
                "Name": {"Type": "String", "Default": ""},
                "Description": {"Type": "String", "Default": ""},
                "TableType": {"Type": "String", "Default": "EXTERNAL_TABLE"},
                "GlueDatabase": {"Type": "String", "Default": ""}
            },
            "Resources": {
                "GlueTable": {
                    "Type": "AWS::Glue::Table",
                    "Properties": {
                        "CatalogId": {"Ref": "AWS::AccountId"},
                        "DatabaseName": {"Ref": "GlueDatabase"},
                        "TableInput": {
                            "Name": {"Ref": "Name"},
                            "PartitionKeys": [],
                            "StorageDescriptor": {},
                            "Parameters": {}
                        }
                    }
                }
            }
        })
    }

    fn record(value: Value) -> SanitizedRecord {
        sanitize(CatalogRecord::from_value(value).expect("object record"))
    }

    #[test]
    fn test_allow_lists_have_unique_keys() {
        for kind in [ObjectKind::Database, ObjectKind::Table] {
            let mappings = field_mappings(kind);
            for (i, a) in mappings.iter().enumerate() {
                for b in mappings.iter().skip(i.saturating_add(1)) {
                    assert_ne!(a.key, b.key, "duplicate key for {}", kind);
                    assert_ne!(a.path, b.path, "duplicate path for {}", kind);
                }
            }
        }
    }

    #[test]
    fn test_destination_lookup() {
        assert_eq!(
            destination(ObjectKind::Table, "DatabaseName"),
            Some(&["Parameters", "GlueDatabase", "Default"][..])
        );
        assert_eq!(destination(ObjectKind::Database, "TableType"), None);
        assert_eq!(destination(ObjectKind::Table, "LocationUri"), None);
    }

    #[test]
    fn test_table_projection() {
        let staged = record(json!({
            "Name": "orders",
            "DatabaseName": "sales",
            "TableType": "EXTERNAL_TABLE",
            "Description": "All orders",
            "PartitionKeys": [{"Name": "dt", "Type": "string"}],
            "StorageDescriptor": {"Location": "s3://bucket/orders/"},
            "Parameters": {"classification": "parquet"},
            "Retention": 0
        }));

        let outcome = apply_record(
            ObjectKind::Table,
            TemplateDocument::new(table_template()),
            &staged,
            Path::new("table.template"),
        )
        .expect("merge");

        let doc = &outcome.template;
        assert_eq!(doc.get_path(&["Parameters", "Name", "Default"]), Some(&json!("orders")));
        assert_eq!(
            doc.get_path(&["Parameters", "GlueDatabase", "Default"]),
            Some(&json!("sales"))
        );
        assert_eq!(
            doc.get_path(&["Parameters", "Description", "Default"]),
            Some(&json!("All orders"))
        );
        assert_eq!(
            doc.get_path(&["Resources", "GlueTable", "Properties", "TableInput", "PartitionKeys"]),
            Some(&json!([{"Name": "dt", "Type": "string"}]))
        );
        assert_eq!(
            doc.get_path(&["Resources", "GlueTable", "Properties", "TableInput", "Parameters"]),
            Some(&json!({"classification": "parquet"}))
        );
        // Untouched parts of the template survive.
        assert_eq!(
            doc.get_path(&["Resources", "GlueTable", "Properties", "TableInput", "Name"]),
            Some(&json!({"Ref": "Name"}))
        );
        assert_eq!(outcome.applied.len(), 7);
        assert!(outcome.unrecognized.is_empty());
    }

    #[test]
    fn test_unrecognized_keys_are_reported_and_dropped() {
        let staged = record(json!({
            "Name": "sales",
            "LocationUri": "s3://bucket/",
            "CatalogId": "123456789012"
        }));

        let outcome = apply_record(
            ObjectKind::Database,
            TemplateDocument::new(json!({"Parameters": {"Name": {"Default": ""}}})),
            &staged,
            Path::new("db.template"),
        )
        .expect("merge");

        assert_eq!(outcome.applied, vec!["Name".to_string()]);
        assert_eq!(
            outcome.unrecognized,
            vec!["CatalogId".to_string(), "LocationUri".to_string()]
        );
        assert_eq!(
            outcome.template.as_value(),
            &json!({"Parameters": {"Name": {"Default": "sales"}}})
        );
    }

    #[test]
    fn test_only_unrecognized_keys_leave_template_unchanged() {
        let original = table_template();
        let staged = record(json!({"LocationUri": "s3://x", "VersionId": "3"}));

        let outcome = apply_record(
            ObjectKind::Table,
            TemplateDocument::new(original.clone()),
            &staged,
            Path::new("table.template"),
        )
        .expect("merge");

        assert_eq!(outcome.template.as_value(), &original);
        assert_eq!(outcome.unrecognized.len(), 2);
    }

    #[test]
    fn test_scalar_on_destination_path_is_shape_error() {
        let staged = record(json!({"Name": "orders"}));
        let result = apply_record(
            ObjectKind::Table,
            TemplateDocument::new(json!({"Parameters": "oops"})),
            &staged,
            Path::new("broken.template"),
        );
        assert!(matches!(result, Err(GlueGenError::TemplateShape { .. })));
    }
}
