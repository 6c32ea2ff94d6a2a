//! Shared fixtures for gluegen-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use gluegen_core::{CatalogPage, CatalogRecord, CatalogService, GlueGenError, Result};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory catalog with optional pagination and per-operation rejections.
#[derive(Default)]
pub struct InMemoryCatalog {
    pub databases: Vec<CatalogRecord>,
    pub tables: HashMap<String, Vec<CatalogRecord>>,
    /// Page size for list operations; 0 means everything on one page
    pub page_size: usize,
    /// Operation names ("GetDatabases", "GetTables", "GetTable") to reject
    pub rejected: HashSet<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl InMemoryCatalog {
    pub fn with_database(mut self, database: Value, tables: Vec<Value>) -> Self {
        let database = record(database);
        let name = database.name().unwrap_or_default().to_string();
        self.databases.push(database);
        self.tables
            .insert(name, tables.into_iter().map(record).collect());
        self
    }

    pub fn rejecting(mut self, operation: &'static str) -> Self {
        self.rejected.insert(operation);
        self
    }

    pub fn paged(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record_call(&self, operation: &str) -> Result<()> {
        self.calls.lock().expect("lock").push(operation.to_string());
        if self.rejected.contains(operation) {
            return Err(GlueGenError::service_call(operation, Some(400), "rejected by test"));
        }
        Ok(())
    }

    fn page(&self, records: &[CatalogRecord], next_token: Option<String>) -> Result<CatalogPage> {
        let start: usize = match next_token {
            Some(token) => token
                .parse()
                .map_err(|_| GlueGenError::service_call("page", Some(400), "bad token"))?,
            None => 0,
        };
        if self.page_size == 0 {
            return Ok(CatalogPage::last(records.to_vec()));
        }

        let end = start.saturating_add(self.page_size).min(records.len());
        let slice = records.get(start..end).unwrap_or_default().to_vec();
        let next_token = (end < records.len()).then(|| end.to_string());
        Ok(CatalogPage {
            records: slice,
            next_token,
        })
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage> {
        self.record_call("GetDatabases")?;
        self.page(&self.databases, next_token)
    }

    async fn get_tables(&self, database: &str, next_token: Option<String>) -> Result<CatalogPage> {
        self.record_call("GetTables")?;
        let tables = self.tables.get(database).cloned().unwrap_or_default();
        self.page(&tables, next_token)
    }

    async fn get_table(&self, database: &str, table: &str) -> Result<Option<CatalogRecord>> {
        self.record_call("GetTable")?;
        self.tables
            .get(database)
            .and_then(|tables| tables.iter().find(|t| t.name() == Some(table)))
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                GlueGenError::service_call("GetTable", Some(400), "EntityNotFoundException")
            })
    }

    fn service_name(&self) -> &'static str {
        "in-memory catalog"
    }
}

pub fn record(value: Value) -> CatalogRecord {
    CatalogRecord::from_value(value).expect("object record")
}

pub fn database_template() -> Value {
    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Parameters": {
            "Name": {"Type": "String", "Default": ""},
            "Description": {"Type": "String", "Default": ""}
        },
        "Resources": {
            "GlueDatabase": {
                "Type": "AWS::Glue::Database",
                "Properties": {
                    "CatalogId": {"Ref": "AWS::AccountId"},
                    "DatabaseInput": {
                        "Name": {"Ref": "Name"},
                        "Description": {"Ref": "Description"},
                        "Parameters": {}
                    }
                }
            }
        }
    })
}

pub fn table_template() -> Value {
    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Parameters": {
            "Name": {"Type": "String", "Default": ""},
            "Description": {"Type": "String", "Default": ""},
            "TableType": {"Type": "String", "Default": ""},
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

/// Workspace with both generic templates and a properties file.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new(source_db: &[&str], source_tables: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("glueDBgeneral.template"),
            database_template().to_string(),
        )
        .expect("write db template");
        std::fs::write(
            dir.path().join("glueTablegeneral.template"),
            table_template().to_string(),
        )
        .expect("write table template");

        let properties = json!({
            "DEFAULT": {
                "sourceDB": source_db,
                "targetDB": "glueDBgeneral.template",
                "sourceTables": source_tables,
                "targetTables": "glueTablegeneral.template",
                "region": "us-east-1",
                "scratchDir": "Temp",
                "outputDir": "Templates"
            }
        });
        std::fs::write(
            dir.path().join("glueProperties.json"),
            properties.to_string(),
        )
        .expect("write properties");

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn scratch(&self) -> PathBuf {
        self.dir.path().join("Temp")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("Templates")
    }

    pub fn read_json(path: &Path) -> Value {
        let text = std::fs::read_to_string(path).expect("read json");
        serde_json::from_str(&text).expect("parse json")
    }

    pub fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read_dir")
            .map(|entry| {
                entry
                    .expect("entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}
