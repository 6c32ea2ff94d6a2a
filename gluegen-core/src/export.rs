//! End-to-end export: catalog → scratch area → merged templates.
//!
//! A run is strictly sequential. The steps are:
//! 1. reset the output and scratch directories,
//! 2. stage every requested database found in the catalog, and its tables,
//! 3. merge one database template per requested database and one table
//!    template per requested (or discovered) table,
//! 4. empty the scratch directory.
//!
//! Rejected catalog calls only shrink what gets staged. A requested object
//! that was never staged surfaces as
//! [`GlueGenError::MissingStagedRecord`](crate::error::GlueGenError::MissingStagedRecord)
//! in step 3 and ends the run; templates written before that point are kept.

use crate::Result;
use crate::catalog::{CatalogReader, CatalogService};
use crate::config::{RunConfig, WorkspaceLayout};
use crate::error::GlueGenError;
use crate::merge::{MergedTemplate, TemplateMerger};
use crate::models::ObjectKind;
use crate::sanitize::sanitize;
use crate::staging::{ScratchArea, reset_directory};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Records staged by [`Exporter::stage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedCatalog {
    /// Scratch names in staging order
    pub names: Vec<String>,
    /// Tables staged for each staged database
    pub tables_by_database: HashMap<String, Vec<String>>,
    /// Scratch names written more than once; the last record written wins
    pub replaced: Vec<String>,
}

impl StagedCatalog {
    fn record(&mut self, stage_name: String, source: &str) {
        if self.names.contains(&stage_name) {
            warn!(
                "{} from {} replaces an earlier record with the same name",
                stage_name, source
            );
            self.replaced.push(stage_name);
        } else {
            self.names.push(stage_name);
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Scratch names staged during the run, in staging order
    pub staged: Vec<String>,
    /// Templates written, in merge order
    pub templates: Vec<MergedTemplate>,
}

impl ExportReport {
    /// Total number of record keys dropped across all templates.
    pub fn unrecognized_count(&self) -> usize {
        self.templates.iter().map(|t| t.unrecognized.len()).sum()
    }
}

/// Runs one export against a catalog.
pub struct Exporter<'a> {
    config: &'a RunConfig,
    layout: &'a WorkspaceLayout,
    catalog: &'a dyn CatalogService,
    scratch: ScratchArea,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter; nothing touches the filesystem until a phase runs.
    pub fn new(
        config: &'a RunConfig,
        layout: &'a WorkspaceLayout,
        catalog: &'a dyn CatalogService,
    ) -> Self {
        Self {
            config,
            layout,
            catalog,
            scratch: ScratchArea::new(&layout.scratch_dir),
        }
    }

    /// Scratch area used by this exporter.
    pub const fn scratch(&self) -> &ScratchArea {
        &self.scratch
    }

    /// Executes every phase in order.
    ///
    /// # Errors
    /// Configuration errors, directory reset failures, fatal catalog errors,
    /// I/O failures and missing staged records all end the run.
    pub async fn run(&self) -> Result<ExportReport> {
        self.prepare().await?;
        let staged = self.stage().await?;
        let templates = self.merge(&staged).await?;
        self.finish().await?;

        info!(
            "Export finished: {} records staged, {} templates written",
            staged.names.len(),
            templates.len()
        );
        Ok(ExportReport {
            staged: staged.names,
            templates,
        })
    }

    /// Validates settings and resets the output and scratch directories.
    pub async fn prepare(&self) -> Result<()> {
        self.config.validate()?;
        self.layout.validate()?;

        reset_directory(&self.layout.output_dir).await?;
        reset_directory(&self.layout.scratch_dir).await
    }

    /// Stages requested databases found in the catalog, then their tables.
    pub async fn stage(&self) -> Result<StagedCatalog> {
        let reader = CatalogReader::new(self.catalog);
        let databases = reader.list_databases().await?;
        info!(
            "{} returned {} databases",
            self.catalog.service_name(),
            databases.len()
        );

        let mut staged = StagedCatalog::default();
        for database in databases {
            let Some(name) = database.name().map(str::to_string) else {
                warn!("Skipping database record without a Name");
                continue;
            };
            if !self.is_requested_database(&name) {
                debug!("Skipping database {}", name);
                continue;
            }

            info!("Working on database: {}", name);
            let stage_name = ObjectKind::Database.stage_name(&name);
            self.scratch.stage(&stage_name, sanitize(database)).await?;
            staged.record(stage_name, &name);

            let tables = self.stage_tables(&reader, &name, &mut staged).await?;
            staged.tables_by_database.insert(name, tables);
        }

        for requested in &self.config.source_databases {
            if !staged.tables_by_database.contains_key(requested) {
                warn!("Database {} was not found in the catalog", requested);
            }
        }

        Ok(staged)
    }

    async fn stage_tables(
        &self,
        reader: &CatalogReader<'_>,
        database: &str,
        staged: &mut StagedCatalog,
    ) -> Result<Vec<String>> {
        let mut tables = Vec::new();

        if self.config.source_tables.is_empty() {
            for table in reader.list_tables(database).await? {
                let Some(name) = table.name().map(str::to_string) else {
                    warn!("Skipping table record without a Name in {}", database);
                    continue;
                };
                let stage_name = ObjectKind::Table.stage_name(&name);
                self.scratch.stage(&stage_name, sanitize(table)).await?;
                staged.record(stage_name, database);
                tables.push(name);
            }
        } else {
            for name in &self.config.source_tables {
                let Some(table) = reader.get_table(database, name).await? else {
                    continue;
                };
                let stage_name = ObjectKind::Table.stage_name(name);
                self.scratch.stage(&stage_name, sanitize(table)).await?;
                staged.record(stage_name, database);
                tables.push(name.clone());
            }
        }

        info!("Staged {} tables from {}", tables.len(), database);
        Ok(tables)
    }

    /// Merges one template per requested database, then one per table.
    ///
    /// With no explicit table list, the tables staged for the first requested
    /// database are merged.
    pub async fn merge(&self, staged: &StagedCatalog) -> Result<Vec<MergedTemplate>> {
        let mut templates = Vec::new();

        let databases = TemplateMerger::new(ObjectKind::Database, &self.scratch, self.layout);
        for database in &self.config.source_databases {
            let merged = databases
                .merge(
                    &self.layout.database_template,
                    &ObjectKind::Database.stage_name(database),
                )
                .await?;
            templates.push(merged);
        }

        let context = self.config.primary_database().ok_or_else(|| {
            GlueGenError::configuration("sourceDB must name at least one database")
        })?;
        let tables: Vec<String> = if self.config.source_tables.is_empty() {
            staged
                .tables_by_database
                .get(context)
                .cloned()
                .unwrap_or_default()
        } else {
            self.config.source_tables.clone()
        };
        info!(
            "Generating {} table templates for database {}",
            tables.len(),
            context
        );

        let table_merger = TemplateMerger::new(ObjectKind::Table, &self.scratch, self.layout);
        for table in &tables {
            let merged = table_merger
                .merge(
                    &self.layout.table_template,
                    &ObjectKind::Table.stage_name(table),
                )
                .await?;
            templates.push(merged);
        }

        Ok(templates)
    }

    /// Empties the scratch directory.
    pub async fn finish(&self) -> Result<()> {
        reset_directory(&self.layout.scratch_dir).await
    }

    fn is_requested_database(&self, name: &str) -> bool {
        self.config
            .source_databases
            .iter()
            .any(|requested| requested == name)
    }
}
