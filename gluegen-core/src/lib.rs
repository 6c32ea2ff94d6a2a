//! Core library for gluegen.
//!
//! gluegen exports AWS Glue databases and tables as CloudFormation templates.
//! It reads the live definitions from the Glue Data Catalog, strips the
//! fields the service assigns on its own, stages the result in a scratch
//! directory and projects an allow-listed set of fields into generic
//! templates.
//!
//! # Architecture
//! - [`catalog`]: read-only catalog boundary ([`CatalogService`]) and the
//!   paginating [`CatalogReader`]
//! - [`sanitize`]: volatile-field removal
//! - [`staging`]: directory resets and the scratch area
//! - [`merge`]: allow-list driven template merging
//! - [`export`]: the run orchestrator
//! - [`columns`]: stand-alone column listing converter

pub mod catalog;
pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod merge;
pub mod models;
pub mod output;
pub mod sanitize;
pub mod staging;

// Re-export commonly used types
pub use catalog::{CatalogPage, CatalogReader, CatalogService};
pub use config::{RunConfig, WorkspaceLayout};
pub use error::{GlueGenError, Result};
pub use export::{ExportReport, Exporter, StagedCatalog};
pub use logging::init_logging;
pub use merge::{MergedTemplate, TemplateMerger};
pub use models::{CatalogRecord, ObjectKind, SanitizedRecord, TemplateDocument};

#[cfg(feature = "glue")]
pub use catalog::glue::GlueCatalog;
