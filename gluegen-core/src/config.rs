//! Run configuration and workspace layout.
//!
//! A workspace directory holds `glueProperties.json`:
//!
//! ```json
//! {
//!     "DEFAULT": {
//!         "sourceDB": ["sales"],
//!         "targetDB": "glueDBgeneral.template",
//!         "sourceTables": [],
//!         "targetTables": "glueTablegeneral.template"
//!     }
//! }
//! ```
//!
//! Relative paths in the file are resolved against the workspace directory.

use crate::error::GlueGenError;
use crate::output::load_json;
use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the properties file inside a workspace.
pub const PROPERTIES_FILE: &str = "glueProperties.json";

/// Default scratch directory, relative to the workspace.
pub const DEFAULT_SCRATCH_DIR: &str = "../Temp";

/// Default output directory, relative to the workspace.
pub const DEFAULT_OUTPUT_DIR: &str = "../Templates";

/// Environment variables consulted for the region, in order.
pub const REGION_ENV_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

#[derive(Debug, Deserialize)]
struct PropertiesFile {
    #[serde(rename = "DEFAULT")]
    default: RunConfig,
}

/// What to export and which templates to merge into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Databases to export
    #[serde(rename = "sourceDB")]
    pub source_databases: Vec<String>,
    /// Generic database template
    #[serde(rename = "targetDB")]
    pub database_template: PathBuf,
    /// Tables to export; empty means every table of the first database
    #[serde(rename = "sourceTables", default)]
    pub source_tables: Vec<String>,
    /// Generic table template
    #[serde(rename = "targetTables")]
    pub table_template: PathBuf,
    /// Region override; otherwise taken from the environment
    #[serde(default)]
    pub region: Option<String>,
    /// Catalog owner account, when not the caller's own
    #[serde(rename = "catalogId", default)]
    pub catalog_id: Option<String>,
    /// Scratch directory override
    #[serde(rename = "scratchDir", default)]
    pub scratch_dir: Option<PathBuf>,
    /// Output directory override
    #[serde(rename = "outputDir", default)]
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Loads `glueProperties.json` from `workspace`.
    ///
    /// # Errors
    /// Configuration error if the file is missing, unparsable, or names no
    /// source database.
    pub async fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(PROPERTIES_FILE);
        let properties: PropertiesFile = load_json(&path).await.map_err(|e| {
            GlueGenError::configuration(format!(
                "Cannot read run configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = properties.default;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings the export depends on.
    pub fn validate(&self) -> Result<()> {
        if self.source_databases.is_empty() {
            return Err(GlueGenError::configuration(
                "sourceDB must name at least one database",
            ));
        }
        if self.source_databases.iter().any(|name| name.trim().is_empty()) {
            return Err(GlueGenError::configuration(
                "sourceDB contains an empty database name",
            ));
        }
        Ok(())
    }

    /// First requested database; table merges run in its context.
    pub fn primary_database(&self) -> Option<&str> {
        self.source_databases.first().map(String::as_str)
    }

    /// Picks the region from the file, then from the environment, then from
    /// the shared AWS config profile (`~/.aws/config`, `AWS_PROFILE`).
    ///
    /// # Errors
    /// Configuration error when no source yields a non-empty region.
    pub fn resolve_region(&self) -> Result<String> {
        pick_region(
            self.region.as_deref(),
            |key| std::env::var(key).ok(),
            profile_region,
        )
    }
}

/// Region resolution with injectable environment and profile lookups.
///
/// `profile` is only called when neither the file nor the environment
/// names a region.
pub fn pick_region<F, P>(configured: Option<&str>, lookup: F, profile: P) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
    P: FnOnce() -> Option<String>,
{
    configured
        .map(str::to_string)
        .into_iter()
        .chain(REGION_ENV_VARS.into_iter().filter_map(&lookup))
        .chain(std::iter::once_with(profile).flatten())
        .map(|region| region.trim().to_string())
        .find(|region| !region.is_empty())
        .ok_or_else(|| {
            GlueGenError::configuration(
                "No region configured. Set \"region\" in glueProperties.json, AWS_REGION, or a profile region in ~/.aws/config",
            )
        })
}

/// Region of the active profile in the shared AWS config file.
#[cfg(feature = "glue")]
pub fn profile_region() -> Option<String> {
    match rusoto_core::credential::ProfileProvider::region() {
        Ok(region) => region,
        Err(e) => {
            tracing::debug!("No region from the shared AWS config: {}", e);
            None
        }
    }
}

/// Region of the active profile; always `None` without a catalog adapter.
#[cfg(not(feature = "glue"))]
pub const fn profile_region() -> Option<String> {
    None
}

/// Resolved locations used by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    /// Directory holding the properties file
    pub workspace: PathBuf,
    /// Scratch area for staged records
    pub scratch_dir: PathBuf,
    /// Destination for merged templates
    pub output_dir: PathBuf,
    /// Generic database template file
    pub database_template: PathBuf,
    /// Generic table template file
    pub table_template: PathBuf,
}

impl WorkspaceLayout {
    /// Resolves every path of `config` against `workspace`.
    pub fn from_config(workspace: &Path, config: &RunConfig) -> Self {
        let resolve = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workspace.join(path)
            }
        };

        Self {
            workspace: workspace.to_path_buf(),
            scratch_dir: resolve(
                config
                    .scratch_dir
                    .as_deref()
                    .unwrap_or(Path::new(DEFAULT_SCRATCH_DIR)),
            ),
            output_dir: resolve(
                config
                    .output_dir
                    .as_deref()
                    .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR)),
            ),
            database_template: resolve(&config.database_template),
            table_template: resolve(&config.table_template),
        }
    }

    /// Builder method to set the scratch directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Rejects layouts where a reset of one area would wipe the other.
    pub fn validate(&self) -> Result<()> {
        if self.scratch_dir == self.output_dir {
            return Err(GlueGenError::configuration(
                "scratchDir and outputDir must be different directories",
            ));
        }
        if self.output_dir.starts_with(&self.scratch_dir)
            || self.scratch_dir.starts_with(&self.output_dir)
        {
            return Err(GlueGenError::configuration(
                "scratchDir and outputDir must not contain each other",
            ));
        }
        Ok(())
    }

    /// Output file for the merged template of `name`.
    pub fn template_output(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.template", name))
    }
}
