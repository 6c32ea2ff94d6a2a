//! Command-line front end for gluegen.
//!
//! The argument types and run functions live here so they can be tested
//! without spawning the binary; `main.rs` only wires them together.

use clap::{Args, Parser, Subcommand};
use gluegen_core::columns::{DEFAULT_COLUMNS_INPUT, DEFAULT_COLUMNS_OUTPUT, convert_column_file};
use gluegen_core::{CatalogService, ExportReport, Exporter, Result, RunConfig, WorkspaceLayout};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "gluegen")]
#[command(about = "Generate CloudFormation templates from AWS Glue databases and tables")]
#[command(version)]
#[command(long_about = "
gluegen - Glue catalog to CloudFormation exporter

Reads glueProperties.json from the workspace directory, fetches the listed
databases and tables from the AWS Glue Data Catalog, strips server-assigned
fields and writes one template per object into the output directory.

The region comes from the \"region\" key of glueProperties.json, then
AWS_REGION / AWS_DEFAULT_REGION, then the active profile in ~/.aws/config.
Credentials follow the usual AWS provider chain.

EXAMPLES:
  gluegen
  gluegen -v ./scripts
  gluegen columns --input columns --output columns-output
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding glueProperties.json and the generic templates
    #[arg(default_value = ".", value_name = "WORKSPACE")]
    pub workspace: PathBuf,
}

/// Available subcommands. Without one, the catalog export runs.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a pasted column listing into Glue column JSON
    Columns(ColumnsArgs),
}

/// Arguments of the `columns` subcommand
#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Column listing, one `name type` pair per line
    #[arg(short, long, default_value = DEFAULT_COLUMNS_INPUT, value_name = "FILE")]
    pub input: PathBuf,

    /// Destination for the JSON array
    #[arg(short, long, default_value = DEFAULT_COLUMNS_OUTPUT, value_name = "FILE")]
    pub output: PathBuf,
}

/// Verbosity flags shared by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Loads the workspace settings, connects to the catalog and runs the export.
///
/// Configuration and region problems are reported before any directory is
/// touched.
pub async fn run_export(workspace: &Path) -> Result<ExportReport> {
    info!("Starting export from workspace {}", workspace.display());

    let config = RunConfig::load(workspace).await?;
    let layout = WorkspaceLayout::from_config(workspace, &config);
    layout.validate()?;

    let region = config.resolve_region()?;
    info!("Using region {}", region);
    let catalog = connect(&region, config.catalog_id.clone())?;

    Exporter::new(&config, &layout, catalog.as_ref())
        .run()
        .await
        .inspect_err(|e| error!("Export failed: {}", e))
}

#[cfg(feature = "glue")]
fn connect(region: &str, catalog_id: Option<String>) -> Result<Box<dyn CatalogService>> {
    let catalog = gluegen_core::GlueCatalog::new(region, catalog_id)?;
    Ok(Box::new(catalog))
}

#[cfg(not(feature = "glue"))]
fn connect(_region: &str, _catalog_id: Option<String>) -> Result<Box<dyn CatalogService>> {
    Err(gluegen_core::GlueGenError::configuration(
        "This build has no catalog adapter; rebuild with --features glue",
    ))
}

/// Runs the column conversion. Relative paths resolve against `workspace`.
pub async fn run_columns(workspace: &Path, args: &ColumnsArgs) -> Result<usize> {
    let input = workspace.join(&args.input);
    let output = workspace.join(&args.output);
    info!("Converting {} into {}", input.display(), output.display());
    convert_column_file(&input, &output).await
}
