//! gluegen: export AWS Glue databases and tables as CloudFormation templates.

use anyhow::Context;
use clap::Parser;
use gluegen::{Cli, Command, run_columns, run_export};
use gluegen_core::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet).context("Failed to initialize logging")?;

    match &cli.command {
        Some(Command::Columns(args)) => {
            let count = run_columns(&cli.workspace, args)
                .await
                .context("Column conversion failed")?;
            if !cli.global.quiet {
                println!("Converted {} columns into {}", count, args.output.display());
            }
        }
        None => {
            let report = run_export(&cli.workspace)
                .await
                .context("Catalog export failed")?;
            if !cli.global.quiet {
                println!("Export completed successfully");
                println!("Records staged: {}", report.staged.len());
                println!("Templates written: {}", report.templates.len());
                println!("Fields dropped: {}", report.unrecognized_count());
            }
        }
    }

    Ok(())
}
