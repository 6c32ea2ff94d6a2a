//! Conversion of pasted column listings into Glue column JSON.
//!
//! Input is one `name type` pair per line, as printed by `SHOW CREATE TABLE`
//! and similar tools. Backticks around the name and trailing commas are
//! tolerated:
//!
//! ```text
//! `col1`, string
//! `col2` decimal(10,2),
//! ```

use crate::Result;
use crate::error::GlueGenError;
use crate::output::save_json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Default input file for the column conversion.
pub const DEFAULT_COLUMNS_INPUT: &str = "columns";

/// Default output file for the column conversion.
pub const DEFAULT_COLUMNS_OUTPUT: &str = "columns-output";

/// One column in Glue's `{"Name", "Type"}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column type, e.g. `string` or `decimal(10,2)`
    #[serde(rename = "Type")]
    pub column_type: String,
    /// Column name
    #[serde(rename = "Name")]
    pub name: String,
}

fn column_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Type keeps parenthesised or angle-bracketed arguments, which may contain commas.
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*`?([^`\s,]+)`?\s*,?\s+`?([^\s,(<`]+(?:\([^)]*\)|<.*>)?)")
            .expect("Invalid column line pattern")
    })
}

/// Parses column lines in order. Blank lines are skipped.
///
/// # Errors
/// [`GlueGenError::ColumnFormat`] for a line without both a name and a type.
pub fn parse_column_definitions(text: &str) -> Result<Vec<ColumnDefinition>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            column_line()
                .captures(line)
                .map(|caps| ColumnDefinition {
                    column_type: caps[2].to_string(),
                    name: caps[1].to_string(),
                })
                .ok_or_else(|| GlueGenError::ColumnFormat {
                    line: index.saturating_add(1),
                    content: line.to_string(),
                })
        })
        .collect()
}

/// Reads `input`, converts every line and writes the JSON array to `output`.
///
/// Returns the number of columns written.
pub async fn convert_column_file(input: &Path, output: &Path) -> Result<usize> {
    let text = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| GlueGenError::io("read", input, e))?;

    let columns = parse_column_definitions(&text)?;
    info!("Found {} new entries", columns.len());

    save_json(&columns, output).await?;
    Ok(columns.len())
}
