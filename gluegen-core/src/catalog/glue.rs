//! AWS Glue Data Catalog adapter.
//!
//! Credentials come from the default provider chain (environment, profile,
//! web identity, container and instance metadata), all of which hand out
//! session credentials. Only `GetDatabases`, `GetTables` and `GetTable` are
//! called.

use super::{CatalogPage, CatalogService};
use crate::Result;
use crate::error::GlueGenError;
use crate::models::CatalogRecord;
use async_trait::async_trait;
use rusoto_core::credential::DefaultCredentialsProvider;
use rusoto_core::{HttpClient, Region, RusotoError};
use rusoto_glue::{Glue, GlueClient, GetDatabasesRequest, GetTableRequest, GetTablesRequest};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// Glue catalog client for a single region.
pub struct GlueCatalog {
    client: GlueClient,
    catalog_id: Option<String>,
    region: Region,
}

impl std::fmt::Debug for GlueCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlueCatalog")
            .field("region", &self.region.name())
            .field("catalog_id", &self.catalog_id)
            .finish_non_exhaustive()
    }
}

impl GlueCatalog {
    /// Connects to the Glue catalog in `region`.
    ///
    /// # Errors
    /// Configuration error for an unknown region name; catalog error if the
    /// TLS client or the credential chain cannot be set up.
    pub fn new(region: &str, catalog_id: Option<String>) -> Result<Self> {
        let region = Region::from_str(region).map_err(|e| {
            GlueGenError::configuration(format!("Unknown region '{}': {}", region, e))
        })?;
        let dispatcher = HttpClient::new()
            .map_err(|e| GlueGenError::catalog_failed("Failed to create HTTPS client", e))?;
        let credentials = DefaultCredentialsProvider::new()
            .map_err(|e| GlueGenError::catalog_failed("Failed to set up credential chain", e))?;

        tracing::info!("Currently using {} as the region", region.name());

        Ok(Self {
            client: GlueClient::new_with(dispatcher, credentials, region.clone()),
            catalog_id,
            region,
        })
    }
}

#[async_trait]
impl CatalogService for GlueCatalog {
    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage> {
        let response = self
            .client
            .get_databases(GetDatabasesRequest {
                catalog_id: self.catalog_id.clone(),
                next_token,
                ..Default::default()
            })
            .await
            .map_err(|e| classify("GetDatabases", e))?;

        Ok(CatalogPage {
            records: to_records("GetDatabases", &response.database_list)?,
            next_token: response.next_token,
        })
    }

    async fn get_tables(&self, database: &str, next_token: Option<String>) -> Result<CatalogPage> {
        let response = self
            .client
            .get_tables(GetTablesRequest {
                catalog_id: self.catalog_id.clone(),
                database_name: database.to_string(),
                next_token,
                ..Default::default()
            })
            .await
            .map_err(|e| classify("GetTables", e))?;

        Ok(CatalogPage {
            records: to_records("GetTables", &response.table_list.unwrap_or_default())?,
            next_token: response.next_token,
        })
    }

    async fn get_table(&self, database: &str, table: &str) -> Result<Option<CatalogRecord>> {
        let response = self
            .client
            .get_table(GetTableRequest {
                catalog_id: self.catalog_id.clone(),
                database_name: database.to_string(),
                name: table.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|e| classify("GetTable", e))?;

        response
            .table
            .as_ref()
            .map(|shape| to_record("GetTable", shape))
            .transpose()
    }

    fn service_name(&self) -> &'static str {
        "AWS Glue"
    }
}

/// Rejected calls degrade; transport, credential and parse failures are fatal.
fn classify<E>(operation: &str, error: RusotoError<E>) -> GlueGenError
where
    E: std::error::Error + Send + Sync + 'static,
{
    match error {
        RusotoError::Service(e) => GlueGenError::service_call(operation, None, e.to_string()),
        RusotoError::Unknown(response) => GlueGenError::service_call(
            operation,
            Some(response.status.as_u16()),
            String::from_utf8_lossy(&response.body).into_owned(),
        ),
        other => GlueGenError::catalog_failed(format!("{} failed", operation), other),
    }
}

fn to_records<T: Serialize>(operation: &str, shapes: &[T]) -> Result<Vec<CatalogRecord>> {
    shapes.iter().map(|shape| to_record(operation, shape)).collect()
}

/// Converts a response shape to the PascalCase JSON the service speaks.
fn to_record<T: Serialize>(operation: &str, shape: &T) -> Result<CatalogRecord> {
    let mut value = serde_json::to_value(shape).map_err(|e| {
        GlueGenError::serialization(format!("Failed to convert {} response", operation), e)
    })?;
    strip_nulls(&mut value);

    CatalogRecord::from_value(value).ok_or_else(|| {
        GlueGenError::configuration(format!("{} returned a non-object record", operation))
    })
}

/// The service omits unset members instead of sending null; match that.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
