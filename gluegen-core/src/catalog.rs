//! Catalog service abstraction and the reader built on top of it.
//!
//! [`CatalogService`] is the raw, page-at-a-time boundary to the remote
//! metadata store. [`CatalogReader`] turns it into complete record lists and
//! applies the degradation policy: a rejected call contributes no records and
//! the run carries on, anything else propagates.

#[cfg(feature = "glue")]
pub mod glue;

use crate::Result;
use crate::models::CatalogRecord;
use async_trait::async_trait;
use tracing::{debug, warn};

/// One page of a list operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// Records on this page
    pub records: Vec<CatalogRecord>,
    /// Continuation token for the next page, if any
    pub next_token: Option<String>,
}

impl CatalogPage {
    /// A final page holding `records`.
    pub const fn last(records: Vec<CatalogRecord>) -> Self {
        Self {
            records,
            next_token: None,
        }
    }
}

/// Read-only access to a remote data catalog.
///
/// Implementations report a call the service rejected (non-success status,
/// unknown entity, access denied) as
/// [`GlueGenError::ServiceCall`](crate::error::GlueGenError::ServiceCall).
/// Transport and credential failures use any other variant and end the run.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches one page of databases.
    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage>;

    /// Fetches one page of tables in `database`.
    async fn get_tables(&self, database: &str, next_token: Option<String>) -> Result<CatalogPage>;

    /// Fetches a single table. `Ok(None)` means the service returned no table.
    async fn get_table(&self, database: &str, table: &str) -> Result<Option<CatalogRecord>>;

    /// Human-readable service name for log lines.
    fn service_name(&self) -> &'static str;
}

/// Collects complete results from a [`CatalogService`].
pub struct CatalogReader<'a> {
    service: &'a dyn CatalogService,
}

impl<'a> CatalogReader<'a> {
    /// Wraps `service`.
    pub fn new(service: &'a dyn CatalogService) -> Self {
        Self { service }
    }

    /// All databases, following continuation tokens.
    pub async fn list_databases(&self) -> Result<Vec<CatalogRecord>> {
        self.paginate(None).await
    }

    /// All tables of `database`, following continuation tokens.
    pub async fn list_tables(&self, database: &str) -> Result<Vec<CatalogRecord>> {
        self.paginate(Some(database)).await
    }

    /// A single table, or `None` when the service rejected the call or
    /// returned nothing.
    pub async fn get_table(&self, database: &str, table: &str) -> Result<Option<CatalogRecord>> {
        match self.service.get_table(database, table).await {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                warn!("{} returned no table {}.{}", self.service.service_name(), database, table);
                Ok(None)
            }
            Err(e) if e.is_service_rejection() => {
                warn!("Request was not successful: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn paginate(&self, database: Option<&str>) -> Result<Vec<CatalogRecord>> {
        let mut records = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let requested = next_token.clone();
            let result = match database {
                None => self.service.get_databases(requested).await,
                Some(name) => self.service.get_tables(name, requested).await,
            };

            let page = match result {
                Ok(page) => page,
                Err(e) if e.is_service_rejection() => {
                    warn!("Request was not successful: {}", e);
                    break;
                }
                Err(e) => return Err(e),
            };

            debug!(
                "{} page: {} records, more: {}",
                self.service.service_name(),
                page.records.len(),
                page.next_token.is_some()
            );
            records.extend(page.records);

            match page.next_token {
                Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                    warn!("Catalog repeated continuation token; stopping pagination");
                    break;
                }
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(records)
    }
}
