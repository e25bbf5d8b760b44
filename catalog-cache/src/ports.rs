#![deny(clippy::all)]

use crate::domain::{OrderBy, Record};
use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable extension points for underlying data backends

/// Port for the data source the cache reads through to.
///
/// Any backend honoring this contract can sit behind the cache: a hosted
/// database client, a REST gateway, or an in-memory table for tests.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Fetch up to `limit` records from `resource`, selecting the fields
    /// named by `query_spec` (`"*"` or a comma-separated column list),
    /// ordered by `order` for deterministic pagination.
    async fn fetch(
        &self,
        resource: &str,
        query_spec: &str,
        limit: usize,
        order: &OrderBy,
    ) -> Result<Vec<Record>>;
}
