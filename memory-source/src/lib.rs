// memory-source/src/lib.rs
//
// In-memory DataSource backend. Serves catalog tables straight from process
// memory with the same fetch contract a real backend honors: descending
// order on the requested field, limit, and column projection. Used as the
// local backend in tests and demos.

use async_trait::async_trait;
use catalog_cache::domain::{OrderBy, Record};
use catalog_cache::ports::DataSource;
use dashmap::DashMap;
use serde_json::{Map, Value};
use shared::{Error, Result};
use std::cmp::Ordering;

/// Tables of JSON records, keyed by resource name.
#[derive(Default)]
pub struct MemorySource {
    tables: DashMap<String, Vec<Record>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table for `resource`.
    pub fn load(&self, resource: impl Into<String>, records: Vec<Record>) {
        self.tables.insert(resource.into(), records);
    }

    /// Append one record to `resource`, creating the table if needed.
    pub fn put(&self, resource: &str, record: Record) {
        self.tables.entry(resource.to_string()).or_default().push(record);
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(
        &self,
        resource: &str,
        query_spec: &str,
        limit: usize,
        order: &OrderBy,
    ) -> Result<Vec<Record>> {
        let table = self.tables.get(resource).ok_or(Error::NotFound)?;

        let mut records = table.value().clone();
        drop(table);

        // sort_by is stable, ties keep table order
        records.sort_by(|a, b| {
            let ordering = compare_field(a, b, &order.field);
            if order.descending { ordering.reverse() } else { ordering }
        });
        records.truncate(limit);

        if query_spec != "*" {
            let columns: Vec<&str> = query_spec.split(',').map(str::trim).collect();
            records = records.iter().map(|record| project(record, &columns)).collect();
        }

        Ok(records)
    }
}

fn project(record: &Record, columns: &[&str]) -> Record {
    let mut projected = Map::new();
    if let Value::Object(fields) = record {
        for column in columns {
            if let Some(value) = fields.get(*column) {
                projected.insert((*column).to_string(), value.clone());
            }
        }
    }
    Value::Object(projected)
}

fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(x), Some(y)) => compare_values(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
