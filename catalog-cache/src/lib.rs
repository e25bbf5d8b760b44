// catalog-cache/src/lib.rs
//
// Read-through caching for catalog listings: results from an abstract data
// source are memoized per logical query, expire after a TTL, and can be
// invalidated per resource after writes.

pub mod domain;
pub mod keys;
pub mod ports;
pub mod read_through;

pub use domain::{OrderBy, QueryParams, Record};
pub use ports::DataSource;
pub use read_through::ReadThroughCache;
