//! Read operations for retrieving data from DynamoDB tables.
//!
//! Queries are built from key conditions and option bundles, then paged
//! through until exhausted, limited or stopped after a single page.

/// Result aggregation across query pages.
pub mod common;

/// Query operation for retrieving items with key conditions.
pub mod query;

/// Parsing of change stream record images.
pub mod stream;
