#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Expressions
//!
//! Expression building and result aggregation for DynamoDB query, update and
//! transactional write requests.
//!
//! ## Overview
//!
//! This library turns field maps and key descriptions into DynamoDB's expression
//! language and drives paginated queries:
//! - Name (`#field`) and value (`:field`) placeholder maps built from field maps
//! - Key conditions from a partition key and an optional sort key comparison
//! - Update expressions where `NULL` removes a field and a `+` prefix adds to it
//! - Merging of independently built request option bundles
//! - Query pagination following continuation tokens up to an optional limit
//!
//! ## Quick Example
//!
//! ```rust
//! use dynamodb_expr::{common, write};
//! use serde_json::{Value, json};
//!
//! let fields = common::fields::FieldMap::from([
//!     ("name".to_string(), json!("Jane")),
//!     ("+visits".to_string(), json!(1)),
//!     ("nickname".to_string(), Value::Null),
//! ]);
//! let update_expression = write::update_item::build_update_clause(&fields).unwrap();
//! assert_eq!(
//!     update_expression,
//!     "SET #name = :name REMOVE #nickname ADD #visits :visits"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Placeholders, key conditions and option bundles
//! - [`mod@read`] - Query, page aggregation and stream image parsing
//! - [`mod@write`] - Put, update and transactional write
//! - [`mod@store`] - The store client contract, implemented for the AWS SDK client

/// Common utilities for placeholders, key conditions and option bundles.
pub mod common;

/// Error type shared by every operation.
pub mod error;

/// Read operations for retrieving data from DynamoDB tables.
pub mod read;

/// Store client contract executing built requests.
pub mod store;

/// Write operations for modifying data in DynamoDB tables.
pub mod write;

pub use error::{Error, Result};
