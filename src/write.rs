//! Write operations for modifying data in DynamoDB tables.
//!
//! This module provides operations for writing data to DynamoDB:
//! - Putting new items, optionally timestamped and sanitized
//! - Updating items from field maps (set, remove, add)
//! - Grouping writes into a single transaction

/// Common utilities for write operations.
pub mod common;

/// Put item operation for creating or replacing items.
pub mod put_item;

/// Transactional write operation applying several writes atomically.
pub mod transact_write;

/// Update item operation for modifying existing items.
pub mod update_item;
