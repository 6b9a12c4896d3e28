//! The minimal storage interface `GuestStore` is written against.
//!
//! # Intention
//!
//! - Keep the guest logic independent of the database binding.
//! - Expose only what a one-table store needs: schema version, atomic schema
//!   application, single-statement writes and reads.

use std::collections::HashMap;

use crate::error::Result;
use crate::sqlite::{SqlQuery, Value};

/// One result row, keyed by column name
pub type Row = HashMap<String, Value>;

pub trait Storage {
    /// Schema version currently recorded by the store (0 for a fresh store)
    fn schema_version(&self) -> Result<u32>;

    /// Run `statements` and record `version`, all or nothing
    fn apply_schema(&mut self, statements: &[String], version: u32) -> Result<()>;

    /// Execute a write and return the number of affected rows
    fn execute(&self, query: &SqlQuery) -> Result<usize>;

    /// Execute an insert and return the new row id
    fn insert(&self, query: &SqlQuery) -> Result<i64>;

    /// Run a read and materialize every row
    fn query(&self, query: &SqlQuery) -> Result<Vec<Row>>;
}
