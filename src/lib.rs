//! SQLite persistence for hotel guest records.
//!
//! # Intention
//!
//! - Store guests (name, room, stay length, payment method, breakfast flag)
//!   in a single local table.
//! - Keep the public contract small: boolean results for writes, summary
//!   lines for listing, structured accessors for callers that want more.
//!
//! # Architectural Boundaries
//!
//! - Only the guest table and its storage plumbing belong here.
//! - The host application owns the store handle; there is no global instance.

pub mod error;
pub mod guest;
pub mod sqlite;
pub mod storage;
pub mod store;

pub use error::{Result, StoreError};
pub use guest::{Guest, NewGuest};
pub use sqlite::{SqliteConfig, SqliteStorage};
pub use storage::{Row, Storage};
pub use store::GuestStore;
