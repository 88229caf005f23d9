//! Database module: schema and storage for the `user` table.
//!
//! Layout:
//! - `schema.rs`: backend detection and DDL (MySQL and SQLite)
//! - `store.rs`: parameterized insert / replace / upsert / lookup

pub mod schema;
pub mod store;

pub use schema::{Backend, MYSQL_INIT, SQLITE_INIT};
pub use store::AccountStore;
