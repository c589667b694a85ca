//! # DataStore Module
//!
//! This module provides functionality for interacting with a Postgres
//! database that backs the summary API: user accounts, bearer sessions,
//! per-user encrypted model API keys, and the query history log.
//!
//! The module uses sqlx for database operations and exposes the storage
//! surface behind a single [`DataStore`] trait so the HTTP layer can be
//! tested against an in-memory implementation.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::DataStore;
pub use domain::{NewQuery, QueryRecord, User};
