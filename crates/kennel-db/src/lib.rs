//! kennel-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, query modules for dogs and photo
//! records, and the [`store::RecordStore`] seam the photo service is
//! written against.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use store::{RecordStore, SqliteRecordStore};
