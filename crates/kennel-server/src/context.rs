//! Application context shared by every route handler.
//!
//! [`AppContext`] is cloned into each request through Axum state. It holds
//! the DB pool for ad-hoc queries (the dog listing), the loaded
//! configuration, and the [`PhotoService`] that owns the photo workflow.

use std::sync::Arc;

use kennel_core::config::Config;
use kennel_db::pool::DbPool;
use kennel_db::SqliteRecordStore;

use crate::photos::{DiskFileStore, PhotoService};

#[derive(Clone)]
pub struct AppContext {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub photos: Arc<PhotoService>,
}

impl AppContext {
    /// Wire the SQLite record store and the on-disk file store into a
    /// [`PhotoService`] according to `config`.
    pub fn new(config: Config, db: DbPool) -> Self {
        let records = Arc::new(SqliteRecordStore::new(db.clone()));
        let files = Arc::new(DiskFileStore::new(config.photos.storage_dir.clone()));
        let photos = Arc::new(PhotoService::new(records, files, &config.photos));
        Self {
            db,
            config: Arc::new(config),
            photos,
        }
    }
}
