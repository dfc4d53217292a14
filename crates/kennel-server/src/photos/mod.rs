//! Photograph records and their stored image files.
//!
//! [`PhotoService`] coordinates the record store with the file store:
//! records are written first, image bytes second. [`DiskFileStore`] keeps
//! the image files in a single flat directory.

mod forms;
mod service;
mod storage;

pub use forms::{CreatePhotoForm, EditPhotoForm, PhotoFields};
pub use service::{
    DogChoice, EditForm, FormOutcome, InvalidForm, PhotoService, INVALID_FILE_TYPE, MISSING_FILE,
};
pub use storage::{DiskFileStore, FileStore};
