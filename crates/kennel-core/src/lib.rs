//! kennel-core: shared types, IDs, errors, configuration, and upload rules.
//!
//! This crate is the foundational dependency for the other kennel crates,
//! providing typed integer identifiers, a unified error type, application
//! configuration, and the rules that decide whether an uploaded image is
//! accepted and what name it is stored under.

pub mod config;
pub mod error;
pub mod ids;
pub mod upload;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use upload::{ImageContentType, UploadedFile};
