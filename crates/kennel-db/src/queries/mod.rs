//! Database query modules.

pub mod dogs;
pub mod photos;
