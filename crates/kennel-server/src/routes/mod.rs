//! Route handlers for the HTTP API.

pub mod dogs;
pub mod health;
pub mod photos;
