//! Data models for the style guide application.
//!
//! Field names serialize to camelCase to match the form frontend.

mod catalog;
mod client;
mod revision;
mod response;

pub use catalog::*;
pub use client::*;
pub use revision::*;
pub use response::*;
