//! Core types and utilities for bosun
//!
//! This is the foundation crate that all other bosun crates depend on.
//! It provides:
//! - Base error types
//! - The recognized hook names and the virtual hook table
//! - Core behavioral traits (`RepositoryInspector`)
//!
//! This crate has no dependencies on other bosun crates.

pub mod error;
pub mod hook;
pub mod traits;

pub use error::{Error, Result};
pub use hook::Hook;
pub use traits::{DetachedRepository, RepositoryInspector};
