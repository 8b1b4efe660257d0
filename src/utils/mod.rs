//! Utility functions and helpers.
//!
//! # Submodules
//!
//! - [`paths`]: Path resolution against a working directory
//! - [`thread_pool`]: Bounded worker pool for parallel fingerprinting

/// Path resolution utilities
pub mod paths;
/// Thread pool configuration for parallel operations
pub mod thread_pool;

pub use paths::absolutize;
