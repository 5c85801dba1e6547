//! # CampusDB Testkit
//!
//! Test utilities for CampusDB.
//!
//! This crate provides:
//! - Registry fixtures with admin, instructor and outsider actors
//! - Populated scenario builders
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campusdb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_registry() {
//!     with_university(|uni| {
//!         let prof = uni.add_professor(ADMIN, "Alice", "CS").unwrap();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
