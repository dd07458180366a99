//! # family-directory
//!
//! Directory service implementations for the `DirectoryService` port
//! defined in `family-core`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use family_common::DirectoryConfig;
//! use family_directory::InMemoryDirectory;
//!
//! let directory = InMemoryDirectory::from_config(&DirectoryConfig::default());
//! directory.set_account_id("u1");
//! ```

pub mod memory;
pub mod operation;

pub use memory::InMemoryDirectory;
pub use operation::DirectoryOperation;
