//! Synchronization services

mod state;
pub mod sync;

pub use sync::FamilyDirectorySync;
