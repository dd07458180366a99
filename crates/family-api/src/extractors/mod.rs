//! Axum extractors for request handling

mod validated;

pub use validated::{OptionalValidatedJson, ValidatedJson};
