//! Error types for txpilot
//!
//! Uses `eyre` for ergonomic error handling with context. Outcomes of a
//! confirmed wait (revert, timeout) are values, not errors; see
//! [`crate::types::ConfirmationOutcome`].

pub use eyre::{bail, ensure, eyre, Context, Report, Result};
