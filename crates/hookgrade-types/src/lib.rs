//! # hookgrade-types
//!
//! Core type definitions for hookgrade.
//!
//! This crate is the foundation of the dependency graph -- every other
//! hookgrade crate depends on it. It contains:
//!
//! - **[`grade`]** -- [`GradeRequest`], [`GradeResult`] and the structural
//!   checks every backend result must pass
//! - **[`fallback`]** -- the pre-authored result served when all backends fail
//! - **[`config`]** -- Configuration schema for the server, quota and backends
//! - **[`secret`]** -- [`SecretString`] for API keys
//! - **[`error`]** -- [`HookgradeError`]

pub mod config;
pub mod error;
pub mod fallback;
pub mod grade;
pub mod secret;

pub use error::{HookgradeError, Result};
pub use fallback::fallback_result;
pub use grade::{
    Alternative, Dimension, GradeRequest, GradeRequestBody, GradeResult, Platform, ShapeError,
};
pub use secret::SecretString;
