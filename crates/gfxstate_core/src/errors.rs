//! Error Types
//!
//! This module defines the error types shared by every gfxstate crate.
//!
//! # Overview
//!
//! The main error type [`GfxStateError`] covers all failure modes including:
//! - Collection file I/O and format errors
//! - Build stripping and restoring failures
//! - Pipeline warm-up failures reported by the host
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, GfxStateError>`.
//!
//! ```rust,ignore
//! use gfxstate_core::errors::{GfxStateError, Result};
//!
//! fn load_collection() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for gfxstate.
#[derive(Error, Debug)]
pub enum GfxStateError {
    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encoding or parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The file is not a graphics state collection.
    #[error("Invalid collection file {path}: {reason}")]
    InvalidFormat {
        /// File that failed to parse
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The file was written by an incompatible format version.
    #[error("Unsupported collection format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the header
        found: u32,
        /// Version this build reads
        expected: u32,
    },

    /// A state blob could not be decoded.
    #[error("State decode error: {0}")]
    StateDecodeError(String),

    /// The requested collection was not found.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    // ========================================================================
    // Build Stripping Errors
    // ========================================================================
    /// `on_preprocess` was called again before the previous strip was restored.
    #[error("A previous strip of {0} file(s) has not been restored yet")]
    StripInProgress(usize),

    /// Moving a collection file failed.
    #[error("Failed to move {from} to {to}: {source}")]
    RelocationFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A planned relocation would overwrite an existing file or move a missing one.
    #[error("Relocation plan rejected: {0}")]
    RelocationRejected(String),

    // ========================================================================
    // Warm-up Errors
    // ========================================================================
    /// The host pipeline cache could not pre-compile a state.
    #[error("Warm-up failed: {0}")]
    WarmUpFailed(String),
}

/// Alias for `Result<T, GfxStateError>`.
pub type Result<T> = std::result::Result<T, GfxStateError>;
