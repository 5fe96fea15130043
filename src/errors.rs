//! Error Types
//!
//! This module defines the error types used throughout the code generator.
//!
//! # Overview
//!
//! The main error type [`CodegenError`] covers every recoverable failure mode:
//! - Scene data of the wrong shape (type-mismatched or unknown properties)
//! - Loading preconditions (sample count, database availability)
//! - Template rendering failures inside the builtin emitters
//! - External toolchain and image persistence failures
//!
//! Absent-but-optional scene properties are never errors; they resolve to
//! defaults at the call site. Programming errors such as selecting a technique
//! variant that does not exist panic instead of surfacing here.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, CodegenError>`.
//!
//! ```rust,ignore
//! use tracegen::errors::Result;
//!
//! fn emit() -> Result<String> {
//!     Ok(String::new())
//! }
//! ```

use thiserror::Error;

use crate::image_io::ImageSaveError;

/// The main error type for shader generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    // ========================================================================
    // Scene Data Errors
    // ========================================================================
    /// A property is present but holds a value of the wrong shape.
    #[error("Property '{property}' of object '{object}' has the wrong type, expected {expected}")]
    PropertyTypeMismatch {
        /// Name of the scene object
        object: String,
        /// Name of the offending property
        property: String,
        /// Human readable description of the accepted shapes
        expected: &'static str,
    },

    /// A property without a sensible default is absent.
    #[error("Object '{object}' is missing required property '{property}'")]
    MissingProperty {
        /// Name of the scene object
        object: String,
        /// Name of the required property
        property: String,
    },

    /// A named index of refraction is not part of the known material table.
    #[error("Unknown index of refraction '{name}' in object '{object}'")]
    UnknownIor {
        /// Name of the scene object
        object: String,
        /// The unrecognized material name
        name: String,
    },

    /// A property references a texture that was never registered.
    #[error("Object '{object}' references unknown texture '{texture}' in property '{property}'")]
    UnknownTexture {
        /// Name of the scene object
        object: String,
        /// Name of the property holding the reference
        property: String,
        /// The unresolved texture identifier
        texture: String,
    },

    /// A property references an entity that the scene does not define.
    #[error("Object '{object}' references unknown entity '{entity}'")]
    UnknownEntity {
        /// Name of the scene object
        object: String,
        /// The unresolved entity identifier
        entity: String,
    },

    /// A plugin type is not handled by the emitter it was given to.
    #[error("Unsupported {category} type '{kind}' for object '{object}'")]
    UnsupportedPlugin {
        /// Plugin category ("light", "camera", "bsdf", ...)
        category: &'static str,
        /// The plugin type string
        kind: String,
        /// Name of the scene object
        object: String,
    },

    /// A hit group index has no material behind it.
    #[error("Hit group {index} is out of range ({count} materials)")]
    UnknownHitGroup {
        /// Requested hit group
        index: usize,
        /// Number of materials in the scene
        count: usize,
    },

    /// The requested technique type has no known description.
    #[error("Unknown technique type '{0}'")]
    UnknownTechnique(String),

    // ========================================================================
    // Loading Preconditions
    // ========================================================================
    /// The number of samples per iteration must be positive and fit an `i32` literal.
    #[error("Samples per iteration must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidSamplesPerIteration(usize),

    /// Code generation was requested before the scene database was finalized.
    #[error("Scene database is not available, generation cannot start")]
    DatabaseMissing,

    // ========================================================================
    // Emission & Toolchain Errors
    // ========================================================================
    /// A builtin emitter template failed to load or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The external compiler rejected a generated program.
    #[error("Toolchain failed to compile {entry_point}: {message}")]
    Toolchain {
        /// Entry point name of the failing program
        entry_point: &'static str,
        /// Diagnostic reported by the toolchain
        message: String,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// Image persistence failure.
    #[error(transparent)]
    ImageSave(#[from] ImageSaveError),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, CodegenError>`.
pub type Result<T> = std::result::Result<T, CodegenError>;
