//! Error types for nested-scope.
//!
//! All errors are strongly typed using thiserror. Resolution itself is
//! total and never produces an error; these types cover registry
//! construction and configuration loading.

use thiserror::Error;

use crate::hierarchy::{AnnotationId, ClassId};

/// Validation errors that occur while building class metadata or config.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Class name cannot be empty")]
    EmptyClassName,

    #[error("Annotation name cannot be empty")]
    EmptyAnnotationName,

    #[error("Method name cannot be empty")]
    EmptyMethodName,

    #[error("Unknown class: {id}")]
    UnknownClass {
        id: ClassId,
    },

    #[error("Unknown annotation: {id}")]
    UnknownAnnotation {
        id: AnnotationId,
    },

    #[error("Invalid enclosing configuration mode '{value}' (expected 'inherit' or 'override')")]
    InvalidMode {
        value: String,
    },

    #[error("Conflicting nesting policies on class '{class}' at meta distance {distance}")]
    ConflictingDeclarations {
        class: String,
        distance: usize,
    },
}

/// Errors raised while loading a [`ResolverConfig`](crate::config::ResolverConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Io {
        path: String,
        message: String,
    },

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for environment variable {name}: '{value}'")]
    Environment {
        name: &'static str,
        value: String,
    },
}

/// Top-level error type for nested-scope.
#[derive(Debug, Error)]
pub enum NestError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

/// Result alias used throughout the crate.
pub type NestResult<T> = Result<T, NestError>;
