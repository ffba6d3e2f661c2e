//! # nested-scope - Enclosing configuration resolution for nested test classes
//!
//! Test classes can be nested inside other test classes. A nesting policy
//! attached to a class decides whether test configuration declared on the
//! enclosing classes is visible to it (`Inherit`) or not (`Override`).
//!
//! ## Core Concepts
//!
//! - **Mode / NestingPolicy**: the declaration attached to a class
//! - **DeclarationLookup / EnclosingLookup**: the two capabilities the
//!   resolver needs from whatever runtime hosts the classes
//! - **EnclosingConfigurationResolver**: nearest-explicit-policy chain walk
//! - **ResolutionCache**: per-class memoization, shared across threads
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use nested_scope::{ClassDef, ClassRegistry, EnclosingConfigurationResolver, Mode};
//!
//! let registry = Arc::new(ClassRegistry::new());
//! let outer = registry.register(ClassDef::new("OuterTests").policy(Mode::Inherit))?;
//! let inner = registry.register(ClassDef::new("InnerTests").nested_in(outer))?;
//!
//! let resolver = EnclosingConfigurationResolver::from_registry(registry);
//! assert!(resolver.is_configuration_inherited(inner));
//! assert!(!resolver.is_configuration_inherited(outer));
//! # Ok::<(), nested_scope::NestError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod policy;
pub mod resolver;

// Re-export primary types at crate root for convenience
pub use config::ResolverConfig;
pub use error::{ConfigError, NestError, NestResult, ValidationError};
pub use hierarchy::{
    AnnotationDef, AnnotationId, ClassDef, ClassId, ClassRegistry, DeclarationLookup,
    EnclosingLookup,
};
pub use policy::{DeclarationSite, Mode, NestingPolicy};
pub use resolver::{CacheStats, EnclosingConfigurationResolver, Resolution, ResolutionCache};
