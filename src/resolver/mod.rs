//! Enclosing configuration resolution.
//!
//! The resolver walks a class's enclosing chain and decides whether
//! configuration declared on enclosing classes is visible. Outcomes are
//! memoized per class identity in a [`ResolutionCache`].

mod cache;
mod enclosing;
mod resolution;

pub use cache::{CacheStats, ResolutionCache};
pub use enclosing::EnclosingConfigurationResolver;
pub use resolution::Resolution;
