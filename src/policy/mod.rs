//! Nesting policy primitives.
//!
//! A nesting policy decides whether configuration declared on an enclosing
//! class is visible to the classes nested inside it.

mod declaration;
mod mode;

pub use declaration::{DeclarationSite, NestingPolicy};
pub use mode::Mode;
