//! Class hierarchy collaborators.
//!
//! The resolver only needs two capabilities from the runtime hosting the
//! test classes: the explicit policy declared on a class, and the class that
//! lexically encloses it. Both are traits so any introspection mechanism can
//! back them. `ClassRegistry` is the in-memory implementation used for
//! embedded use and tests.

mod ids;
mod lookup;
mod registry;

pub use ids::{AnnotationId, ClassId};
pub use lookup::{DeclarationLookup, EnclosingLookup};
pub use registry::{AnnotationDef, ClassDef, ClassRegistry};
