use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity handle for a class.
///
/// Identity is never derived from the class name: two classes with the same
/// name loaded in different namespaces are distinct.
///
/// # Examples
///
/// ```
/// use nested_scope::ClassId;
///
/// let id = ClassId::new();
/// assert_ne!(id, ClassId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(Uuid);

impl ClassId {
    /// Creates a new random class ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ClassId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identity handle for an annotation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Creates a new random annotation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
