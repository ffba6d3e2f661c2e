use crate::hierarchy::ClassId;
use crate::policy::Mode;

/// Finds the nesting policy declared on exactly one class.
///
/// Implementations report a policy that is directly present or meta-present
/// on `class`. They must not climb the enclosing chain; that is the
/// resolver's job. When several meta-level declarations disagree, the
/// implementation picks one deterministically.
pub trait DeclarationLookup: Send + Sync {
    /// Returns the explicit mode for `class`, if any.
    fn explicit_mode(&self, class: ClassId) -> Option<Mode>;
}

/// Resolves the immediate lexically enclosing class.
pub trait EnclosingLookup: Send + Sync {
    /// Returns the class enclosing `class`, or `None` for a top-level class.
    fn enclosing_class(&self, class: ClassId) -> Option<ClassId>;
}
