use serde::{Deserialize, Serialize};

use crate::policy::Mode;

/// Where a nesting policy is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DeclarationSite {
    /// Declared on a class (or on an annotation type applied to a class).
    Class,

    /// Declared on a method of a class.
    Method {
        /// Method name.
        name: String,
    },
}

/// A nesting policy declaration.
///
/// The mode is required: there is no default at the declaration level. The
/// effective default for classes without any declaration comes from the
/// resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestingPolicy {
    mode: Mode,
}

impl NestingPolicy {
    /// Declare a policy with the given mode.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Shorthand for `NestingPolicy::new(Mode::Inherit)`.
    #[must_use]
    pub const fn inherit() -> Self {
        Self::new(Mode::Inherit)
    }

    /// Shorthand for `NestingPolicy::new(Mode::Override)`.
    #[must_use]
    pub const fn override_enclosing() -> Self {
        Self::new(Mode::Override)
    }

    /// Returns the declared mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

impl From<Mode> for NestingPolicy {
    fn from(mode: Mode) -> Self {
        Self::new(mode)
    }
}
