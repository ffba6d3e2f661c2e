use serde::{Deserialize, Serialize};

use crate::hierarchy::ClassId;
use crate::policy::Mode;

/// Resolved outcome for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Resolution {
    /// The class has no enclosing class; there is nothing to inherit.
    TopLevel,

    /// The class is nested inside `enclosing`.
    Nested {
        /// Immediate enclosing class.
        enclosing: ClassId,
        /// Effective mode after the chain walk.
        mode: Mode,
    },
}

impl Resolution {
    /// Effective mode. Top-level classes report [`Mode::Override`].
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::TopLevel => Mode::Override,
            Self::Nested { mode, .. } => mode,
        }
    }

    /// True if enclosing configuration is visible.
    #[must_use]
    pub const fn is_inherited(self) -> bool {
        matches!(
            self,
            Self::Nested {
                mode: Mode::Inherit,
                ..
            }
        )
    }

    /// Immediate enclosing class, if nested.
    #[must_use]
    pub const fn enclosing(self) -> Option<ClassId> {
        match self {
            Self::TopLevel => None,
            Self::Nested { enclosing, .. } => Some(enclosing),
        }
    }
}
