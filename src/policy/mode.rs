use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Enclosing configuration mode.
///
/// Serializes as `"inherit"` / `"override"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Configuration from the enclosing class is visible to the nested class.
    Inherit,

    /// Configuration from the enclosing class is ignored; the nested class
    /// declares its own.
    Override,
}

impl Mode {
    /// Returns a short stable identifier suitable for logging/debugging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inherit => "inherit",
            Self::Override => "override",
        }
    }

    /// Returns true for [`Mode::Inherit`].
    #[must_use]
    pub const fn is_inherit(self) -> bool {
        matches!(self, Self::Inherit)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("inherit") {
            Ok(Self::Inherit)
        } else if value.eq_ignore_ascii_case("override") {
            Ok(Self::Override)
        } else {
            Err(ValidationError::InvalidMode {
                value: s.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("INHERIT".parse::<Mode>().unwrap(), Mode::Inherit);
        assert_eq!(" Override ".parse::<Mode>().unwrap(), Mode::Override);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "merge".parse::<Mode>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidMode { value } if value == "merge"));
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Mode::Inherit).unwrap(), "\"inherit\"");
        let mode: Mode = serde_json::from_str("\"override\"").unwrap();
        assert_eq!(mode, Mode::Override);
    }
}
