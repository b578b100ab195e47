//! Generation options.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Options that shape the generated stub.
///
/// Deserializes from the `[stubgen]` table of `nbstub.toml`; every field is
/// optional there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StubConfig {
    /// Emit docstrings for modules, classes and functions.
    pub include_docstrings: bool,
    /// Keep members whose name starts or ends with a single underscore.
    pub include_private: bool,
    /// Longest inline literal; longer strings and containers become `...`.
    pub max_expr_length: usize,
    /// Oldest Python the stub must support.
    pub python_version: PythonVersion,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            include_docstrings: true,
            include_private: false,
            max_expr_length: 50,
            python_version: PythonVersion::default(),
        }
    }
}

/// A `MAJOR.MINOR` Python version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Module providing the abstract collection types (`Sequence`, `Callable`, ...).
    pub fn abc_module(self) -> &'static str {
        if self >= Self::new(3, 9) {
            "collections.abc"
        } else {
            "typing"
        }
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::new(3, 9)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPythonVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for PythonVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PythonVersion> for String {
    fn from(value: PythonVersion) -> Self {
        value.to_string()
    }
}
