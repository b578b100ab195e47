//! `nbstub.toml` project configuration.

use std::path::Path;

use eyre::{Context, Result};
use nbstub_codegen::StubConfig;
use serde::Deserialize;

/// File name looked up in the working directory when no config is given.
pub const DEFAULT_CONFIG: &str = "nbstub.toml";

/// Contents of `nbstub.toml`. Every table is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Generation options, overridden by command-line flags.
    pub stubgen: StubConfig,
}

impl ProjectConfig {
    pub fn parse(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&src).wrap_err_with(|| format!("Failed to parse {}", path.display()))
    }

    /// Load `explicit` if given, else `nbstub.toml` when it exists, else
    /// the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
