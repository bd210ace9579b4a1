//! `memcaps.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "memcaps.toml";

/// The top-level manifest of a runtime checkout using memcaps profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Profile used when no `--profile` is given.
    #[serde(default)]
    pub default_profile: Option<String>,
    /// Profile selection section.
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// Profiles section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProfilesConfig {
    /// Treat validation warnings as errors.
    #[serde(default)]
    pub deny_warnings: bool,
}

impl Manifest {
    /// Search upward from `start_dir` for a `memcaps.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: Manifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing memcaps.toml")
    }

    /// Generate the default template for `memcaps init`.
    pub fn template(default_profile: &str) -> String {
        format!(
            r#"default-profile = "{default_profile}"

[profiles]
deny-warnings = false
"#
        )
    }
}
