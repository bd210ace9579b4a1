//! `memcaps init` — set up a directory for project profiles.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use memcaps::profile::builtin_profile;

use crate::manifest::{Manifest, MANIFEST_FILE};

/// Write `memcaps.toml` and an empty `profiles/` directory into `dir`.
pub fn run(dir: &Path, default_profile: &str) -> Result<()> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        bail!("'{}' already exists", manifest_path.display());
    }
    if builtin_profile(default_profile).is_none() {
        bail!("unknown built-in profile: '{default_profile}'. Use 'memcaps profile list' to see available profiles.");
    }

    fs::create_dir_all(dir.join("profiles")).context("creating profiles/ directory")?;
    fs::write(&manifest_path, Manifest::template(default_profile))
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    println!("Created {}", manifest_path.display());
    println!("  default profile: {default_profile}");
    println!("  profiles/");
    Ok(())
}
