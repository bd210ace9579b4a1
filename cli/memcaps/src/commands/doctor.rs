//! `memcaps doctor` — build and project diagnostics.

use std::path::Path;

use anyhow::Result;
use memcaps::features::enabled_features;
use memcaps::profile::{discover_profiles, load_profile_toml, validate_profile};
use memcaps::BUILD_CONFIG;

use crate::manifest::Manifest;

/// Print the compiled-in configuration and check project profiles.
pub fn run(project_dir: &Path) -> Result<()> {
    println!("=== memcaps doctor ===");
    println!();
    println!("memcaps version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Build ---");
    let features = enabled_features();
    if features.is_empty() {
        println!("  Features: (none)");
    } else {
        println!("  Features: {}", features.join(", "));
    }
    println!("  Platform: {}", BUILD_CONFIG.capabilities.platform.name());
    println!("  Read barrier: {:?}", BUILD_CONFIG.capabilities.read_barrier);
    println!();

    println!("--- Project Status ---");
    match Manifest::find_and_load(project_dir) {
        Ok(Some((manifest, dir))) => {
            println!("  memcaps.toml: found at {}", dir.display());
            if let Some(default) = &manifest.default_profile {
                println!("  Default profile: {default}");
            }
            for (name, path) in discover_profiles(&dir)? {
                let status = match load_profile_toml(&path) {
                    Ok(profile) => match validate_profile(&profile) {
                        Ok(()) => "ok".to_string(),
                        Err(issues) => format!("{} issue(s)", issues.len()),
                    },
                    Err(e) => format!("unreadable ({e})"),
                };
                println!("  {name}: {status}");
            }
        }
        Ok(None) => println!("  memcaps.toml: not found"),
        Err(e) => println!("  memcaps.toml: error: {e:#}"),
    }
    Ok(())
}
