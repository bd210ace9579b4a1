//! `memcaps profile` — build profile listing, description and validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use memcaps::profile::{
    builtin_profiles, discover_profiles, find_profile, generate_template, has_errors,
    profile_path, profile_to_toml, validate_profile, BuildProfile,
};

/// List built-in profiles and any found in `project_dir/profiles/`.
pub fn list(project_dir: Option<&Path>) -> Result<()> {
    println!("Built-in profiles:");
    println!();
    for profile in builtin_profiles() {
        println!("  {:<25} {}", profile.name, profile.description);
    }

    if let Some(dir) = project_dir {
        let discovered = discover_profiles(dir)?;
        if !discovered.is_empty() {
            println!();
            println!("Project profiles:");
            println!();
            for (name, path) in discovered {
                println!("  {name:<25} {}", path.display());
            }
        }
    }
    println!();
    println!("Use 'memcaps profile describe <name>' for details.");
    Ok(())
}

/// Describe a profile's toggles.
pub fn describe(name: &str, project_dir: Option<&Path>, format: Option<&str>) -> Result<()> {
    let profile = find_profile(name, project_dir)?;
    match format {
        Some("toml") => print!("{}", profile_to_toml(&profile)?),
        Some("json") => println!("{}", serde_json::to_string_pretty(&profile)?),
        None | Some("human") => print_profile(&profile),
        Some(other) => bail!("unknown format '{other}' (expected human, toml, or json)"),
    }
    Ok(())
}

fn print_profile(profile: &BuildProfile) {
    let t = &profile.toggles;
    println!("=== Profile: {} ===", profile.name);
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    println!();
    println!("--- Platform ---");
    println!("  device-target:        {}", t.device_target);
    println!("  target-linux:         {}", t.target_linux);
    println!("  target-android:       {}", t.target_android);
    println!();
    println!("--- Memory ---");
    println!("  read-barrier:         {:?}", t.read_barrier);
    println!("  heap-poisoning:       {}", t.heap_poisoning);
    println!("  tlab:                 {}", t.tlab);
    println!("  moving-collector:     {}", t.moving_collector);
    println!("  mark-compact:         {}", t.mark_compact);
    println!("  force-read-barrier:   {}", t.force_read_barrier);
    println!();
    println!("--- Build ---");
    println!("  debug-build:          {}", t.debug_build);
    println!("  vdex:                 {}", t.vdex);
    println!("  static-host-binaries: {}", t.static_host_binaries);
}

/// Validate a profile; fails if it has errors (or warnings, with `deny_warnings`).
pub fn validate(name: &str, project_dir: Option<&Path>, deny_warnings: bool) -> Result<()> {
    let profile = find_profile(name, project_dir)?;
    match validate_profile(&profile) {
        Ok(()) => {
            println!("profile '{}' is valid", profile.name);
            Ok(())
        }
        Err(issues) => {
            for issue in &issues {
                println!("  {}: {}", issue.severity, issue.message);
            }
            if has_errors(&issues) || deny_warnings {
                bail!("profile '{}' failed validation ({} issue(s))", profile.name, issues.len());
            }
            println!("profile '{}' is valid with warnings", profile.name);
            Ok(())
        }
    }
}

/// Write a template profile to `project_dir/profiles/<name>.profile.toml`.
pub fn new(name: &str, project_dir: &Path) -> Result<()> {
    let path = profile_path(project_dir, name)?;
    if path.exists() {
        bail!("profile '{}' already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, generate_template(name)?)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_runs_without_project() {
        list(None).unwrap();
    }

    #[test]
    fn describe_known_profile() {
        assert!(describe("host-debug", None, None).is_ok());
        assert!(describe("device-android-cc", None, Some("toml")).is_ok());
        assert!(describe("device-linux", None, Some("json")).is_ok());
    }

    #[test]
    fn describe_unknown_profile() {
        assert!(describe("nonexistent", None, None).is_err());
        assert!(describe("host-debug", None, Some("yaml")).is_err());
    }

    #[test]
    fn new_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        new("custom", dir.path()).unwrap();
        assert!(dir.path().join("profiles/custom.profile.toml").is_file());
        validate("custom", Some(dir.path()), true).unwrap();
        assert!(new("custom", dir.path()).is_err());
    }

    #[test]
    fn new_rejects_names_outside_profiles_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(new("../x", &nested).is_err());
        assert!(!dir.path().join("x.profile.toml").exists());
        assert!(new("", &nested).is_err());
        assert!(!nested.join("profiles/.profile.toml").exists());
        assert!(new("a\\b", &nested).is_err());
    }

    #[test]
    fn validate_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let path = profile_path(dir.path(), "broken").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "name = \"broken\"\n[toggles]\ndevice-target = true\n",
        )
        .unwrap();
        assert!(validate("broken", Some(dir.path()), false).is_err());
    }

    #[test]
    fn warnings_fail_only_when_denied() {
        let dir = tempfile::tempdir().unwrap();
        let path = profile_path(dir.path(), "forced").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "name = \"forced\"\n[toggles]\nforce-read-barrier = true\n",
        )
        .unwrap();
        assert!(validate("forced", Some(dir.path()), false).is_ok());
        assert!(validate("forced", Some(dir.path()), true).is_err());
    }
}
