//! Build profiles: named toggle sets stored as TOML.
//!
//! Profiles live as `.profile.toml` files in the `profiles/` directory of a
//! runtime checkout. This module loads, validates, serializes and discovers
//! them, and provides the built-in profiles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RuntimeConfig;
use crate::error::{ConfigError, Result};
use crate::toggles::{ReadBarrierKind, Toggle, ToggleSet};

const PROFILE_SUFFIX: &str = ".profile.toml";

/// A named toggle set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildProfile {
    /// Profile name (e.g., "host-debug", "device-android-cc").
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// The toggles this profile selects.
    #[serde(default)]
    pub toggles: ToggleSet,
}

impl BuildProfile {
    /// A profile with the given name, description and toggles.
    pub fn new(name: impl Into<String>, description: impl Into<String>, toggles: ToggleSet) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            toggles,
        }
    }

    /// Resolve this profile into a runtime configuration.
    pub fn resolve(&self) -> Result<RuntimeConfig> {
        log::debug!("resolving build profile '{}'", self.name);
        RuntimeConfig::resolve(self.toggles)
    }

    /// Development host, debug build.
    pub fn host_debug() -> Self {
        Self::new(
            "host-debug",
            "Host debug build",
            ToggleSet {
                debug_build: true,
                ..ToggleSet::HOST
            },
        )
    }

    /// Development host, release build.
    pub fn host_release() -> Self {
        Self::new("host-release", "Host release build", ToggleSet::HOST)
    }

    /// Android device with the concurrent copying collector.
    pub fn device_android_cc() -> Self {
        Self::new(
            "device-android-cc",
            "Android device, Baker read barrier, TLAB, vdex",
            ToggleSet {
                read_barrier: ReadBarrierKind::Baker,
                tlab: true,
                vdex: true,
                ..ToggleSet::ANDROID
            },
        )
    }

    /// Android device with heap poisoning for stale-reference hunting.
    pub fn device_android_poisoned() -> Self {
        Self::new(
            "device-android-poisoned",
            "Android device debug build, Baker read barrier, heap poisoning",
            ToggleSet {
                read_barrier: ReadBarrierKind::Baker,
                heap_poisoning: true,
                tlab: true,
                debug_build: true,
                ..ToggleSet::ANDROID
            },
        )
    }

    /// Plain Linux device without a read barrier.
    pub fn device_linux() -> Self {
        Self::new(
            "device-linux",
            "Linux device, no read barrier",
            ToggleSet::DEVICE_LINUX,
        )
    }
}

/// All built-in profiles.
pub fn builtin_profiles() -> Vec<BuildProfile> {
    vec![
        BuildProfile::host_debug(),
        BuildProfile::host_release(),
        BuildProfile::device_android_cc(),
        BuildProfile::device_android_poisoned(),
        BuildProfile::device_linux(),
    ]
}

/// Look up a built-in profile by name.
pub fn builtin_profile(name: &str) -> Option<BuildProfile> {
    builtin_profiles().into_iter().find(|p| p.name == name)
}

/// Find a profile by name: first in `project_dir/profiles/`, then built-in.
pub fn find_profile(name: &str, project_dir: Option<&Path>) -> Result<BuildProfile> {
    if let Some(dir) = project_dir {
        if let Some((_, path)) = discover_profiles(dir)?.into_iter().find(|(n, _)| n == name) {
            return load_profile_toml(&path);
        }
    }
    builtin_profile(name).ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
}

/// A validation issue found in a build profile.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a profile from a `.profile.toml` file.
pub fn load_profile_toml(path: &Path) -> Result<BuildProfile> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_profile_toml(&content)
}

/// Parse a profile from a TOML string.
pub fn parse_profile_toml(toml_str: &str) -> Result<BuildProfile> {
    let profile: BuildProfile = toml::from_str(toml_str)?;
    Ok(profile)
}

/// Serialize a profile to pretty TOML.
pub fn profile_to_toml(profile: &BuildProfile) -> Result<String> {
    let toml_str = toml::to_string_pretty(profile)?;
    Ok(toml_str)
}

/// Validate a profile.
///
/// Returns `Ok(())` if it resolves cleanly, or `Err(issues)`. Warnings are
/// reported alongside errors but a profile with only warnings still resolves.
pub fn validate_profile(profile: &BuildProfile) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let toggles = &profile.toggles;

    if let Err(e) = check_profile_name(&profile.name) {
        issues.push(ValidationIssue {
            severity: "error",
            message: e.to_string(),
        });
    }

    if let Err(e) = RuntimeConfig::from_toggles(*toggles) {
        issues.push(ValidationIssue {
            severity: "error",
            message: e.to_string(),
        });
    }

    if toggles.force_read_barrier {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!(
                "{} is transitional and will be removed; select a read barrier instead",
                Toggle::ForceReadBarrier.name()
            ),
        });
    }

    if toggles.mark_compact && !toggles.moving_collector {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!(
                "{} requested without {}; it resolves to unsupported",
                Toggle::MarkCompact.name(),
                Toggle::MovingCollector.name()
            ),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Whether a list of issues contains any errors.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == "error")
}

/// Generate a template `.profile.toml` for a new profile.
///
/// Seeds from host-release with the given name.
pub fn generate_template(name: &str) -> Result<String> {
    let mut profile = BuildProfile::host_release();
    profile.name = name.into();
    profile.description = String::new();
    profile_to_toml(&profile)
}

/// Discover all `.profile.toml` files in a project's `profiles/` directory.
///
/// Returns a list of (profile_name, file_path) pairs sorted by name.
pub fn discover_profiles(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let profiles_dir = project_dir.join("profiles");
    if !profiles_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(&profiles_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(PROFILE_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name.filter(|n| check_profile_name(n).is_ok()) {
            profiles.push((name, path));
        }
    }
    profiles.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(profiles)
}

/// Reject names that would not stay a single file inside `profiles/`.
pub fn check_profile_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "name is empty"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains("..") {
        "name contains `..`"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidProfileName {
        name: name.into(),
        reason,
    })
}

/// Path a profile named `name` is written to inside `project_dir`.
pub fn profile_path(project_dir: &Path, name: &str) -> Result<PathBuf> {
    check_profile_name(name)?;
    Ok(project_dir
        .join("profiles")
        .join(format!("{name}{PROFILE_SUFFIX}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_validate_and_resolve() {
        for profile in builtin_profiles() {
            assert!(
                validate_profile(&profile).is_ok(),
                "{} failed validation",
                profile.name
            );
            profile.resolve().unwrap();
        }
    }

    #[test]
    fn builtin_lookup() {
        assert!(builtin_profile("device-android-cc").is_some());
        assert!(builtin_profile("nonexistent").is_none());
    }

    #[test]
    fn android_cc_capabilities() {
        let config = BuildProfile::device_android_cc().resolve().unwrap();
        let caps = config.capabilities;
        assert!(caps.use_baker_read_barrier);
        assert!(caps.use_read_barrier);
        assert!(caps.emit_compiler_read_barrier);
        assert!(caps.use_tlab);
        assert!(!caps.host_static_build_enabled);
    }

    #[test]
    fn round_trip_android_cc() {
        let original = BuildProfile::device_android_cc();
        let toml_str = profile_to_toml(&original).unwrap();
        let parsed = parse_profile_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
name = "minimal-device"

[toggles]
device-target = true
target-android = true
read-barrier = "table-lookup"
"#;
        let profile = parse_profile_toml(toml_str).unwrap();
        assert_eq!(profile.name, "minimal-device");
        assert!(profile.description.is_empty());
        assert_eq!(profile.toggles.read_barrier, ReadBarrierKind::TableLookup);
        assert!(profile.toggles.moving_collector);
        let caps = profile.resolve().unwrap().capabilities;
        assert!(caps.use_table_lookup_read_barrier);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_profile_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn parse_unknown_barrier_returns_error() {
        let toml_str = "name = \"x\"\n[toggles]\nread-barrier = \"shenandoah\"\n";
        assert!(matches!(
            parse_profile_toml(toml_str),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validate_conflicting_platform() {
        let mut profile = BuildProfile::device_linux();
        profile.toggles.target_android = true;
        let issues = validate_profile(&profile).unwrap_err();
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.message.contains("mutually exclusive")));
        assert!(profile.resolve().is_err());
    }

    #[test]
    fn validate_host_with_device_flag() {
        let mut profile = BuildProfile::host_debug();
        profile.toggles.target_linux = true;
        let issues = validate_profile(&profile).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("host build")));
    }

    #[test]
    fn validate_barrier_without_moving_collector() {
        let mut profile = BuildProfile::device_android_cc();
        profile.toggles.moving_collector = false;
        let issues = validate_profile(&profile).unwrap_err();
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.message.contains("moving-collector")));
    }

    #[test]
    fn forced_barrier_is_only_a_warning() {
        let mut profile = BuildProfile::host_debug();
        profile.toggles.force_read_barrier = true;
        let issues = validate_profile(&profile).unwrap_err();
        assert!(!has_errors(&issues));
        assert!(issues.iter().any(|i| i.message.contains("transitional")));
        assert!(profile.resolve().unwrap().capabilities.emit_compiler_read_barrier);
    }

    #[test]
    fn validate_empty_name() {
        let mut profile = BuildProfile::host_release();
        profile.name = "  ".into();
        let issues = validate_profile(&profile).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("name is empty")));
    }

    #[test]
    fn validate_name_with_separator() {
        let mut profile = BuildProfile::host_release();
        profile.name = "../escape".into();
        let issues = validate_profile(&profile).unwrap_err();
        assert!(has_errors(&issues));
    }

    #[test]
    fn profile_path_stays_in_profiles_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = profile_path(dir.path(), "custom").unwrap();
        assert_eq!(path, dir.path().join("profiles").join("custom.profile.toml"));

        for (name, reason) in [
            ("", "empty"),
            ("   ", "empty"),
            ("../x", "separator"),
            ("a/b", "separator"),
            ("a\\b", "separator"),
            ("..", "`..`"),
            ("x..y", "`..`"),
        ] {
            match profile_path(dir.path(), name) {
                Err(ConfigError::InvalidProfileName { name: rejected, reason: why }) => {
                    assert_eq!(rejected, name);
                    assert!(why.contains(reason), "{name:?}: {why}");
                }
                other => panic!("{name:?} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn discover_skips_unnamed_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");
        std::fs::create_dir_all(&profiles_dir).unwrap();
        let template = generate_template("a").unwrap();
        std::fs::write(profiles_dir.join(".profile.toml"), &template).unwrap();
        std::fs::write(profiles_dir.join("a.profile.toml"), &template).unwrap();

        let profiles = discover_profiles(dir.path()).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].0, "a");
    }

    #[test]
    fn generate_template_is_valid() {
        let toml_str = generate_template("my-profile").unwrap();
        let profile = parse_profile_toml(&toml_str).unwrap();
        assert_eq!(profile.name, "my-profile");
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn discover_profiles_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");
        std::fs::create_dir_all(&profiles_dir).unwrap();

        let template = generate_template("b").unwrap();
        std::fs::write(profiles_dir.join("b.profile.toml"), &template).unwrap();
        std::fs::write(profiles_dir.join("a.profile.toml"), &template).unwrap();
        std::fs::write(profiles_dir.join("notes.toml"), "ignore me").unwrap();

        let profiles = discover_profiles(dir.path()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].0, "a");
        assert_eq!(profiles[1].0, "b");
    }

    #[test]
    fn discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_profiles(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_not_found() {
        let result = load_profile_toml(Path::new("/nonexistent/x.profile.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound { .. }));
    }

    #[test]
    fn find_prefers_project_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = profile_path(dir.path(), "host-debug").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut custom = BuildProfile::host_debug();
        custom.description = "project override".into();
        std::fs::write(&path, profile_to_toml(&custom).unwrap()).unwrap();

        let found = find_profile("host-debug", Some(dir.path())).unwrap();
        assert_eq!(found.description, "project override");

        let builtin = find_profile("device-linux", Some(dir.path())).unwrap();
        assert_eq!(builtin, BuildProfile::device_linux());

        assert!(matches!(
            find_profile("nope", None),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }
}
