//! Error types for toggle validation and build profile handling.

use std::path::PathBuf;

use crate::toggles::{ReadBarrierKind, Toggle};

/// Broad category of a rejected toggle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Mutually exclusive toggles both set, or both unset where one is required.
    ConfigurationConflict,
    /// A well-formed combination that has no implementation behind it.
    UnsupportedCombination,
}

/// A toggle set that must never reach a built artifact.
///
/// Kept `Copy` so the resolver can return it from `const fn` and fail
/// compile-time evaluation of the built-in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    /// `device-target` set with neither platform sub-flag.
    #[error(
        "either `{}` or `{}` must be set for device builds",
        Toggle::TargetLinux.name(),
        Toggle::TargetAndroid.name()
    )]
    MissingDevicePlatform,

    /// `device-target` set with both platform sub-flags.
    #[error(
        "`{}` and `{}` are mutually exclusive for device builds",
        Toggle::TargetLinux.name(),
        Toggle::TargetAndroid.name()
    )]
    AmbiguousDevicePlatform,

    /// A device-only sub-flag on a host build.
    #[error("`{}` set for host build (`{}` is off)", flag.name(), Toggle::DeviceTarget.name())]
    DeviceFlagOnHost {
        /// The offending sub-flag.
        flag: Toggle,
    },

    /// More than one read barrier mechanism selected.
    #[error("read barriers `{}` and `{}` cannot be combined", first.feature_name(), second.feature_name())]
    MultipleReadBarriers {
        /// The first mechanism requested.
        first: ReadBarrierKind,
        /// The conflicting second mechanism.
        second: ReadBarrierKind,
    },

    /// A read barrier without a collector that moves objects.
    #[error(
        "read barrier `{}` requires `{}`",
        kind.feature_name(),
        Toggle::MovingCollector.name()
    )]
    ReadBarrierWithoutMovingCollector {
        /// The mechanism requested.
        kind: ReadBarrierKind,
    },
}

impl ToggleError {
    /// The category this error falls into.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDevicePlatform
            | Self::AmbiguousDevicePlatform
            | Self::DeviceFlagOnHost { .. } => ErrorKind::ConfigurationConflict,
            Self::MultipleReadBarriers { .. } | Self::ReadBarrierWithoutMovingCollector { .. } => {
                ErrorKind::UnsupportedCombination
            }
        }
    }
}

/// Errors that can occur while loading, resolving, or installing a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The toggle set is invalid.
    #[error("invalid configuration: {0}")]
    Toggle(#[from] ToggleError),

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing profile files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file not found.
    #[error("profile file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A profile name that cannot be used as a file name under `profiles/`.
    #[error("invalid profile name '{name}': {reason}")]
    InvalidProfileName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No built-in or discovered profile with this name.
    #[error("unknown build profile: '{name}'")]
    UnknownProfile {
        /// The requested profile name.
        name: String,
    },

    /// The process-wide configuration was already installed.
    #[error("runtime configuration already installed (active profile: '{active}')")]
    AlreadyInstalled {
        /// Name of the profile that is already active.
        active: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
