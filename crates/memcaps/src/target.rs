//! Target platform identity.
//!
//! Reduces the three platform toggles to exactly one identity, or rejects
//! the combination.

use serde::{Deserialize, Serialize};

use crate::error::ToggleError;
use crate::toggles::{Toggle, ToggleSet};

/// The platform a build is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformIdentity {
    /// The development host.
    Host,
    /// A device running a plain Linux kernel. Memory mappings do not use ashmem.
    DeviceLinux,
    /// A device running Android.
    DeviceAndroid,
}

impl PlatformIdentity {
    /// Whether this is any device (non-host) build.
    pub const fn is_target_build(self) -> bool {
        !matches!(self, Self::Host)
    }

    /// Whether this is a device build on a plain Linux kernel.
    pub const fn is_target_linux(self) -> bool {
        matches!(self, Self::DeviceLinux)
    }

    /// Whether the target operating system runs a Linux kernel.
    ///
    /// Every device target does; the host answer follows the OS this crate
    /// is compiled for.
    pub const fn runs_linux_kernel(self) -> bool {
        match self {
            Self::Host => cfg!(target_os = "linux"),
            Self::DeviceLinux | Self::DeviceAndroid => true,
        }
    }

    /// Short name for display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::DeviceLinux => "device-linux",
            Self::DeviceAndroid => "device-android",
        }
    }
}

/// Validate the platform toggles and return the single identity they describe.
pub const fn validate_target(
    device_target: bool,
    target_linux: bool,
    target_android: bool,
) -> Result<PlatformIdentity, ToggleError> {
    match (device_target, target_linux, target_android) {
        (true, true, false) => Ok(PlatformIdentity::DeviceLinux),
        (true, false, true) => Ok(PlatformIdentity::DeviceAndroid),
        (true, false, false) => Err(ToggleError::MissingDevicePlatform),
        (true, true, true) => Err(ToggleError::AmbiguousDevicePlatform),
        (false, false, false) => Ok(PlatformIdentity::Host),
        (false, true, _) => Err(ToggleError::DeviceFlagOnHost {
            flag: Toggle::TargetLinux,
        }),
        (false, false, true) => Err(ToggleError::DeviceFlagOnHost {
            flag: Toggle::TargetAndroid,
        }),
    }
}

/// Validate the platform toggles of a full toggle set.
pub const fn platform_of(toggles: &ToggleSet) -> Result<PlatformIdentity, ToggleError> {
    validate_target(
        toggles.device_target,
        toggles.target_linux,
        toggles.target_android,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_three_combinations() {
        let mut accepted = Vec::new();
        for bits in 0u8..8 {
            let (device, linux, android) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            if let Ok(identity) = validate_target(device, linux, android) {
                accepted.push((device, linux, android, identity));
            }
        }
        assert_eq!(
            accepted,
            vec![
                (false, false, false, PlatformIdentity::Host),
                (true, true, false, PlatformIdentity::DeviceLinux),
                (true, false, true, PlatformIdentity::DeviceAndroid),
            ]
        );
    }

    #[test]
    fn device_without_platform() {
        assert_eq!(
            validate_target(true, false, false),
            Err(ToggleError::MissingDevicePlatform)
        );
    }

    #[test]
    fn device_with_both_platforms() {
        assert_eq!(
            validate_target(true, true, true),
            Err(ToggleError::AmbiguousDevicePlatform)
        );
    }

    #[test]
    fn host_with_device_flags() {
        assert_eq!(
            validate_target(false, true, false),
            Err(ToggleError::DeviceFlagOnHost {
                flag: Toggle::TargetLinux
            })
        );
        assert_eq!(
            validate_target(false, false, true),
            Err(ToggleError::DeviceFlagOnHost {
                flag: Toggle::TargetAndroid
            })
        );
    }

    #[test]
    fn identity_predicates_are_exclusive() {
        for identity in [
            PlatformIdentity::Host,
            PlatformIdentity::DeviceLinux,
            PlatformIdentity::DeviceAndroid,
        ] {
            let host = !identity.is_target_build();
            let linux = identity.is_target_linux();
            let android = identity.is_target_build() && !identity.is_target_linux();
            assert_eq!([host, linux, android].iter().filter(|b| **b).count(), 1);
        }
    }

    #[test]
    fn devices_run_linux() {
        assert!(PlatformIdentity::DeviceLinux.runs_linux_kernel());
        assert!(PlatformIdentity::DeviceAndroid.runs_linux_kernel());
        assert_eq!(
            PlatformIdentity::Host.runs_linux_kernel(),
            cfg!(target_os = "linux")
        );
    }

    #[test]
    fn presets_validate() {
        assert_eq!(platform_of(&ToggleSet::HOST), Ok(PlatformIdentity::Host));
        assert_eq!(
            platform_of(&ToggleSet::ANDROID),
            Ok(PlatformIdentity::DeviceAndroid)
        );
        assert_eq!(
            platform_of(&ToggleSet::DEVICE_LINUX),
            Ok(PlatformIdentity::DeviceLinux)
        );
    }
}
