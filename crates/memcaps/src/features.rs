//! Compile-time toggle set and guard rails for the features this crate is built with.
//!
//! Contradictory feature combinations fail the build here with a message
//! naming the offending features. Anything that slips past these guards is
//! still rejected when [`crate::config::BUILD_CONFIG`] is const-evaluated.

use crate::error::ToggleError;
use crate::toggles::{ReadBarrierKind, ToggleSet};

#[cfg(all(
    feature = "device-target",
    not(any(feature = "target-linux", feature = "target-android"))
))]
compile_error!(
    "either feature `target-linux` or `target-android` needs to be enabled for `device-target` builds"
);

#[cfg(all(feature = "target-linux", feature = "target-android"))]
compile_error!("features `target-linux` and `target-android` are mutually exclusive");

#[cfg(all(feature = "target-linux", not(feature = "device-target")))]
compile_error!("feature `target-linux` enabled for host build (enable `device-target`)");

#[cfg(all(feature = "target-android", not(feature = "device-target")))]
compile_error!("feature `target-android` enabled for host build (enable `device-target`)");

#[cfg(all(feature = "read-barrier-baker", feature = "read-barrier-brooks"))]
compile_error!("features `read-barrier-baker` and `read-barrier-brooks` are mutually exclusive");

#[cfg(all(feature = "read-barrier-baker", feature = "read-barrier-table-lookup"))]
compile_error!(
    "features `read-barrier-baker` and `read-barrier-table-lookup` are mutually exclusive"
);

#[cfg(all(feature = "read-barrier-brooks", feature = "read-barrier-table-lookup"))]
compile_error!(
    "features `read-barrier-brooks` and `read-barrier-table-lookup` are mutually exclusive"
);

/// Toggles selected by Cargo features. Debug builds follow `debug_assertions`.
pub const fn build_toggles() -> Result<ToggleSet, ToggleError> {
    let read_barrier = match ReadBarrierKind::from_flags(
        cfg!(feature = "read-barrier-baker"),
        cfg!(feature = "read-barrier-brooks"),
        cfg!(feature = "read-barrier-table-lookup"),
    ) {
        Ok(kind) => kind,
        Err(e) => return Err(e),
    };
    let device_target = cfg!(feature = "device-target");

    Ok(ToggleSet {
        device_target,
        target_linux: cfg!(feature = "target-linux"),
        target_android: cfg!(feature = "target-android"),
        read_barrier,
        heap_poisoning: cfg!(feature = "heap-poisoning"),
        tlab: cfg!(feature = "tlab"),
        debug_build: cfg!(debug_assertions),
        vdex: cfg!(feature = "vdex"),
        // Static companion binaries are always built for the host.
        static_host_binaries: !device_target,
        force_read_barrier: cfg!(feature = "force-read-barrier"),
        moving_collector: true,
        mark_compact: false,
    })
}

const TOGGLE_FEATURES: [(&str, bool); 10] = [
    ("device-target", cfg!(feature = "device-target")),
    ("target-linux", cfg!(feature = "target-linux")),
    ("target-android", cfg!(feature = "target-android")),
    ("read-barrier-baker", cfg!(feature = "read-barrier-baker")),
    ("read-barrier-brooks", cfg!(feature = "read-barrier-brooks")),
    ("read-barrier-table-lookup", cfg!(feature = "read-barrier-table-lookup")),
    ("heap-poisoning", cfg!(feature = "heap-poisoning")),
    ("tlab", cfg!(feature = "tlab")),
    ("vdex", cfg!(feature = "vdex")),
    ("force-read-barrier", cfg!(feature = "force-read-barrier")),
];

/// Names of the toggle features enabled in this build, for diagnostics.
pub fn enabled_features() -> Vec<&'static str> {
    TOGGLE_FEATURES
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect()
}
