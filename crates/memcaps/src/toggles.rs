//! Raw build-time toggles.
//!
//! A [`ToggleSet`] is the unresolved input to the capability resolver: one
//! value per independent build switch, fixed for the lifetime of an artifact.
//! The compiled-in set comes from Cargo features (see [`crate::features`]);
//! tooling reads others from build profiles.

use serde::{Deserialize, Serialize};

use crate::error::ToggleError;

/// Names of individual toggles, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Toggle {
    /// See [`ToggleSet::device_target`].
    DeviceTarget,
    /// See [`ToggleSet::target_linux`].
    TargetLinux,
    /// See [`ToggleSet::target_android`].
    TargetAndroid,
    /// See [`ToggleSet::read_barrier`].
    ReadBarrier,
    /// See [`ToggleSet::heap_poisoning`].
    HeapPoisoning,
    /// See [`ToggleSet::tlab`].
    Tlab,
    /// See [`ToggleSet::debug_build`].
    DebugBuild,
    /// See [`ToggleSet::vdex`].
    Vdex,
    /// See [`ToggleSet::static_host_binaries`].
    StaticHostBinaries,
    /// See [`ToggleSet::force_read_barrier`].
    ForceReadBarrier,
    /// See [`ToggleSet::moving_collector`].
    MovingCollector,
    /// See [`ToggleSet::mark_compact`].
    MarkCompact,
}

impl Toggle {
    /// The build name of this toggle (Cargo feature / profile key).
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeviceTarget => "device-target",
            Self::TargetLinux => "target-linux",
            Self::TargetAndroid => "target-android",
            Self::ReadBarrier => "read-barrier",
            Self::HeapPoisoning => "heap-poisoning",
            Self::Tlab => "tlab",
            Self::DebugBuild => "debug-build",
            Self::Vdex => "vdex",
            Self::StaticHostBinaries => "static-host-binaries",
            Self::ForceReadBarrier => "force-read-barrier",
            Self::MovingCollector => "moving-collector",
            Self::MarkCompact => "mark-compact",
        }
    }
}

/// Which read barrier mechanism, if any, the build uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadBarrierKind {
    /// No read barrier.
    #[default]
    None,
    /// Lock-word based barrier; the object header carries the forwarding state.
    Baker,
    /// Indirection through a per-object forwarding pointer.
    Brooks,
    /// Lookup in a side table keyed by reference.
    TableLookup,
}

impl ReadBarrierKind {
    /// Combine the three independent mechanism flags into a single kind.
    ///
    /// The flags arrive unchecked from the build system, so more than one
    /// set is rejected here rather than silently picking one.
    pub const fn from_flags(
        baker: bool,
        brooks: bool,
        table_lookup: bool,
    ) -> Result<Self, ToggleError> {
        match (baker, brooks, table_lookup) {
            (false, false, false) => Ok(Self::None),
            (true, false, false) => Ok(Self::Baker),
            (false, true, false) => Ok(Self::Brooks),
            (false, false, true) => Ok(Self::TableLookup),
            (true, true, _) => Err(ToggleError::MultipleReadBarriers {
                first: Self::Baker,
                second: Self::Brooks,
            }),
            (true, false, true) => Err(ToggleError::MultipleReadBarriers {
                first: Self::Baker,
                second: Self::TableLookup,
            }),
            (false, true, true) => Err(ToggleError::MultipleReadBarriers {
                first: Self::Brooks,
                second: Self::TableLookup,
            }),
        }
    }

    /// Whether any read barrier is in use.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// The Cargo feature selecting this mechanism.
    pub const fn feature_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Baker => "read-barrier-baker",
            Self::Brooks => "read-barrier-brooks",
            Self::TableLookup => "read-barrier-table-lookup",
        }
    }
}

/// One value for every independent build switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToggleSet {
    /// Building for a device rather than the development host.
    pub device_target: bool,
    /// Device runs a plain Linux kernel (no Android-specific kernel features).
    pub target_linux: bool,
    /// Device runs Android.
    pub target_android: bool,
    /// Read barrier mechanism.
    pub read_barrier: ReadBarrierKind,
    /// References within the heap are stored negated.
    pub heap_poisoning: bool,
    /// Thread-local allocation buffers are the default allocator.
    pub tlab: bool,
    /// Debug build (assertions and extra checking).
    pub debug_build: bool,
    /// Vdex files are produced and consumed.
    pub vdex: bool,
    /// Statically linked companion binaries are built. Only honoured on host.
    pub static_host_binaries: bool,
    /// Transitional: emit compiler read barrier instrumentation without
    /// selecting a read barrier. Slated for removal once the compiler
    /// instrumentation no longer needs to land ahead of the collector.
    pub force_read_barrier: bool,
    /// The collector may relocate objects.
    pub moving_collector: bool,
    /// Request mark-compact support. Only takes effect with a moving collector.
    pub mark_compact: bool,
}

impl ToggleSet {
    /// A host build with every optional feature off.
    pub const HOST: Self = Self {
        device_target: false,
        target_linux: false,
        target_android: false,
        read_barrier: ReadBarrierKind::None,
        heap_poisoning: false,
        tlab: false,
        debug_build: false,
        vdex: false,
        static_host_binaries: true,
        force_read_barrier: false,
        moving_collector: true,
        mark_compact: false,
    };

    /// An Android device build with every optional feature off.
    pub const ANDROID: Self = Self {
        device_target: true,
        target_android: true,
        static_host_binaries: false,
        ..Self::HOST
    };

    /// A Linux device build with every optional feature off.
    pub const DEVICE_LINUX: Self = Self {
        device_target: true,
        target_linux: true,
        static_host_binaries: false,
        ..Self::HOST
    };
}

impl Default for ToggleSet {
    fn default() -> Self {
        Self::HOST
    }
}
