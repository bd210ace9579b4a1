//! Capability resolution.
//!
//! Turns a [`ToggleSet`] into the derived flags that the allocator, the
//! collector and the compiler backend branch on. Everything here is a fixed
//! boolean formula over the toggles; nothing is set directly.

use serde::{Deserialize, Serialize};

use crate::error::ToggleError;
use crate::target::{platform_of, PlatformIdentity};
use crate::toggles::{ReadBarrierKind, ToggleSet};

/// Kinds of tracing clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceClockSource {
    /// Per-thread CPU time.
    ThreadCpu,
    /// Wall-clock time.
    Wall,
    /// Both wall and thread CPU clocks.
    Dual,
}

impl TraceClockSource {
    /// Default clock for a platform: dual where the kernel exposes a cheap
    /// per-thread CPU clock next to the wall clock.
    pub const fn default_for(platform: PlatformIdentity) -> Self {
        if platform.runs_linux_kernel() {
            Self::Dual
        } else {
            Self::Wall
        }
    }
}

/// If true, the quick compiler embeds class pointers in the compiled code, if possible.
pub const EMBED_CLASS_IN_CODE: bool = true;
/// Whether boot images are relocated by default.
pub const DEFAULT_MUST_RELOCATE: bool = false;
/// Whether quick code on 32-bit ARM uses the soft-float calling convention.
pub const ARM32_QUICK_CODE_USE_SOFT_FLOAT: bool = false;

/// The resolved capability flags of one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Capabilities {
    /// The single platform the toggles describe.
    pub platform: PlatformIdentity,
    /// Any device (non-host) build.
    pub is_target_build: bool,
    /// Device build on a plain Linux kernel.
    pub is_target_linux: bool,
    /// Statically linked companion binaries are available. Never on devices.
    pub host_static_build_enabled: bool,
    /// Debug build (assertions and extra checking).
    pub is_debug_build: bool,

    /// The selected read barrier mechanism.
    pub read_barrier: ReadBarrierKind,
    /// The Baker read barrier is in use.
    pub use_baker_read_barrier: bool,
    /// The Brooks read barrier is in use.
    pub use_brooks_read_barrier: bool,
    /// The table-lookup read barrier is in use.
    pub use_table_lookup_read_barrier: bool,
    /// Either the Baker or the Brooks read barrier is in use.
    pub use_baker_or_brooks_read_barrier: bool,
    /// Some read barrier is in use.
    pub use_read_barrier: bool,
    /// Transitional override carried through from the toggles.
    pub force_read_barrier: bool,
    /// The compiler emits read barrier instrumentation.
    pub emit_compiler_read_barrier: bool,

    /// Heap references are stored negated.
    pub poison_heap_references: bool,
    /// Thread-local allocation buffers are the default allocator.
    pub use_tlab: bool,
    /// Vdex files are produced and consumed.
    pub is_vdex_enabled: bool,

    /// The collector may relocate objects.
    pub moving_collector: bool,
    /// Mark-compact collection is available. Implies a moving collector.
    pub mark_compact_support: bool,
    /// True if classes may be moved by the collector.
    pub moving_classes: bool,

    /// Default clock for method tracing.
    pub trace_clock_source: TraceClockSource,
    /// See [`EMBED_CLASS_IN_CODE`].
    pub embed_class_in_code: bool,
    /// See [`DEFAULT_MUST_RELOCATE`].
    pub default_must_relocate: bool,
    /// See [`ARM32_QUICK_CODE_USE_SOFT_FLOAT`].
    pub arm32_quick_code_use_soft_float: bool,
}

/// Resolve a toggle set into capabilities.
///
/// Rejects contradictory platform toggles and unsupported barrier/collector
/// combinations. Everything else is total.
pub const fn resolve(toggles: &ToggleSet) -> Result<Capabilities, ToggleError> {
    let platform = match platform_of(toggles) {
        Ok(p) => p,
        Err(e) => return Err(e),
    };

    let read_barrier = toggles.read_barrier;
    let use_read_barrier = read_barrier.is_active();
    if use_read_barrier && !toggles.moving_collector {
        return Err(ToggleError::ReadBarrierWithoutMovingCollector { kind: read_barrier });
    }
    let use_baker = matches!(read_barrier, ReadBarrierKind::Baker);
    let use_brooks = matches!(read_barrier, ReadBarrierKind::Brooks);

    let moving_collector = toggles.moving_collector;
    let mark_compact_support = toggles.mark_compact && moving_collector;

    Ok(Capabilities {
        platform,
        is_target_build: platform.is_target_build(),
        is_target_linux: platform.is_target_linux(),
        host_static_build_enabled: !platform.is_target_build() && toggles.static_host_binaries,
        is_debug_build: toggles.debug_build,

        read_barrier,
        use_baker_read_barrier: use_baker,
        use_brooks_read_barrier: use_brooks,
        use_table_lookup_read_barrier: matches!(read_barrier, ReadBarrierKind::TableLookup),
        use_baker_or_brooks_read_barrier: use_baker || use_brooks,
        use_read_barrier,
        force_read_barrier: toggles.force_read_barrier,
        emit_compiler_read_barrier: toggles.force_read_barrier || use_read_barrier,

        poison_heap_references: toggles.heap_poisoning,
        use_tlab: toggles.tlab,
        is_vdex_enabled: toggles.vdex,

        moving_collector,
        mark_compact_support,
        moving_classes: moving_collector && !mark_compact_support,

        trace_clock_source: TraceClockSource::default_for(platform),
        embed_class_in_code: EMBED_CLASS_IN_CODE,
        default_must_relocate: DEFAULT_MUST_RELOCATE,
        arm32_quick_code_use_soft_float: ARM32_QUICK_CODE_USE_SOFT_FLOAT,
    })
}
