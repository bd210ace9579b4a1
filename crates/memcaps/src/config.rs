//! The resolved runtime configuration and its process-wide instance.
//!
//! [`BUILD_CONFIG`] is resolved from Cargo features during compilation; an
//! invalid feature set never produces an artifact. Tools that work on behalf
//! of another build (for example a compiler emitting code for a device) may
//! [`install`] a profile-derived configuration once at startup instead.
//! Either way, [`active`] hands out the same value for the rest of the process.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::capability::{self, Capabilities};
use crate::error::{ConfigError, Result, ToggleError};
use crate::features;
use crate::layout::Layout;
use crate::toggles::ToggleSet;

/// One immutable, fully resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// The raw toggles this configuration was resolved from.
    pub toggles: ToggleSet,
    /// Derived capability flags.
    pub capabilities: Capabilities,
    /// Layout constants.
    pub layout: Layout,
}

impl RuntimeConfig {
    /// Resolve a toggle set. Usable in `const` context.
    pub const fn from_toggles(toggles: ToggleSet) -> std::result::Result<Self, ToggleError> {
        match capability::resolve(&toggles) {
            Ok(capabilities) => Ok(Self {
                toggles,
                capabilities,
                layout: Layout::NATIVE,
            }),
            Err(e) => Err(e),
        }
    }

    /// Resolve a toggle set, logging the outcome.
    pub fn resolve(toggles: ToggleSet) -> Result<Self> {
        let config = Self::from_toggles(toggles).map_err(|e| {
            log::error!("rejected toggle set ({:?}): {e}", e.kind());
            ConfigError::from(e)
        })?;
        let caps = &config.capabilities;
        if toggles.force_read_barrier {
            log::warn!(
                "`force-read-barrier` is transitional; compiler read barriers are emitted without a read barrier collector"
            );
        }
        log::debug!(
            "resolved {} configuration: read barrier {:?}, emit compiler read barrier {}, heap poisoning {}, tlab {}",
            caps.platform.name(),
            caps.read_barrier,
            caps.emit_compiler_read_barrier,
            caps.poison_heap_references,
            caps.use_tlab
        );
        Ok(config)
    }

    /// Whether an implicit null check is safe at `offset` under this layout.
    pub const fn can_do_implicit_null_check_on(&self, offset: usize) -> bool {
        offset < self.layout.page_size
    }
}

/// The configuration selected by this build's Cargo features.
pub static BUILD_CONFIG: RuntimeConfig = {
    let resolved = match features::build_toggles() {
        Ok(toggles) => RuntimeConfig::from_toggles(toggles),
        Err(e) => Err(e),
    };
    match resolved {
        Ok(config) => config,
        Err(e) => panic!("{}", build_failure_message(e)),
    }
};

/// Compile-time diagnostic for a rejected Cargo feature set.
const fn build_failure_message(e: ToggleError) -> &'static str {
    match e {
        ToggleError::MissingDevicePlatform => {
            "invalid build configuration: `device-target` needs `target-linux` or `target-android`"
        }
        ToggleError::AmbiguousDevicePlatform => {
            "invalid build configuration: `target-linux` and `target-android` are mutually exclusive"
        }
        ToggleError::DeviceFlagOnHost { .. } => {
            "invalid build configuration: device platform feature enabled without `device-target`"
        }
        ToggleError::MultipleReadBarriers { .. } => {
            "invalid build configuration: more than one read barrier feature enabled"
        }
        ToggleError::ReadBarrierWithoutMovingCollector { .. } => {
            "invalid build configuration: read barrier selected without a moving collector"
        }
    }
}

struct Installed {
    source: String,
    config: RuntimeConfig,
}

static ACTIVE: OnceLock<Installed> = OnceLock::new();

const BUILD_SOURCE: &str = "<build>";

/// Install the process-wide configuration.
///
/// Must happen before the first call to [`active`]; afterwards the
/// configuration is fixed and this returns [`ConfigError::AlreadyInstalled`].
pub fn install(source: impl Into<String>, config: RuntimeConfig) -> Result<&'static RuntimeConfig> {
    let source = source.into();
    let mut fresh = false;
    let installed = ACTIVE.get_or_init(|| {
        fresh = true;
        Installed {
            source: source.clone(),
            config,
        }
    });
    if !fresh {
        return Err(ConfigError::AlreadyInstalled {
            active: installed.source.clone(),
        });
    }
    log::info!(
        "installed runtime configuration from '{source}' ({})",
        config.capabilities.platform.name()
    );
    Ok(&installed.config)
}

/// The process-wide configuration.
///
/// Falls back to [`BUILD_CONFIG`] if nothing was installed, and pins that
/// choice for the rest of the process.
pub fn active() -> &'static RuntimeConfig {
    &ACTIVE
        .get_or_init(|| Installed {
            source: BUILD_SOURCE.into(),
            config: BUILD_CONFIG,
        })
        .config
}

/// Where the active configuration came from, if it has been fixed yet.
pub fn active_source() -> Option<&'static str> {
    ACTIVE.get().map(|i| i.source.as_str())
}
