//! Build-time capability resolution for a managed runtime's memory subsystem.
//!
//! Independent build toggles are resolved into one consistent configuration:
//! - **Toggles:** platform identity, read barrier kind, heap poisoning, TLAB, ...
//! - **Capabilities:** derived flags the collector, allocator and compiler backend branch on
//! - **Layout:** fixed alignment, page and reference sizes
//!
//! Consumers read [`active()`] (or the compiled-in [`BUILD_CONFIG`]) and never
//! re-derive these values themselves.

pub mod capability;
pub mod config;
pub mod error;
pub mod features;
pub mod layout;
pub mod profile;
pub mod target;
pub mod toggles;

pub use capability::{Capabilities, TraceClockSource};
pub use config::{active, install, RuntimeConfig, BUILD_CONFIG};
pub use error::{ConfigError, ErrorKind, Result, ToggleError};
pub use layout::can_do_implicit_null_check_on;
pub use profile::BuildProfile;
pub use target::PlatformIdentity;
pub use toggles::{ReadBarrierKind, Toggle, ToggleSet};
