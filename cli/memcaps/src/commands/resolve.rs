//! `memcaps resolve` — print a fully resolved configuration.

use std::path::Path;

use anyhow::{bail, Result};
use memcaps::profile::find_profile;
use memcaps::{RuntimeConfig, BUILD_CONFIG};

/// Resolve `profile` (or the compiled-in configuration) and print it.
pub fn run(profile: Option<&str>, project_dir: Option<&Path>, format: Option<&str>) -> Result<()> {
    let (source, config) = match profile {
        Some(name) => (name.to_string(), find_profile(name, project_dir)?.resolve()?),
        None => ("<build>".to_string(), BUILD_CONFIG),
    };

    match format {
        None | Some("human") => print_config(&source, &config),
        Some("json") => println!("{}", serde_json::to_string_pretty(&config)?),
        Some("toml") => print!("{}", toml::to_string_pretty(&config)?),
        Some(other) => bail!("unknown format '{other}' (expected human, json, or toml)"),
    }
    Ok(())
}

fn print_config(source: &str, config: &RuntimeConfig) {
    let c = &config.capabilities;
    println!("=== Configuration: {source} ===");
    println!();
    println!("--- Platform ---");
    println!("  Identity:             {}", c.platform.name());
    println!("  Target build:         {}", c.is_target_build);
    println!("  Target linux:         {}", c.is_target_linux);
    println!("  Host static build:    {}", c.host_static_build_enabled);
    println!("  Debug build:          {}", c.is_debug_build);
    println!();
    println!("--- Read Barrier ---");
    println!("  Kind:                 {:?}", c.read_barrier);
    println!("  Active:               {}", c.use_read_barrier);
    println!("  Baker or Brooks:      {}", c.use_baker_or_brooks_read_barrier);
    println!(
        "  Emit in compiler:     {}{}",
        c.emit_compiler_read_barrier,
        if c.force_read_barrier { " (forced)" } else { "" }
    );
    println!();
    println!("--- Collector ---");
    println!("  Moving collector:     {}", c.moving_collector);
    println!("  Mark-compact:         {}", c.mark_compact_support);
    println!("  Moving classes:       {}", c.moving_classes);
    println!("  Heap poisoning:       {}", c.poison_heap_references);
    println!("  TLAB:                 {}", c.use_tlab);
    println!();
    println!("--- Policy ---");
    println!("  Trace clock:          {:?}", c.trace_clock_source);
    println!("  Embed class in code:  {}", c.embed_class_in_code);
    println!("  Must relocate:        {}", c.default_must_relocate);
    println!("  Vdex:                 {}", c.is_vdex_enabled);
    println!("  ARM32 soft float:     {}", c.arm32_quick_code_use_soft_float);
}
