//! `memcaps layout` and `memcaps null-check` — layout constants.

use anyhow::{Context, Result};
use memcaps::layout::{can_do_implicit_null_check_on, Layout};

/// Print the layout constants.
pub fn show(format: Option<&str>) -> Result<()> {
    let layout = Layout::NATIVE;
    if format == Some("json") {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }
    println!("--- Layout ---");
    println!("  Bits per byte:          {} (log2 {})", layout.bits_per_byte, layout.bits_per_byte_log2);
    println!("  Bits per pointer:       {}", layout.bits_per_intptr);
    println!("  Stack alignment:        {} bytes", layout.stack_alignment);
    println!("  Page size:              {} bytes", layout.page_size);
    println!(
        "  Object alignment:       {} bytes (shift {})",
        layout.object_alignment, layout.object_alignment_shift
    );
    println!("  Large object alignment: {} bytes", layout.large_object_alignment);
    println!("  Heap reference size:    {} bytes", layout.heap_reference_size);
    Ok(())
}

/// Parse an offset given in decimal or `0x`-prefixed hex.
fn parse_offset(text: &str) -> Result<usize> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid offset '{text}'"))
}

/// Report whether each offset may use an implicit null check.
pub fn null_check(offsets: &[String]) -> Result<()> {
    for text in offsets {
        let offset = parse_offset(text)?;
        let verdict = if can_do_implicit_null_check_on(offset) {
            "implicit"
        } else {
            "explicit"
        };
        println!("  {offset:#x}: {verdict}");
    }
    Ok(())
}
