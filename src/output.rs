//! CLI output formatting for the `render` command.
//!
//! One line per written file, then a total:
//!
//! ```text
//! png   220x160  1.2 KiB  out/placeholder-220x160.png
//! webp  220x160  864 B    out/placeholder-220x160.webp
//! Rendered 2 files
//! ```
//!
//! `format_*` functions return `Vec<String>` for testability; `print_*`
//! wrappers write them to stdout.

use crate::render::RenderedFile;

/// Human-readable byte count: bytes below 1 KiB, one decimal above.
fn human_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / MIB)
    }
}

/// A single file line.
pub fn format_render_line(file: &RenderedFile) -> String {
    format!(
        "{:<5} {:<8} {:<8} {}",
        file.format.token(),
        format!("{}x{}", file.size.width, file.size.height),
        human_bytes(file.bytes),
        file.path.display()
    )
}

/// File lines followed by a summary.
pub fn format_render_output(files: &[RenderedFile]) -> Vec<String> {
    let mut lines: Vec<String> = files.iter().map(format_render_line).collect();
    let noun = if files.len() == 1 { "file" } else { "files" };
    lines.push(format!("Rendered {} {noun}", files.len()));
    lines
}

pub fn print_render_output(files: &[RenderedFile]) {
    for line in format_render_output(files) {
        println!("{line}");
    }
}
