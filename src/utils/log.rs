// src/utils/log.rs

//! Console report formatting with server-style timestamps.
//!
//! Diagnostics go through the `log` facade. These helpers print the
//! human-facing summaries of a command run to stdout.

use chrono::Local;

/// Prefix a message with the local timestamp.
fn format_line(message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] {}", timestamp, message)
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    println!("{}", format_line(&border));
    println!("{}", format_line(&format!("  {}", title)));
    println!("{}", format_line(&border));
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    println!("{}", format_line(&format!("    {}", message)));
}

/// Render a summary section without printing it.
pub fn render_summary(title: &str, items: &[(&str, String)]) -> Vec<String> {
    let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut lines = vec![format!("[SUMMARY] {}", title)];
    lines.extend(
        items
            .iter()
            .map(|(key, value)| format!("    {:<width$} : {}", key, value, width = width)),
    );
    lines
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    println!();
    for line in render_summary(title, items) {
        println!("{}", format_line(&line));
    }
}
