//! Table formatting utilities for CLI output.

use std::fmt::Write;

use matdb_core::{Library, LibraryEntry};

use super::json::encode_icon;

const ICON_PREVIEW: usize = 16;

/// Truncates a string to at most `max_len` characters, ending in "..." if cut.
///
/// # Examples
///
/// ```rust
/// use matdb_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn separator(width: usize) -> String {
    "-".repeat(width)
}

/// Libraries as a table: name, access, icon preview.
pub fn format_libraries(libraries: &[Library]) -> String {
    let mut out = format!("{:<30} {:<10} Icon\n", "Name", "Access");
    out.push_str(&separator(64));
    out.push('\n');
    for library in libraries {
        let access = if library.read_only { "read-only" } else { "writable" };
        let icon = library.icon.as_deref().map_or_else(
            || "--".to_string(),
            |i| truncate_string(&encode_icon(i), ICON_PREVIEW),
        );
        let _ = writeln!(
            out,
            "{:<30} {:<10} {icon}",
            truncate_string(&library.name, 29),
            access
        );
    }
    out
}

/// Models or materials as a table: uuid, folder path, name.
pub fn format_entries(entries: &[LibraryEntry]) -> String {
    let mut out = format!("{:<36} {:<30} Name\n", "UUID", "Path");
    out.push_str(&separator(90));
    out.push('\n');
    for entry in entries {
        let path = if entry.path.is_empty() { "/" } else { &entry.path };
        let _ = writeln!(
            out,
            "{:<36} {:<30} {}",
            entry.uuid,
            truncate_string(path, 29),
            entry.name
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_needs_truncation() {
        assert_eq!(truncate_string("this is a very long string", 10), "this is...");
        assert_eq!(truncate_string("exactly10c", 10), "exactly10c");
    }

    #[test]
    fn test_truncate_string_counts_characters() {
        assert_eq!(truncate_string("Größenordnung", 8), "Größe...");
    }

    #[test]
    fn test_entries_show_root_as_slash() {
        let entries = [LibraryEntry {
            uuid: "92589471-a6cb-4bbc-b748-d425a17dea7d".to_string(),
            path: String::new(),
            name: "Steel".to_string(),
        }];
        let table = format_entries(&entries);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("92589471-a6cb-4bbc-b748-d425a17dea7d /"));
        assert!(row.ends_with("Steel"));
    }

    #[test]
    fn test_library_table_marks_access() {
        let libraries = [
            Library::new("System").read_only(true),
            Library::new("User").with_icon(Some(vec![1, 2, 3])),
        ];
        let table = format_libraries(&libraries);
        assert!(table.contains("read-only"));
        assert!(table.contains("AQID"));
    }
}
