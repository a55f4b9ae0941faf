//! Rendering a window of a source file around a line.

use crate::debugger::error::Result;
use std::path::Path;

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(String::from).collect())
}

/// `[focal - context, focal + context]`, shifted right at the start of the
/// file so the window always spans `2 * context + 1` lines when the file is
/// long enough.
fn window(focal_line: u64, context: u64) -> (u64, u64) {
    if focal_line <= context {
        (1, 2 * context + 1)
    } else {
        (focal_line - context, focal_line + context)
    }
}

/// The focal line prefixed `"> "`, its neighbors `"  "`; used for the
/// `step`/`break`/`continue` stop output.
pub fn render_focal(path: &Path, focal_line: u64, context: u64) -> Result<String> {
    let lines = read_lines(path)?;
    let (start, end) = window(focal_line, context);
    let end = end.min(lines.len() as u64);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get((n - 1) as usize).map(String::as_str).unwrap_or("");
        let marker = if n == focal_line { "> " } else { "  " };
        out.push_str(&format!("{marker}{n}\t{text}\n"));
    }
    Ok(out)
}

/// Every line in `[start_line, end_line]` prefixed `"  "` and no focal
/// marker; the silent variant used by `show`.
pub fn render_range_silent(path: &Path, start_line: u64, end_line: u64) -> Result<String> {
    let lines = read_lines(path)?;
    let end = end_line.min(lines.len() as u64);

    let mut out = String::new();
    for n in start_line..=end {
        let text = lines.get((n - 1) as usize).map(String::as_str).unwrap_or("");
        out.push_str(&format!("  {n}\t{text}\n"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_shifts_right_near_file_start() {
        assert_eq!(window(1, 2), (1, 5));
        assert_eq!(window(2, 2), (1, 5));
        assert_eq!(window(10, 2), (8, 12));
    }

    #[test]
    fn render_focal_marks_only_the_focal_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "a\nb\nc\nd\ne\nf\ng\n").unwrap();
        let rendered = render_focal(&path, 4, 1).unwrap();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines, vec!["  3\tc", "> 4\td", "  5\te"]);
    }

    #[test]
    fn render_range_silent_has_no_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "a\nb\nc\n").unwrap();
        let rendered = render_range_silent(&path, 1, 3).unwrap();
        assert!(rendered.lines().all(|l| l.starts_with("  ")));
        assert_eq!(rendered.lines().count(), 3);
    }
}
