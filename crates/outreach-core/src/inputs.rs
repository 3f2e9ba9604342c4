use crate::error::Result;
use std::path::Path;

/// Read one entry per line, trimming surrounding whitespace.
///
/// Blank lines are kept as empty strings; see [`drop_blank`].
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)?;
    Ok(parse_lines(&data))
}

pub fn parse_lines(data: &str) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }
    data.split('\n').map(|l| l.trim().to_string()).collect()
}

/// Remove empty entries, returning how many were dropped. Order is preserved
/// and duplicates are left alone.
pub fn drop_blank(lines: Vec<String>) -> (Vec<String>, usize) {
    let before = lines.len();
    let kept: Vec<String> = lines.into_iter().filter(|l| !l.is_empty()).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn blank_lines_are_preserved() {
        let lines = parse_lines("alice\n  \nbob\r\n");
        assert_eq!(lines, vec!["alice", "", "bob", ""]);
    }

    #[test]
    fn empty_input_has_no_entries() {
        assert!(parse_lines("").is_empty());
    }

    #[test]
    fn drop_blank_keeps_order_and_duplicates() {
        let (kept, dropped) = drop_blank(vec![
            "bob".into(),
            "".into(),
            "alice".into(),
            "bob".into(),
        ]);
        assert_eq!(kept, vec!["bob", "alice", "bob"]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn read_lines_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.txt");
        std::fs::write(&path, "hi there\nhello\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["hi there", "hello", ""]);
    }

    #[test]
    fn read_lines_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(read_lines(&dir.path().join("missing.txt")).is_err());
    }
}
