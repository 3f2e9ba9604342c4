use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants
// ---------------------------------------------------------------------------

pub const SETTINGS_FILE: &str = "outreach.yaml";
pub const TARGETS_FILE: &str = "targets.txt";
pub const MESSAGES_FILE: &str = "messages.txt";
pub const LEDGER_FILE: &str = "ledger.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

/// Resolve `file` against `root` unless it is already absolute.
pub fn resolve(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}
