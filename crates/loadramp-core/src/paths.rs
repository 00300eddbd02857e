use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Default file-layout constants
// ---------------------------------------------------------------------------

/// Scenario file the harness reads; also names the profile archive.
pub const SCENARIO_FILE: &str = "config.tcl";

/// Directory tree that gets repacked into the archive on rebuild.
pub const WORK_DIR: &str = "tmp";

/// Where extracted scenario exports land inside the work tree.
pub const EXPORT_DIR: &str = "tmp/AvExport";

/// Subdirectory of an export that holds the XML load-profile documents.
pub const PROFILES_DIR: &str = "loadprofiles";

/// Export-dir entries that are tool noise, never the export itself.
pub const EXCLUDED_ENTRIES: &[&str] = &["sapee"];

/// Combined harness output is persisted here and re-read as the log source.
pub const LOG_FILE: &str = "obs.log";

/// Settings file for loadramp itself.
pub const SETTINGS_FILE: &str = "loadramp.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}
