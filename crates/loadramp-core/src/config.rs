use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SettingsWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// File layout and retry policy for one working directory.
///
/// Every pipeline operation takes a root plus these settings, so tests run
/// the whole cycle against a temporary directory. Defaults reproduce the
/// layout the harness export uses in production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_scenario_file")]
    pub scenario_file: String,
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: String,
    #[serde(default = "default_excluded_entries")]
    pub excluded_entries: Vec<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_harness_command")]
    pub harness_command: String,
    /// Maximum number of mutate-and-rerun cycles before giving up.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u32,
}

fn default_scenario_file() -> String {
    paths::SCENARIO_FILE.to_string()
}

fn default_work_dir() -> String {
    paths::WORK_DIR.to_string()
}

fn default_export_dir() -> String {
    paths::EXPORT_DIR.to_string()
}

fn default_profiles_dir() -> String {
    paths::PROFILES_DIR.to_string()
}

fn default_excluded_entries() -> Vec<String> {
    paths::EXCLUDED_ENTRIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_log_file() -> String {
    paths::LOG_FILE.to_string()
}

fn default_harness_command() -> String {
    "tclsh test.tcl".to_string()
}

fn default_max_cycles() -> u32 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scenario_file: default_scenario_file(),
            work_dir: default_work_dir(),
            export_dir: default_export_dir(),
            profiles_dir: default_profiles_dir(),
            excluded_entries: default_excluded_entries(),
            log_file: default_log_file(),
            harness_command: default_harness_command(),
            max_cycles: default_max_cycles(),
        }
    }
}

impl Settings {
    /// Load settings from `<root>/loadramp.yaml`, falling back to defaults
    /// when the file is absent.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::settings_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let settings: Settings = serde_yaml::from_str(&data)?;
        Ok(settings)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::settings_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Path accessors
    // -----------------------------------------------------------------------

    pub fn scenario_path(&self, root: &Path) -> PathBuf {
        root.join(&self.scenario_file)
    }

    pub fn work_path(&self, root: &Path) -> PathBuf {
        root.join(&self.work_dir)
    }

    pub fn export_path(&self, root: &Path) -> PathBuf {
        root.join(&self.export_dir)
    }

    pub fn profiles_path(&self, root: &Path, export_name: &str) -> PathBuf {
        self.export_path(root).join(export_name).join(&self.profiles_dir)
    }

    pub fn log_path(&self, root: &Path) -> PathBuf {
        root.join(&self.log_file)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        if self.harness_command.trim().is_empty() {
            warnings.push(SettingsWarning {
                level: WarnLevel::Error,
                message: "harness_command is empty".to_string(),
            });
        }

        if self.max_cycles == 0 {
            warnings.push(SettingsWarning {
                level: WarnLevel::Warning,
                message: "max_cycles=0 never runs the harness".to_string(),
            });
        }

        if self.max_cycles > 100 {
            warnings.push(SettingsWarning {
                level: WarnLevel::Warning,
                message: format!("max_cycles={} (>100 is unusual)", self.max_cycles),
            });
        }

        if !Path::new(&self.export_dir).starts_with(&self.work_dir) {
            warnings.push(SettingsWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "export_dir '{}' is outside work_dir '{}' and will not be repacked",
                    self.export_dir, self.work_dir
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: Settings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.scenario_file, "config.tcl");
        assert_eq!(parsed.export_dir, "tmp/AvExport");
        assert_eq!(parsed.excluded_entries, vec!["sapee".to_string()]);
        assert_eq!(parsed.max_cycles, 10);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "harness_command: tclsh scenario.tcl\nmax_cycles: 3\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.harness_command, "tclsh scenario.tcl");
        assert_eq!(settings.max_cycles, 3);
        assert_eq!(settings.scenario_file, "config.tcl");
        assert_eq!(settings.log_file, "obs.log");
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings.work_dir, "tmp");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.max_cycles = 4;
        settings.save(dir.path()).unwrap();
        let loaded = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.max_cycles, 4);
    }

    #[test]
    fn path_accessors_join_root() {
        let settings = Settings::default();
        let root = Path::new("/srv/bench");
        assert_eq!(
            settings.scenario_path(root),
            PathBuf::from("/srv/bench/config.tcl")
        );
        assert_eq!(
            settings.profiles_path(root, "run1"),
            PathBuf::from("/srv/bench/tmp/AvExport/run1/loadprofiles")
        );
    }

    #[test]
    fn validate_clean_settings_no_warnings() {
        assert!(Settings::default().validate().is_empty());
    }

    #[test]
    fn validate_empty_harness_command() {
        let mut settings = Settings::default();
        settings.harness_command = "  ".to_string();
        let warnings = settings.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("harness_command")));
    }

    #[test]
    fn validate_export_dir_outside_work_dir() {
        let mut settings = Settings::default();
        settings.export_dir = "exports/AvExport".to_string();
        let warnings = settings.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not be repacked")));
    }
}
