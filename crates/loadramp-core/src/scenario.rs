use crate::error::{RampError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Archive reference
// ---------------------------------------------------------------------------

static ARCHIVE_RE: OnceLock<Regex> = OnceLock::new();

fn archive_re() -> &'static Regex {
    ARCHIVE_RE.get_or_init(|| Regex::new(r"\{\s*([^}\s]+\.spf)").unwrap())
}

/// Extract the profile-archive filename referenced by the scenario file.
///
/// The reference lives on the first line carrying an `.spf` token, as a
/// brace-quoted Tcl word: `RunArchive {loadtest.spf}`. A scenario without
/// such a line, or with a matching line whose token is not brace-quoted,
/// is an error, never a panic on an empty match set.
pub fn archive_name(scenario: &Path) -> Result<String> {
    let content = std::fs::read_to_string(scenario)?;
    let line = content
        .lines()
        .find(|l| l.contains(".spf"))
        .ok_or_else(|| RampError::ArchiveRefNotFound(scenario.display().to_string()))?;
    let caps = archive_re()
        .captures(line)
        .ok_or_else(|| RampError::ArchiveRefMalformed(line.to_string()))?;
    Ok(caps[1].to_string())
}

// ---------------------------------------------------------------------------
// Ramp-up mapping (legacy, read-only)
// ---------------------------------------------------------------------------

static LOAD_RE: OnceLock<Regex> = OnceLock::new();
static HEIGHT_RE: OnceLock<Regex> = OnceLock::new();

fn load_re() -> &'static Regex {
    LOAD_RE.get_or_init(|| Regex::new(r"loads\s+(\w+)").unwrap())
}

fn height_re() -> &'static Regex {
    HEIGHT_RE.get_or_init(|| Regex::new(r"step\s*2\s+height\s*\(\s*(\d+)").unwrap())
}

/// Pair each `loads <name>` token with its `step2 height(N)` value, in file
/// order.
///
/// This is the scenario-level view of the ramp-up heights. The authoritative
/// edit path works on the XML profile documents; this mapping exists for
/// observability only. Load names and height tokens must come in equal
/// numbers, and load names must be unique.
pub fn ramp_up_heights(scenario: &Path) -> Result<BTreeMap<String, i64>> {
    let content = std::fs::read_to_string(scenario)?;

    let names: Vec<&str> = content
        .lines()
        .filter_map(|l| load_re().captures(l))
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    let heights: Vec<i64> = content
        .lines()
        .filter_map(|l| height_re().captures(l))
        // the pattern only matches ASCII digits, so this parse can only
        // fail on overflow; treat that as "not a height token"
        .filter_map(|c| c.get(1).unwrap().as_str().parse().ok())
        .collect();

    if names.len() != heights.len() {
        return Err(RampError::HeightMapMismatch {
            loads: names.len(),
            heights: heights.len(),
        });
    }

    let mut map = BTreeMap::new();
    for (name, height) in names.into_iter().zip(heights) {
        if map.insert(name.to_string(), height).is_some() {
            return Err(RampError::DuplicateLoadName(name.to_string()));
        }
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
