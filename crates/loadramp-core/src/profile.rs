use crate::config::Settings;
use crate::error::{RampError, Result};
use roxmltree::Document;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// ProfileSet
// ---------------------------------------------------------------------------

/// The load-profile documents of one export, as found on disk.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    pub export_name: String,
    /// Full path to the profiles directory.
    pub dir: PathBuf,
    /// Profile filenames, sorted for deterministic edit order.
    pub profiles: Vec<String>,
}

/// List the profile documents under the export's `loadprofiles` directory.
pub fn resolve(root: &Path, settings: &Settings, export_name: &str) -> Result<ProfileSet> {
    let dir = settings.profiles_path(root, export_name);
    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            profiles.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    profiles.sort();
    Ok(ProfileSet {
        export_name: export_name.to_string(),
        dir,
        profiles,
    })
}

// ---------------------------------------------------------------------------
// Height editing
// ---------------------------------------------------------------------------

/// Double every ramp-up height in every profile of the set, in place.
///
/// Each document is fully parsed and all its edits computed before it is
/// rewritten atomically: a document is either untouched or carries all of
/// its doubled values. Documents are edited independently; a failure in one
/// leaves the earlier ones already rewritten (the whole cycle aborts and the
/// error propagates, per the no-partial-recovery policy).
///
/// Every change is reported as a `tracing::info!` record carrying the
/// profile name and the new height.
pub fn double_ramp_up_heights(set: &ProfileSet) -> Result<()> {
    for name in &set.profiles {
        let path = set.dir.join(name);
        let xml = std::fs::read_to_string(&path)?;
        let (rewritten, new_heights) = rewrite_heights(name, &xml)?;

        let label = name.strip_suffix(".xml").unwrap_or(name);
        for height in &new_heights {
            info!(profile = label, height, "doubled ramp-up height");
        }

        if new_heights.is_empty() {
            continue;
        }
        crate::io::atomic_write(&path, rewritten.as_bytes())?;
    }
    Ok(())
}

/// Pure edit pass over one document: returns the rewritten text and the new
/// height values, in document order.
///
/// Targets every `Height` child of a `Step` whose `Label` child reads
/// exactly `"Ramp Up"`. The replacement is spliced over the text node's
/// byte range; every byte outside the targeted values survives verbatim.
fn rewrite_heights(file: &str, xml: &str) -> Result<(String, Vec<i64>)> {
    let doc = Document::parse(xml).map_err(|e| RampError::ProfileParse {
        file: file.to_string(),
        source: e,
    })?;

    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut new_heights = Vec::new();

    for step in doc.descendants().filter(|n| n.has_tag_name("Step")) {
        let ramp_up = step
            .children()
            .any(|c| c.has_tag_name("Label") && c.text() == Some("Ramp Up"));
        if !ramp_up {
            continue;
        }

        for height in step.children().filter(|c| c.has_tag_name("Height")) {
            let text_node = height.children().find(|c| c.is_text()).ok_or_else(|| {
                RampError::InvalidHeight {
                    file: file.to_string(),
                    value: String::new(),
                }
            })?;
            let raw = text_node.text().unwrap_or("");
            let value: i64 =
                raw.trim()
                    .parse()
                    .map_err(|_| RampError::InvalidHeight {
                        file: file.to_string(),
                        value: raw.to_string(),
                    })?;
            let doubled = value
                .checked_mul(2)
                .ok_or(RampError::HeightOverflow {
                    file: file.to_string(),
                    value,
                })?;
            edits.push((text_node.range(), doubled.to_string()));
            new_heights.push(doubled);
        }
    }

    // Splice back-to-front so earlier ranges stay valid.
    let mut out = xml.to_string();
    for (range, replacement) in edits.into_iter().rev() {
        out.replace_range(range, &replacement);
    }
    Ok((out, new_heights))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
