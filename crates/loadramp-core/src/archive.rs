use crate::config::Settings;
use crate::error::{RampError, Result};
use crate::scenario;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// Safe extraction
// ---------------------------------------------------------------------------

/// Unpack the named profile archive under `root` and resolve the export
/// directory it contains.
///
/// Every member path is checked before anything touches the filesystem: a
/// single member resolving outside `root` fails the whole extraction with
/// nothing written. Untrusted archives must never be partially extracted.
///
/// Returns the name of the single export directory found under the
/// configured export path. Zero or several candidates (after dropping the
/// excluded entries) is an [`RampError::AmbiguousLayout`]; the layout is
/// asserted, not guessed.
pub fn extract(root: &Path, settings: &Settings, archive: &str) -> Result<String> {
    let archive_path = root.join(archive);

    // First pass: containment check over the full member set.
    let mut members = open_archive(&archive_path)?;
    for entry in members.entries()? {
        let entry = entry?;
        let member = entry.path()?.into_owned();
        if !member_is_contained(&member) {
            return Err(RampError::PathTraversal(member.display().to_string()));
        }
    }

    // Second pass: unpack. The reader was consumed by the scan, so reopen.
    let mut members = open_archive(&archive_path)?;
    for entry in members.entries()? {
        let mut entry = entry?;
        entry.unpack_in(root)?;
    }
    debug!(archive, root = %root.display(), "extracted profile archive");

    resolve_export_dir(root, settings)
}

fn open_archive(path: &Path) -> Result<tar::Archive<GzDecoder<BufReader<File>>>> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}

/// A member stays contained when its path never climbs above the extraction
/// root: no absolute components, and no `..` run that outweighs the normal
/// components before it.
fn member_is_contained(member: &Path) -> bool {
    let mut depth: i32 = 0;
    for component in member.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return false,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::CurDir => {}
            Component::Normal(_) => depth += 1,
        }
    }
    true
}

fn resolve_export_dir(root: &Path, settings: &Settings) -> Result<String> {
    let export_path = settings.export_path(root);
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(&export_path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if settings.excluded_entries.iter().any(|e| e == &name) {
            continue;
        }
        candidates.push(name);
    }

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        found => Err(RampError::AmbiguousLayout {
            dir: export_path.display().to_string(),
            found,
        }),
    }
}

// ---------------------------------------------------------------------------
// Rebuild
// ---------------------------------------------------------------------------

/// Delete the profile archive and repack the entire work tree under the same
/// name, gzip-compressed GNU tar.
///
/// The whole work directory is captured, stray files included; the archive
/// must mirror what the last extraction and edits left on disk. The name
/// is re-derived from the scenario file rather than threaded through the
/// pipeline, so a rebuild always targets whatever the scenario references.
///
/// There is no rollback between the delete and the create: a failure in
/// between leaves no archive behind, and the error says so.
pub fn rebuild(root: &Path, settings: &Settings) -> Result<()> {
    let archive = scenario::archive_name(&settings.scenario_path(root))?;
    let archive_path = root.join(&archive);
    std::fs::remove_file(&archive_path)?;

    let file = File::create(&archive_path)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);

    let work_path = settings.work_path(root);
    for entry in WalkDir::new(&work_path)
        .follow_links(false)
        .sort_by(|a, b| a.path().cmp(b.path()))
    {
        let entry = entry.map_err(|e| RampError::Io(e.into()))?;
        let path = entry.path();
        // Member names are root-relative ("tmp/..."), matching what the
        // next extraction expects.
        let Ok(member) = path.strip_prefix(root) else {
            continue;
        };
        if entry.file_type().is_dir() {
            builder.append_dir(member, path)?;
        } else {
            builder.append_path_with_name(path, member)?;
        }
    }

    builder.into_inner()?.finish()?;
    info!(archive = %archive, "rebuilt profile archive from work tree");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
