//! Output directory preparation and static asset copies.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Outcome of copying the declared static directories and files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyReport {
    /// Destination paths of copied directories and files
    pub copied: Vec<PathBuf>,

    /// Declared sources that were not found
    pub missing: Vec<PathBuf>,
}

/// Delete `dir` if it exists and recreate it empty.
pub fn reset_output_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Find a project path that resetting `output_dir` would delete.
///
/// `sources` are relative to `root`; the root itself is always checked.
/// An output directory that does not exist yet holds nothing to lose.
pub fn overlapping_source(
    root: &Path,
    output_dir: &Path,
    sources: &[PathBuf],
) -> io::Result<Option<PathBuf>> {
    if !output_dir.exists() {
        return Ok(None);
    }

    let output = output_dir.canonicalize()?;
    let root = root.canonicalize()?;
    if root.starts_with(&output) {
        return Ok(Some(root));
    }

    for source in sources {
        let path = root.join(source);
        if !path.exists() {
            continue;
        }
        let path = path.canonicalize()?;
        if path.starts_with(&output) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Recursively copy `src` into `dest`, returning the number of files copied.
pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<usize> {
    let mut count = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        let relative = path.strip_prefix(src).unwrap_or(path);
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
            count += 1;
        }
    }

    Ok(count)
}

/// Copy static directories and files from `root` into `output_dir`.
///
/// Directories keep their relative name; files land at the output root under
/// their file name. Missing sources are warned about and skipped.
pub fn copy_static(
    root: &Path,
    output_dir: &Path,
    dirs: &[PathBuf],
    files: &[PathBuf],
) -> io::Result<CopyReport> {
    let mut report = CopyReport::default();

    for dir in dirs {
        let source = root.join(dir);
        if !source.is_dir() {
            tracing::warn!("Static directory '{}' not found", dir.display());
            report.missing.push(dir.clone());
            continue;
        }

        let target = output_dir.join(dir);
        let count = copy_dir(&source, &target)?;
        tracing::info!("Copied {} ({} files)", dir.display(), count);
        report.copied.push(target);
    }

    for file in files {
        let source = root.join(file);
        let Some(name) = file.file_name() else {
            tracing::warn!("Static file '{}' has no file name", file.display());
            report.missing.push(file.clone());
            continue;
        };

        if !source.is_file() {
            tracing::warn!("Static file '{}' not found", file.display());
            report.missing.push(file.clone());
            continue;
        }

        let target = output_dir.join(name);
        fs::copy(&source, &target)?;
        tracing::info!("Copied {}", file.display());
        report.copied.push(target);
    }

    Ok(report)
}
