//! Deterministic file discovery and the vector catalog scan.
//!
//! Two walks live here:
//! - [`gather_svg_files`]: the `*.svg` files directly inside one category
//!   directory, sorted by file name
//! - [`gather_source_files`]: recursive walk of a downstream source tree with
//!   early pruning of build and VCS directories
//!
//! All walks are sequential and sorted so repeated runs see the same order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{IconcatError, IconcatResult, IoResultExt};
use crate::model::Category;
use crate::parse::parse_svg;

/// Directories to exclude by default when walking source trees.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", ".cargo"];

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Gathers the `.svg` files directly inside `dir`, sorted by file name.
pub fn gather_svg_files(dir: &Path) -> IconcatResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            IconcatError::io(dir, io)
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "svg") {
            out.push(path.to_path_buf());
        }
    }
    Ok(out)
}

/// Gathers source files with the given extensions under `root`.
///
/// Automatically excludes `target/`, `.git/`, `node_modules/`, and `.cargo/`.
/// Unreadable entries are logged and skipped; an unreadable `root` is fatal.
pub fn gather_source_files(root: &Path, extensions: &[String]) -> IconcatResult<Vec<PathBuf>> {
    fs::metadata(root).with_path(root)?;

    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let mut out = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
    {
        match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && has_extension(path, extensions) {
                    out.push(path.to_path_buf());
                }
            }
            Err(e) => warn!(error = %e, "skipping unreadable entry"),
        }
    }
    Ok(out)
}

/// One successfully parsed catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedIcon {
    pub stem: String,
    pub category: Category,
    pub view_box: String,
    pub path_data: String,
    pub file: PathBuf,
}

/// Result of scanning a catalog root.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Parsed icons in scan order (category order, then file name)
    pub icons: Vec<ScannedIcon>,
    /// Per-file failures; these files are excluded from `icons`
    pub errors: Vec<IconcatError>,
    /// First license comment seen
    pub license: Option<String>,
    /// Configured category directories that do not exist
    pub missing_roots: Vec<PathBuf>,
}

impl ScanResult {
    /// Number of icons per category.
    pub fn count(&self, category: Category) -> usize {
        self.icons.iter().filter(|i| i.category == category).count()
    }
}

/// Scan `source_root/<scan_root>/*.svg` for every configured scan root.
///
/// Scan roots are processed in category order (Solid, Regular, Brand)
/// regardless of configuration order. A scan root that names no category is
/// an [`IconcatError::InvalidArgument`]; a scan root directory that does not
/// exist is logged and skipped. Unreadable `source_root` aborts the scan.
pub fn scan_catalog(source_root: &Path, scan_roots: &[String]) -> IconcatResult<ScanResult> {
    fs::read_dir(source_root).with_path(source_root)?;

    let mut roots: Vec<(Category, &String)> = Vec::with_capacity(scan_roots.len());
    for name in scan_roots {
        let category = Category::from_dir_name(name).ok_or_else(|| {
            IconcatError::invalid_argument(format!(
                "scan root '{}' does not name a style category",
                name
            ))
        })?;
        roots.push((category, name));
    }
    roots.sort_by_key(|(category, _)| *category);

    let mut result = ScanResult::default();

    for (category, name) in roots {
        let dir = source_root.join(name);
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "category directory does not exist");
            result.missing_roots.push(dir);
            continue;
        }

        let files = gather_svg_files(&dir)?;
        let before = result.icons.len();

        for file in files {
            match scan_file(&file, category) {
                Ok((icon, comment)) => {
                    match (&result.license, comment) {
                        (None, Some(c)) => result.license = Some(c),
                        (Some(expected), Some(c)) if *expected != c => warn!(
                            file = %file.display(),
                            comment = %c,
                            "license comment differs from first file"
                        ),
                        _ => {}
                    }
                    result.icons.push(icon);
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping vector file");
                    result.errors.push(e);
                }
            }
        }

        info!(
            category = %category,
            icons = result.icons.len() - before,
            "scanned category"
        );
    }

    debug!(
        total = result.icons.len(),
        errors = result.errors.len(),
        "catalog scan complete"
    );
    Ok(result)
}

fn scan_file(file: &Path, category: Category) -> IconcatResult<(ScannedIcon, Option<String>)> {
    let content = fs::read_to_string(file).map_err(|e| IconcatError::parse(file, e.to_string()))?;
    let parsed = parse_svg(file, &content)?;
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IconcatError::parse(file, "file stem is not valid UTF-8"))?
        .to_string();

    Ok((
        ScannedIcon {
            stem,
            category,
            view_box: parsed.view_box,
            path_data: parsed.path_data,
            file: file.to_path_buf(),
        },
        parsed.comment,
    ))
}
