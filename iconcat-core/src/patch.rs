//! Incremental patching of an existing generated artifact.
//!
//! Purely additive: new declarations are inserted immediately before the last
//! closing brace in the file (the end of the `icons` scope). Every byte before
//! and after the insertion point is preserved. Patched declarations land in a
//! single scope, so they use flat-qualified names in both layouts.
//!
//! Callers decide which records are new; see [`crate::inventory`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::codegen::{write_declaration, INDENT};
use crate::error::{IconcatError, IconcatResult, IoResultExt};
use crate::model::{IconRecord, Layout};
use crate::naming::{is_valid_identifier, qualified_name};

/// Result of a patch operation.
#[derive(Debug, Clone, Serialize)]
pub struct PatchResult {
    pub path: PathBuf,
    /// Declared names, in insertion order
    pub inserted: Vec<String>,
    /// Patched text was not written back
    pub dry_run: bool,
    /// Full text after patching
    #[serde(skip)]
    pub text: String,
}

/// Name a record is declared under when patched in.
pub fn patch_name(record: &IconRecord) -> String {
    qualified_name(&record.identifier, record.category, Layout::Flat)
}

/// Insert declarations for `records` before the last `}` of `original`.
///
/// Returns the patched text and the inserted names, or `None` when the text
/// has no closing brace.
pub fn patch_text(
    original: &str,
    records: &[IconRecord],
    record_type: &str,
) -> IconcatResult<Option<(String, Vec<String>)>> {
    let Some(close) = original.rfind('}') else {
        return Ok(None);
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut names = Vec::with_capacity(records.len());
    let mut block = String::with_capacity(records.len() * 256);

    if !original[..close].ends_with('\n') {
        block.push('\n');
    }
    for record in records {
        let name = patch_name(record);
        if !is_valid_identifier(&name) || !seen.insert(name.clone()) {
            return Err(IconcatError::invalid_argument(format!(
                "cannot patch in '{}': invalid or repeated name",
                name
            )));
        }
        block.push('\n');
        write_declaration(&mut block, INDENT, &name, record, record_type)
            .map_err(|e| IconcatError::internal(format!("failed to format declaration: {}", e)))?;
        names.push(name);
    }

    let mut patched = String::with_capacity(original.len() + block.len());
    patched.push_str(&original[..close]);
    patched.push_str(&block);
    patched.push_str(&original[close..]);
    Ok(Some((patched, names)))
}

/// Patch the artifact at `path` in place.
///
/// With no records the file is left untouched. A file without a closing
/// brace is a [`IconcatError::Patch`] error and is not modified.
pub fn patch_artifact(
    path: &Path,
    records: &[IconRecord],
    record_type: &str,
    dry_run: bool,
) -> IconcatResult<PatchResult> {
    let original = fs::read_to_string(path).with_path(path)?;

    if records.is_empty() {
        info!(path = %path.display(), "nothing to patch");
        return Ok(PatchResult {
            path: path.to_path_buf(),
            inserted: Vec::new(),
            dry_run,
            text: original,
        });
    }

    let (text, inserted) = patch_text(&original, records, record_type)?
        .ok_or_else(|| IconcatError::patch(path, "no closing '}' to insert before"))?;

    if !dry_run {
        fs::write(path, &text).with_path(path)?;
    }
    info!(
        path = %path.display(),
        inserted = inserted.len(),
        dry_run,
        "artifact patched"
    );

    Ok(PatchResult {
        path: path.to_path_buf(),
        inserted,
        dry_run,
        text,
    })
}
