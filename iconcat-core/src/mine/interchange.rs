//! Interchange and mapping files.
//!
//! Interchange line format (one record per line):
//!
//! ```text
//! viewBox|pathData|hint|file|line
//! ```
//!
//! `hint` may be empty. `line` extends the four-field format with the
//! 1-based line of the call site; it is optional on read so files carrying
//! only the first four fields are accepted. Hints and file
//! paths have `|` and line breaks replaced by spaces on write; records whose
//! viewBox or path data contain them cannot be represented and are skipped.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{IconcatError, IconcatResult, IoResultExt};
use crate::model::{IconRecord, Layout, MinedUsage, Provenance};
use crate::naming::scoped_path;

const SEPARATOR: char = '|';

fn is_representable(field: &str) -> bool {
    !field.contains([SEPARATOR, '\n', '\r'])
}

fn sanitize(field: &str) -> String {
    field.replace([SEPARATOR, '\n', '\r'], " ")
}

/// Write usages to the interchange file. Returns the number of lines written.
pub fn write_interchange(path: &Path, usages: &[MinedUsage]) -> IconcatResult<usize> {
    let mut out = String::with_capacity(usages.len() * 256);
    let written = write_interchange_lines(&mut out, usages)
        .map_err(|e| IconcatError::internal(format!("failed to format interchange file: {}", e)))?;
    fs::write(path, out).with_path(path)?;
    Ok(written)
}

fn write_interchange_lines(out: &mut String, usages: &[MinedUsage]) -> Result<usize, fmt::Error> {
    let mut written = 0;
    for usage in usages {
        if !is_representable(&usage.view_box) || !is_representable(&usage.path_data) {
            warn!(
                at = %usage.provenance,
                "usage geometry contains a separator or line break; not written"
            );
            continue;
        }
        writeln!(
            out,
            "{}|{}|{}|{}|{}",
            usage.view_box,
            usage.path_data,
            sanitize(usage.hint.as_deref().unwrap_or_default()),
            sanitize(&usage.provenance.file.display().to_string()),
            usage.provenance.line
        )?;
        written += 1;
    }
    Ok(written)
}

/// Usages read back from an interchange file.
#[derive(Debug, Default)]
pub struct InterchangeRead {
    pub usages: Vec<MinedUsage>,
    /// Malformed lines, skipped
    pub errors: Vec<IconcatError>,
}

/// Parse interchange text. Blank lines are ignored.
pub fn parse_interchange(path: &Path, text: &str) -> InterchangeRead {
    let mut read = InterchangeRead::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = raw.split(SEPARATOR).collect();
        if parts.len() < 2 || parts[1].is_empty() {
            read.errors.push(IconcatError::interchange(
                path,
                line_no,
                "expected at least viewBox and path data",
            ));
            continue;
        }

        let hint = parts
            .get(2)
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .map(String::from);
        let file = parts.get(3).map(|f| PathBuf::from(*f)).unwrap_or_default();
        let line = parts
            .get(4)
            .and_then(|l| l.trim().parse::<usize>().ok())
            .unwrap_or(0);

        read.usages.push(MinedUsage {
            view_box: parts[0].to_string(),
            path_data: parts[1].to_string(),
            hint,
            provenance: Provenance { file, line },
        });
    }

    read
}

/// Read and parse an interchange file.
pub fn read_interchange(path: &Path) -> IconcatResult<InterchangeRead> {
    let text = fs::read_to_string(path).with_path(path)?;
    let read = parse_interchange(path, &text);
    for err in &read.errors {
        warn!(error = %err, "skipping interchange line");
    }
    Ok(read)
}

/// Write the `pathData|name` migration mapping for merged records.
///
/// Names are scoped for the layout (`solid::PLUS` or `SOLID_PLUS`).
pub fn write_mapping(path: &Path, records: &[IconRecord], layout: Layout) -> IconcatResult<()> {
    let mut out = String::with_capacity(records.len() * 256);
    write_mapping_lines(&mut out, records, layout)
        .map_err(|e| IconcatError::internal(format!("failed to format mapping file: {}", e)))?;
    fs::write(path, out).with_path(path)
}

fn write_mapping_lines(out: &mut String, records: &[IconRecord], layout: Layout) -> fmt::Result {
    for record in records {
        writeln!(
            out,
            "{}|{}",
            record.path_data,
            scoped_path(&record.identifier, record.category, layout)
        )?;
    }
    Ok(())
}
