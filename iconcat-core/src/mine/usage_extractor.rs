//! Call-site extraction from downstream source text.
//!
//! Heuristic, regex-based: finds opening tags of the icon-rendering component
//! and pulls the `view_box` and `d` attribute values out of them. Handles:
//! - quoted literals: `d="M0 0"`
//! - braced literals: `d={"M0 0"}`
//! - braced expressions: `d={icon.d}` (captured as expression text)
//! - tags spanning several lines, attributes in any order
//!
//! Tags whose attributes nest braces more than two levels deep are not
//! recognised. Results are candidates only; nothing downstream assumes this
//! finds every call site.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{IconcatError, IconcatResult};
use crate::model::{MinedUsage, Provenance};

/// Number of lines before a match searched for a `//` hint comment.
pub const HINT_WINDOW: usize = 5;

/// Attribute names accepted for the bounding box.
const VIEW_BOX_ATTRS: &[&str] = &["view_box", "viewBox"];

/// Pre-compiled tag matcher for one component name.
#[derive(Debug, Clone)]
pub struct UsagePattern {
    component: String,
    tag: Regex,
}

impl UsagePattern {
    /// Build the matcher for `<component ...>` opening tags.
    pub fn for_component(component: &str) -> IconcatResult<Self> {
        if component.is_empty() || !component.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':') {
            return Err(IconcatError::invalid_argument(format!(
                "invalid component name '{}'",
                component
            )));
        }
        let escaped = regex::escape(component);
        // Attribute text is any run of plain chars, quoted strings, or braces
        // nested at most two deep, so `>` inside `{...}` or `"..."` is skipped.
        let pattern = format!(
            r#"(?s)<{}\b((?:[^>"{{}}]|"(?:[^"\\]|\\.)*"|\{{(?:[^{{}}]|\{{[^{{}}]*\}})*\}})*)>"#,
            escaped
        );
        let tag = Regex::new(&pattern)
            .map_err(|e| IconcatError::invalid_argument(format!("component pattern: {}", e)))?;
        Ok(Self {
            component: component.to_string(),
            tag,
        })
    }

    /// The component name this pattern matches.
    pub fn component(&self) -> &str {
        &self.component
    }
}

/// Attribute matcher applied to a captured tag body.
fn attribute_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by the tests below.
    REGEX.get_or_init(|| {
        Regex::new(
            r#"(?:^|\s)([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|\{\s*"((?:[^"\\]|\\.)*)"\s*\}|\{((?:[^{}]|\{[^{}]*\})*)\})"#,
        )
        .expect("Hardcoded regex pattern is valid")
    })
}

/// Extract `(view_box, d)` from one tag body. First occurrence of each wins.
fn extract_attributes(body: &str) -> Option<(String, String)> {
    let mut view_box = None;
    let mut path_data = None;

    for cap in attribute_regex().captures_iter(body) {
        let name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str().to_string())
            .or_else(|| cap.get(4).map(|m| m.as_str().trim().to_string()));

        if VIEW_BOX_ATTRS.contains(&name) && view_box.is_none() {
            view_box = value;
        } else if name == "d" && path_data.is_none() {
            path_data = value;
        }
    }

    match (view_box, path_data) {
        (Some(v), Some(d)) if !d.is_empty() => Some((v, d)),
        _ => None,
    }
}

/// Find the hint for a match starting at `offset`.
///
/// Looks at the text before the match split into lines (the partial line
/// holding the tag counts as the nearest one), nearest first, up to
/// [`HINT_WINDOW`] lines. The first line containing `//` decides: its text
/// after the last `//`, trimmed, or no hint when that text is empty.
pub fn hint_before(content: &str, offset: usize) -> Option<String> {
    let before = &content[..offset];
    before
        .rsplit('\n')
        .take(HINT_WINDOW)
        .find_map(|line| line.rfind("//").map(|pos| line[pos + 2..].trim().to_string()))
        .filter(|hint| !hint.is_empty())
}

/// 1-indexed line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Extract every icon call site from one file's content.
pub fn extract_icon_usages(path: &Path, content: &str, pattern: &UsagePattern) -> Vec<MinedUsage> {
    let mut out = Vec::new();

    for cap in pattern.tag.captures_iter(content) {
        let (Some(whole), Some(body)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let Some((view_box, path_data)) = extract_attributes(body.as_str()) else {
            tracing::debug!(
                file = %path.display(),
                line = line_of(content, whole.start()),
                "tag without extractable view_box/d"
            );
            continue;
        };

        out.push(MinedUsage {
            view_box,
            path_data,
            hint: hint_before(content, whole.start()),
            provenance: Provenance {
                file: path.to_path_buf(),
                line: line_of(content, whole.start()),
            },
        });
    }

    out
}
