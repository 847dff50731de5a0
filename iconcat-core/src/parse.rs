//! Vector file parsing.
//!
//! Extracts the root `viewBox`, the drawing commands of the *first* path
//! element, and the leading XML comment (license text) from one SVG document.
//! Everything is returned verbatim: no normalization, no geometry checks.
//! Icons with several paths keep only the first one.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{IconcatError, IconcatResult};

/// SVG element namespace.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Maximum file size to parse (10 MB).
const MAX_FILE_SIZE: usize = 10_000_000;

/// Geometry extracted from one vector file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSvg {
    pub view_box: String,
    pub path_data: String,
    /// First XML comment in the document, trimmed
    pub comment: Option<String>,
}

fn first_path_data<'a>(root: Node<'a, 'a>, qualified: bool) -> Option<&'a str> {
    root.descendants()
        .filter(|n| {
            if qualified {
                n.has_tag_name((SVG_NS, "path"))
            } else {
                n.is_element()
                    && n.tag_name().namespace().is_none()
                    && n.tag_name().name() == "path"
            }
        })
        .find_map(|n| n.attribute("d").filter(|d| !d.is_empty()))
}

/// Parse a single SVG document.
///
/// Path lookup tries namespace-qualified `<path>` elements first and falls
/// back to unqualified ones. A missing or empty `viewBox`, or no path with a
/// non-empty `d`, is a [`IconcatError::Parse`].
pub fn parse_svg(path: &Path, content: &str) -> IconcatResult<ParsedSvg> {
    if content.len() > MAX_FILE_SIZE {
        return Err(IconcatError::parse(
            path,
            format!("file too large ({} bytes)", content.len()),
        ));
    }

    let doc = Document::parse(content).map_err(|e| {
        let pos = e.pos();
        IconcatError::parse_at(path, e.to_string(), pos.row as usize, pos.col as usize)
    })?;

    let root = doc.root_element();

    let view_box = root
        .attribute("viewBox")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| IconcatError::parse(path, "no viewBox attribute on document root"))?;

    let path_data = first_path_data(root, true)
        .or_else(|| first_path_data(root, false))
        .ok_or_else(|| IconcatError::parse(path, "no path element with drawing commands"))?;

    let comment = doc
        .descendants()
        .find(|n| n.is_comment())
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(ParsedSvg {
        view_box: view_box.to_string(),
        path_data: path_data.to_string(),
        comment,
    })
}
