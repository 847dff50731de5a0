//! Inventory of an existing generated artifact.
//!
//! Line-oriented reader for the files `codegen` writes: recognises the
//! per-category `pub mod` scopes, constant declarations with their field
//! literals, and legacy alias re-exports. Used to report what an artifact
//! holds, to render demo listings, and to tell which records a patch would
//! duplicate.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::codegen::unescape_str;
use crate::error::{IconcatError, IconcatResult, IoResultExt};
use crate::model::{Category, IconRecord, Layout};
use crate::naming::qualified_name;

/// Pre-compiled patterns for artifact lines.
struct ArtifactPatterns {
    scope_open: Regex,
    declaration: Regex,
    field: Regex,
    alias_item: Regex,
    alias_single: Regex,
}

impl ArtifactPatterns {
    fn get() -> &'static Self {
        static PATTERNS: OnceLock<ArtifactPatterns> = OnceLock::new();
        // SAFETY: These regex patterns are hardcoded and covered by the tests below.
        PATTERNS.get_or_init(|| Self {
            scope_open: Regex::new(r"^\s*pub\s+mod\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{\s*$")
                .expect("Hardcoded regex pattern is valid"),
            declaration: Regex::new(
                r"^\s*pub\s+const\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*&\s*[A-Za-z_][A-Za-z0-9_]*\s*=\s*&\s*[A-Za-z_][A-Za-z0-9_]*\s*\{",
            )
            .expect("Hardcoded regex pattern is valid"),
            field: Regex::new(r#"^\s*(view_box|d)\s*:\s*"((?:[^"\\]|\\.)*)"\s*,?\s*$"#)
                .expect("Hardcoded regex pattern is valid"),
            alias_item: Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s+as\s+([A-Za-z_][A-Za-z0-9_]*)\s*,?\s*$")
                .expect("Hardcoded regex pattern is valid"),
            alias_single: Regex::new(
                r"^\s*pub\s+use\s+[A-Za-z_:][A-Za-z0-9_:]*\s+as\s+([A-Za-z_][A-Za-z0-9_]*)\s*;",
            )
            .expect("Hardcoded regex pattern is valid"),
        })
    }
}

/// One constant found in an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    /// Name as declared
    pub name: String,
    /// Enclosing category scope; `None` for the top-level `icons` scope
    pub scope: Option<Category>,
    pub view_box: String,
    pub path_data: String,
}

impl InventoryEntry {
    /// Category from the scope, or from a flat prefix at top level.
    pub fn category(&self) -> Option<Category> {
        self.scope.or_else(|| {
            Category::ALL
                .into_iter()
                .find(|c| self.name.starts_with(c.flat_prefix()))
        })
    }

    /// Name without any flat category prefix.
    pub fn display_name(&self) -> &str {
        match (self.scope, self.category()) {
            (None, Some(cat)) => self.name.strip_prefix(cat.flat_prefix()).unwrap_or(&self.name),
            _ => &self.name,
        }
    }

    /// Path relative to the `icons` scope.
    pub fn scoped_path(&self) -> String {
        match self.scope {
            Some(cat) => format!("{}::{}", cat.module_name(), self.name),
            None => self.name.clone(),
        }
    }
}

/// Everything recognised in one artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    pub entries: Vec<InventoryEntry>,
    /// Legacy names re-exported into the `icons` scope
    pub aliases: Vec<String>,
}

impl Inventory {
    /// Read the artifact text. Unrecognised lines are ignored.
    pub fn parse(text: &str) -> Self {
        let patterns = ArtifactPatterns::get();
        let mut inventory = Self::default();
        let mut scope: Option<Category> = None;
        let mut scope_depth = 0usize;
        let mut pending: Option<(String, Option<String>, Option<String>)> = None;
        let mut in_use_block = false;

        for line in text.lines() {
            let trimmed = line.trim();

            if let Some(cap) = patterns.scope_open.captures(line) {
                let name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
                if let Some(cat) = Category::ALL.into_iter().find(|c| c.module_name() == name) {
                    scope = Some(cat);
                    scope_depth = indent_of(line);
                }
                continue;
            }
            if scope.is_some() && trimmed == "}" && indent_of(line) == scope_depth {
                scope = None;
                continue;
            }

            if let Some(cap) = patterns.declaration.captures(line) {
                let name = cap.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
                pending = Some((name, None, None));
                continue;
            }
            if let Some((_, view_box, path_data)) = pending.as_mut() {
                if let Some(cap) = patterns.field.captures(line) {
                    let value = cap.get(2).map(|m| unescape_str(m.as_str())).unwrap_or_default();
                    match cap.get(1).map(|m| m.as_str()) {
                        Some("view_box") => *view_box = Some(value),
                        _ => *path_data = Some(value),
                    }
                } else if trimmed.starts_with("};") {
                    if let Some((name, Some(view_box), Some(path_data))) = pending.take() {
                        inventory.entries.push(InventoryEntry {
                            name,
                            scope,
                            view_box,
                            path_data,
                        });
                    }
                }
                continue;
            }

            if trimmed.starts_with("pub use") && trimmed.ends_with('{') {
                in_use_block = true;
            } else if in_use_block {
                if trimmed.starts_with('}') {
                    in_use_block = false;
                } else if let Some(cap) = patterns.alias_item.captures(line) {
                    if let Some(m) = cap.get(2) {
                        inventory.aliases.push(m.as_str().to_string());
                    }
                }
            } else if let Some(cap) = patterns.alias_single.captures(line) {
                if let Some(m) = cap.get(1) {
                    inventory.aliases.push(m.as_str().to_string());
                }
            }
        }

        inventory
    }

    /// Read and parse the artifact at `path`.
    pub fn read(path: &Path) -> IconcatResult<Self> {
        let text = fs::read_to_string(path).with_path(path)?;
        let inventory = Self::parse(&text);
        if inventory.entries.is_empty() && !text.trim().is_empty() {
            tracing::warn!(path = %path.display(), "no icon declarations recognised in artifact");
        }
        Ok(inventory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry counts keyed by category; `None` holds uncategorised entries.
    pub fn counts(&self) -> BTreeMap<Option<Category>, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Names declared or re-exported directly in the `icons` scope.
    pub fn top_level_names(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .filter(|e| e.scope.is_none())
            .map(|e| e.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }

    /// Whether the artifact already holds these exact path data bytes.
    pub fn contains_path_data(&self, path_data: &str) -> bool {
        self.entries.iter().any(|e| e.path_data == path_data)
    }

    /// Split `records` into those a patch should add and those already present.
    ///
    /// A record is present when its path data is already declared, or when
    /// its flat-qualified name (the name a patch declares it under) is
    /// already taken.
    pub fn partition_new<'a>(&self, records: &'a [IconRecord]) -> (Vec<&'a IconRecord>, Vec<&'a IconRecord>) {
        let names = self.top_level_names();
        let paths: HashSet<&str> = self.entries.iter().map(|e| e.path_data.as_str()).collect();
        records
            .iter()
            .partition(|r| {
                let name = qualified_name(&r.identifier, r.category, Layout::Flat);
                !paths.contains(r.path_data.as_str()) && !names.contains(name.as_str())
            })
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Constant name of the demo listing for a category (`BRANDS_ICONS`).
fn listing_name(category: Option<Category>) -> String {
    match category {
        Some(cat) => format!("{}_ICONS", cat.module_name().to_ascii_uppercase()),
        None => "OTHER_ICONS".to_string(),
    }
}

fn count_label(category: Category) -> &'static str {
    match category {
        Category::Solid => "Solid",
        Category::Regular => "Regular",
        Category::Brand => "Brands",
    }
}

/// Render `(name, icon)` listing tables, one per category present.
///
/// `icons_path` is how the listing refers to the artifact's `icons` scope,
/// e.g. `crate::fontawesome::icons`.
pub fn render_demo_listing(inventory: &Inventory, icons_path: &str, record_type: &str) -> IconcatResult<String> {
    let mut groups: BTreeMap<Option<Category>, Vec<&InventoryEntry>> = BTreeMap::new();
    for entry in &inventory.entries {
        groups.entry(entry.category()).or_default().push(entry);
    }

    let mut out = String::with_capacity(inventory.len() * 64 + 256);
    write_demo_listing(&mut out, &inventory.counts(), &groups, icons_path, record_type)
        .map_err(|e| IconcatError::internal(format!("failed to format demo listing: {}", e)))?;
    Ok(out)
}

fn write_demo_listing(
    out: &mut String,
    counts: &BTreeMap<Option<Category>, usize>,
    groups: &BTreeMap<Option<Category>, Vec<&InventoryEntry>>,
    icons_path: &str,
    record_type: &str,
) -> std::fmt::Result {
    writeln!(out, "// Demo listing generated by iconcat. Do not edit manually.")?;
    writeln!(out, "// Total icons: {}", counts.values().sum::<usize>())?;
    let mut per_category: Vec<String> = Category::ALL
        .into_iter()
        .map(|c| format!("{}: {}", count_label(c), counts.get(&Some(c)).copied().unwrap_or(0)))
        .collect();
    if let Some(other) = counts.get(&None) {
        per_category.push(format!("Other: {}", other));
    }
    writeln!(out, "// {}", per_category.join(", "))?;

    // Uncategorised entries sort first in the map; list them last.
    let ordered = Category::ALL.into_iter().map(Some).chain(std::iter::once(None));
    for category in ordered {
        let Some(entries) = groups.get(&category) else {
            continue;
        };
        writeln!(out)?;
        writeln!(
            out,
            "pub const {}: &[(&str, &{})] = &[",
            listing_name(category),
            record_type
        )?;
        for entry in entries {
            writeln!(
                out,
                "    (\"{}\", {}::{}),",
                entry.display_name(),
                icons_path,
                entry.scoped_path()
            )?;
        }
        writeln!(out, "];")?;
    }
    Ok(())
}
