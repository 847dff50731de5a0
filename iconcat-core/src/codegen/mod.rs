//! Source generation for the icon catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │  render_catalog   │  validate names + alias table, then format
//! └─────────┬─────────┘
//!           │ header, record type, `pub mod icons {`
//!           ▼
//! ┌───────────────────┐     ┌───────────────────┐
//! │  flat.rs          │  or │  namespaced.rs    │  CatalogSerializer
//! │  SOLID_X in icons │     │  icons::solid::X  │
//! └─────────┬─────────┘     └─────────┬─────────┘
//!           └────────────┬────────────┘
//!                        ▼
//!            synthetic records, alias block, `}`
//! ```
//!
//! Output is a pure function of the records and options: categories are
//! emitted Solid, Regular, Brand, entries sorted by name within each, and
//! synthetic records follow in merge order.

pub mod aliases;
pub mod flat;
pub mod namespaced;

use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Write};

use crate::error::{IconcatError, IconcatResult};
use crate::model::{Category, IconRecord, Layout};
use crate::naming::{is_valid_identifier, qualified_name, scoped_path};

pub use aliases::{AliasEntry, AliasTable};
pub use flat::FlatSerializer;
pub use namespaced::NamespacedSerializer;

/// Default name of the generated two-field record type.
pub const DEFAULT_RECORD_TYPE: &str = "Icon";

/// Indentation of declarations directly inside `icons`.
pub(crate) const INDENT: &str = "    ";

/// Knobs for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    pub layout: Layout,
    pub record_type: &'a str,
    /// Emitted as a `LICENSE` constant when present
    pub license: Option<&'a str>,
    /// Full-catalog mode only; validated against the records before output
    pub aliases: Option<&'a AliasTable>,
}

impl Default for GenerateOptions<'_> {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            record_type: DEFAULT_RECORD_TYPE,
            license: None,
            aliases: None,
        }
    }
}

/// Records split into emission groups.
#[derive(Debug, Default)]
pub struct GroupedRecords<'a> {
    /// Sorted by identifier within each category
    pub categories: BTreeMap<Category, Vec<&'a IconRecord>>,
    /// Records without a category, in input order
    pub synthetic: Vec<&'a IconRecord>,
}

impl<'a> GroupedRecords<'a> {
    pub fn group(records: &'a [IconRecord]) -> Self {
        let mut grouped = Self::default();
        for record in records {
            match record.category {
                Some(cat) => grouped.categories.entry(cat).or_default().push(record),
                None => grouped.synthetic.push(record),
            }
        }
        for entries in grouped.categories.values_mut() {
            entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        }
        grouped
    }
}

/// Layout-specific half of catalog emission.
pub trait CatalogSerializer {
    fn layout(&self) -> Layout;

    /// Write every category-bearing record inside the `icons` scope.
    fn write_categories(
        &self,
        out: &mut String,
        groups: &GroupedRecords<'_>,
        record_type: &str,
    ) -> fmt::Result;

    /// Write the legacy alias block. The table has already been validated.
    fn write_aliases(&self, out: &mut String, table: &AliasTable) -> fmt::Result;
}

/// Serializer for a layout.
pub fn serializer_for(layout: Layout) -> Box<dyn CatalogSerializer> {
    match layout {
        Layout::Flat => Box::new(FlatSerializer),
        Layout::Namespaced => Box::new(NamespacedSerializer),
    }
}

/// Escape text for a double-quoted string literal.
///
/// Backslashes are escaped before double quotes; the reverse order would
/// double the backslashes inserted for the quotes.
pub fn escape_str(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\r")
}

/// Inverse of [`escape_str`] for the escapes it produces.
pub fn unescape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Write one constant declaration at `indent`.
pub(crate) fn write_declaration(
    out: &mut String,
    indent: &str,
    name: &str,
    record: &IconRecord,
    record_type: &str,
) -> fmt::Result {
    if let Some(hint) = &record.hint {
        writeln!(out, "{}/// {}", indent, hint.replace(['\n', '\r'], " "))?;
    }
    if record.is_synthetic() {
        if let Some(at) = &record.provenance {
            writeln!(out, "{}// first seen at {}", indent, at)?;
        }
    }
    writeln!(out, "{}pub const {}: &{} = &{} {{", indent, name, record_type, record_type)?;
    writeln!(out, "{}    view_box: \"{}\",", indent, escape_str(&record.view_box))?;
    writeln!(out, "{}    d: \"{}\",", indent, escape_str(&record.path_data))?;
    writeln!(out, "{}}};", indent)
}

/// Render the full generated artifact.
///
/// Nothing is produced unless every check passes: the record type and all
/// names are valid identifiers, no two records share a scoped name, and
/// every alias target exists.
pub fn render_catalog(records: &[IconRecord], opts: &GenerateOptions<'_>) -> IconcatResult<String> {
    if !is_valid_identifier(opts.record_type) {
        return Err(IconcatError::invalid_argument(format!(
            "record type '{}' is not a valid identifier",
            opts.record_type
        )));
    }
    let top_level = check_unique_names(records, opts.layout)?;
    if let Some(table) = opts.aliases {
        table.validate(records)?;
        check_alias_names(table, &top_level, opts.layout)?;
    }

    let groups = GroupedRecords::group(records);
    let serializer = serializer_for(opts.layout);

    let mut out = String::with_capacity(1024 + records.len() * 512);
    write_catalog(&mut out, serializer.as_ref(), &groups, opts)
        .map_err(|e| IconcatError::internal(format!("failed to format catalog: {}", e)))?;
    Ok(out)
}

/// Reject invalid or repeated names. Returns the names declared directly in
/// the `icons` scope.
fn check_unique_names(records: &[IconRecord], layout: Layout) -> IconcatResult<HashSet<String>> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut top_level = HashSet::new();

    for record in records {
        let name = qualified_name(&record.identifier, record.category, layout);
        if !is_valid_identifier(&name) {
            return Err(IconcatError::invalid_argument(format!(
                "'{}' is not a valid identifier",
                name
            )));
        }
        let path = scoped_path(&record.identifier, record.category, layout);
        if seen.contains(&path) {
            return Err(IconcatError::invalid_argument(format!("'{}' declared twice", path)));
        }
        if !path.contains("::") {
            top_level.insert(path.clone());
        }
        seen.insert(path);
    }
    Ok(top_level)
}

/// Legacy names live in the `icons` scope and must not shadow a declaration.
fn check_alias_names(table: &AliasTable, top_level: &HashSet<String>, layout: Layout) -> IconcatResult<()> {
    for entry in &table.entries {
        let declared = qualified_name(&entry.target, Some(entry.category), layout);
        if layout == Layout::Flat && entry.legacy == declared {
            continue;
        }
        if top_level.contains(&entry.legacy) {
            return Err(IconcatError::invalid_argument(format!(
                "alias table v{}: legacy name '{}' collides with a generated constant",
                table.version, entry.legacy
            )));
        }
    }
    Ok(())
}

fn write_catalog(
    out: &mut String,
    serializer: &dyn CatalogSerializer,
    groups: &GroupedRecords<'_>,
    opts: &GenerateOptions<'_>,
) -> fmt::Result {
    write_header(out, serializer.layout(), opts)?;

    writeln!(out, "/// Icon constants")?;
    writeln!(out, "pub mod icons {{")?;
    writeln!(out, "{}use super::{};", INDENT, opts.record_type)?;

    serializer.write_categories(out, groups, opts.record_type)?;

    if !groups.synthetic.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}// Usages that matched no catalog file", INDENT)?;
        for record in &groups.synthetic {
            writeln!(out)?;
            write_declaration(out, INDENT, &record.identifier, record, opts.record_type)?;
        }
    }

    if let Some(table) = opts.aliases.filter(|t| !t.is_empty()) {
        serializer.write_aliases(out, table)?;
    }

    writeln!(out, "}}")
}

fn write_header(out: &mut String, layout: Layout, opts: &GenerateOptions<'_>) -> fmt::Result {
    writeln!(out, "// This file is auto-generated by iconcat. Do not edit manually.")?;
    writeln!(out, "// Layout: {}", layout)?;
    writeln!(out)?;

    if let Some(license) = opts.license {
        writeln!(out, "/// License notice carried by the source icon files")?;
        writeln!(out, "pub const LICENSE: &str = \"{}\";", escape_str(license))?;
        writeln!(out)?;
    }

    writeln!(out, "/// Geometry of a single icon")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
    writeln!(out, "pub struct {} {{", opts.record_type)?;
    writeln!(out, "    /// SVG viewBox attribute")?;
    writeln!(out, "    pub view_box: &'static str,")?;
    writeln!(out, "    /// SVG path data")?;
    writeln!(out, "    pub d: &'static str,")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;
    use std::path::PathBuf;

    fn record(id: &str, category: Option<Category>, vb: &str, d: &str) -> IconRecord {
        IconRecord {
            identifier: id.into(),
            category,
            view_box: vb.into(),
            path_data: d.into(),
            provenance: None,
            hint: None,
        }
    }

    fn opts(layout: Layout) -> GenerateOptions<'static> {
        GenerateOptions {
            layout,
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            r#"M0 0"#,
            r#"say "hi""#,
            r#"C:\icons\"quoted"\"#,
            "\\\\\"\\\"",
            "line\rbreak",
        ];
        for s in samples {
            assert_eq!(unescape_str(&escape_str(s)), s, "round trip of {:?}", s);
        }
    }

    #[test]
    fn test_escape_order_matters() {
        let s = r#"a\"b"#;
        assert_eq!(escape_str(s), r#"a\\\"b"#);
        let reversed = s.replace('"', "\\\"").replace('\\', "\\\\");
        assert_ne!(unescape_str(&reversed), s);
    }

    #[test]
    fn test_arrow_right_namespaced() {
        let records = vec![record("ARROW_RIGHT", Some(Category::Solid), "0 0 512 512", "M0 0")];
        let out = render_catalog(&records, &opts(Layout::Namespaced)).unwrap();
        assert!(out.contains("    pub mod solid {\n        use super::Icon;\n"));
        assert!(out.contains(
            "        pub const ARROW_RIGHT: &Icon = &Icon {\n            view_box: \"0 0 512 512\",\n            d: \"M0 0\",\n        };\n"
        ));
        assert!(!out.contains("SOLID_ARROW_RIGHT"));
    }

    #[test]
    fn test_arrow_right_flat() {
        let records = vec![record("ARROW_RIGHT", Some(Category::Solid), "0 0 512 512", "M0 0")];
        let out = render_catalog(&records, &opts(Layout::Flat)).unwrap();
        assert!(out.contains(
            "    pub const SOLID_ARROW_RIGHT: &Icon = &Icon {\n        view_box: \"0 0 512 512\",\n        d: \"M0 0\",\n    };\n"
        ));
        assert!(!out.contains("pub mod solid"));
    }

    #[test]
    fn test_category_order_fixed() {
        let records = vec![
            record("X", Some(Category::Brand), "v", "b"),
            record("Y", Some(Category::Regular), "v", "r"),
            record("B", Some(Category::Solid), "v", "s2"),
            record("A", Some(Category::Solid), "v", "s1"),
        ];
        for layout in [Layout::Flat, Layout::Namespaced] {
            let out = render_catalog(&records, &opts(layout)).unwrap();
            let pos = |needle: &str| out.find(needle).unwrap();
            let (a, b) = match layout {
                Layout::Flat => (pos("SOLID_A:"), pos("SOLID_B:")),
                Layout::Namespaced => (pos(" A:"), pos(" B:")),
            };
            assert!(a < b);
            let y = out.find("Y:").unwrap();
            let x = out.find("X:").unwrap();
            assert!(b < y && y < x, "{} layout out of order", layout);
        }
    }

    #[test]
    fn test_synthetic_at_top_level_with_hint() {
        let mut synthetic = record("ICON_0", None, "0 0 1 1", "M9 9");
        synthetic.hint = Some("mystery".into());
        synthetic.provenance = Some(Provenance {
            file: PathBuf::from("src/app.rs"),
            line: 12,
        });
        let records = vec![record("PLUS", Some(Category::Solid), "v", "M1 1"), synthetic];
        let out = render_catalog(&records, &opts(Layout::Namespaced)).unwrap();
        assert!(out.contains("    /// mystery\n    // first seen at src/app.rs:12\n    pub const ICON_0: &Icon"));
        let closing = out.rfind("    }\n").unwrap();
        assert!(out.find("ICON_0").unwrap() > closing);
    }

    #[test]
    fn test_escaped_literal_emitted() {
        let records = vec![record("Q", Some(Category::Solid), "0 0 1 1", r#"M"1\2"#)];
        let out = render_catalog(&records, &opts(Layout::Flat)).unwrap();
        assert!(out.contains(r#"d: "M\"1\\2","#));
    }

    #[test]
    fn test_license_and_record_type() {
        let options = GenerateOptions {
            layout: Layout::Flat,
            record_type: "Glyph",
            license: Some("Font Awesome Free \"CC BY 4.0\""),
            aliases: None,
        };
        let out = render_catalog(&[record("A", Some(Category::Solid), "v", "d")], &options).unwrap();
        assert!(out.contains("pub const LICENSE: &str = \"Font Awesome Free \\\"CC BY 4.0\\\"\";"));
        assert!(out.contains("pub struct Glyph {"));
        assert!(out.contains("use super::Glyph;"));
        assert!(out.contains("pub const SOLID_A: &Glyph = &Glyph {"));
    }

    #[test]
    fn test_invalid_record_type_rejected() {
        let options = GenerateOptions {
            record_type: "not valid",
            ..GenerateOptions::default()
        };
        assert!(render_catalog(&[], &options).is_err());
    }

    #[test]
    fn test_duplicate_scoped_name_rejected() {
        let records = vec![
            record("PLUS", Some(Category::Solid), "v", "M1 1"),
            record("PLUS", Some(Category::Solid), "v", "M2 2"),
        ];
        let err = render_catalog(&records, &opts(Layout::Namespaced)).unwrap_err();
        assert!(matches!(err, IconcatError::InvalidArgument { .. }));

        let ok = vec![
            record("PLUS", Some(Category::Solid), "v", "M1 1"),
            record("PLUS", Some(Category::Regular), "v", "M2 2"),
        ];
        assert!(render_catalog(&ok, &opts(Layout::Flat)).is_ok());
    }

    #[test]
    fn test_alias_failure_produces_no_output() {
        let table = AliasTable::legacy();
        let options = GenerateOptions {
            aliases: Some(&table),
            ..GenerateOptions::default()
        };
        let records = vec![record("PLUS", Some(Category::Solid), "v", "M1 1")];
        let err = render_catalog(&records, &options).unwrap_err();
        match err {
            IconcatError::AliasIntegrity { missing } => {
                assert!(missing.contains(&"solid::MINUS".to_string()));
                assert!(!missing.contains(&"solid::PLUS".to_string()));
            }
            other => panic!("Expected AliasIntegrity, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_colliding_with_synthetic_rejected() {
        let table = AliasTable {
            version: 3,
            entries: vec![AliasEntry {
                legacy: "ICON_0".into(),
                category: Category::Solid,
                target: "PLUS".into(),
            }],
        };
        let records = vec![
            record("PLUS", Some(Category::Solid), "v", "M1 1"),
            record("ICON_0", None, "v", "M9 9"),
        ];
        let options = GenerateOptions {
            aliases: Some(&table),
            ..GenerateOptions::default()
        };
        assert!(matches!(
            render_catalog(&records, &options),
            Err(IconcatError::InvalidArgument { .. })
        ));
    }
}
