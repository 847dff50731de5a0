//! Flat layout: one scope, category encoded as a name prefix.

use std::fmt::{self, Write};

use super::{write_declaration, AliasTable, CatalogSerializer, GroupedRecords, INDENT};
use crate::model::{Category, Layout};
use crate::naming::qualified_name;

/// Emits `icons::SOLID_ARROW_RIGHT` style constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSerializer;

impl CatalogSerializer for FlatSerializer {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn write_categories(
        &self,
        out: &mut String,
        groups: &GroupedRecords<'_>,
        record_type: &str,
    ) -> fmt::Result {
        for category in Category::ALL {
            let Some(records) = groups.categories.get(&category) else {
                continue;
            };
            writeln!(out)?;
            writeln!(out, "{}// {}", INDENT, category.doc_title())?;
            for record in records {
                let name = qualified_name(&record.identifier, Some(category), Layout::Flat);
                writeln!(out)?;
                write_declaration(out, INDENT, &name, record, record_type)?;
            }
        }
        Ok(())
    }

    /// Legacy names equal to the prefixed name are already declared; only
    /// the others need a re-export.
    fn write_aliases(&self, out: &mut String, table: &AliasTable) -> fmt::Result {
        let renamed: Vec<_> = table
            .entries
            .iter()
            .map(|e| (qualified_name(&e.target, Some(e.category), Layout::Flat), e))
            .filter(|(declared, e)| *declared != e.legacy)
            .collect();
        if renamed.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}// Legacy names (alias table v{})", INDENT, table.version)?;
        for (declared, entry) in renamed {
            writeln!(out, "{}pub use self::{} as {};", INDENT, declared, entry.legacy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{render_catalog, AliasEntry, GenerateOptions};
    use crate::model::IconRecord;

    fn record(id: &str, category: Category) -> IconRecord {
        IconRecord {
            identifier: id.into(),
            category: Some(category),
            view_box: "0 0 512 512".into(),
            path_data: format!("M {}", id),
            provenance: None,
            hint: None,
        }
    }

    #[test]
    fn test_prefixes_per_category() {
        let records = vec![
            record("FACEBOOK", Category::Brand),
            record("EYE", Category::Regular),
            record("PLUS", Category::Solid),
        ];
        let options = GenerateOptions {
            layout: Layout::Flat,
            ..GenerateOptions::default()
        };
        let out = render_catalog(&records, &options).unwrap();
        assert!(out.contains("pub const SOLID_PLUS: &Icon"));
        assert!(out.contains("pub const REGULAR_EYE: &Icon"));
        assert!(out.contains("pub const BRAND_FACEBOOK: &Icon"));
        assert!(out.contains("    // Brand icons\n"));
    }

    #[test]
    fn test_legacy_table_needs_no_reexports() {
        let table = AliasTable {
            version: 1,
            entries: vec![AliasEntry {
                legacy: "SOLID_PLUS".into(),
                category: Category::Solid,
                target: "PLUS".into(),
            }],
        };
        let options = GenerateOptions {
            layout: Layout::Flat,
            aliases: Some(&table),
            ..GenerateOptions::default()
        };
        let out = render_catalog(&[record("PLUS", Category::Solid)], &options).unwrap();
        assert!(!out.contains("pub use"));
    }

    #[test]
    fn test_renamed_alias_reexported() {
        let table = AliasTable {
            version: 2,
            entries: vec![AliasEntry {
                legacy: "ADD".into(),
                category: Category::Solid,
                target: "PLUS".into(),
            }],
        };
        let options = GenerateOptions {
            layout: Layout::Flat,
            aliases: Some(&table),
            ..GenerateOptions::default()
        };
        let out = render_catalog(&[record("PLUS", Category::Solid)], &options).unwrap();
        assert!(out.contains("    // Legacy names (alias table v2)\n    pub use self::SOLID_PLUS as ADD;\n"));
    }
}
