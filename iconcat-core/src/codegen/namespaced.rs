//! Namespaced layout: one nested scope per category, bare names inside.

use std::fmt::{self, Write};

use super::{write_declaration, AliasTable, CatalogSerializer, GroupedRecords, INDENT};
use crate::model::{Category, Layout};

/// Emits `icons::solid::ARROW_RIGHT` style constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedSerializer;

impl CatalogSerializer for NamespacedSerializer {
    fn layout(&self) -> Layout {
        Layout::Namespaced
    }

    fn write_categories(
        &self,
        out: &mut String,
        groups: &GroupedRecords<'_>,
        record_type: &str,
    ) -> fmt::Result {
        let inner = format!("{}{}", INDENT, INDENT);

        for category in Category::ALL {
            let Some(records) = groups.categories.get(&category) else {
                continue;
            };
            writeln!(out)?;
            writeln!(out, "{}/// {}", INDENT, category.doc_title())?;
            writeln!(out, "{}pub mod {} {{", INDENT, category.module_name())?;
            writeln!(out, "{}use super::{};", inner, record_type)?;
            for record in records {
                writeln!(out)?;
                write_declaration(out, &inner, &record.identifier, record, record_type)?;
            }
            writeln!(out, "{}}}", INDENT)?;
        }
        Ok(())
    }

    fn write_aliases(&self, out: &mut String, table: &AliasTable) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "{}// Legacy flat names (alias table v{})", INDENT, table.version)?;

        for category in Category::ALL {
            let mut entries = table.entries_for(category).peekable();
            if entries.peek().is_none() {
                continue;
            }
            writeln!(out, "{}pub use self::{}::{{", INDENT, category.module_name())?;
            for entry in entries {
                writeln!(out, "{}{}{} as {},", INDENT, INDENT, entry.target, entry.legacy)?;
            }
            writeln!(out, "{}}};", INDENT)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{render_catalog, GenerateOptions};
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

    fn legacy_catalog() -> Vec<IconRecord> {
        AliasTable::legacy()
            .entries
            .iter()
            .map(|e| record(&e.target, e.category))
            .collect()
    }

    #[test]
    fn test_empty_categories_omitted() {
        let out = render_catalog(&[record("EYE", Category::Regular)], &GenerateOptions::default()).unwrap();
        assert!(out.contains("    /// Regular style icons\n    pub mod regular {\n"));
        assert!(!out.contains("pub mod solid"));
        assert!(!out.contains("pub mod brands"));
    }

    #[test]
    fn test_legacy_alias_block() {
        let table = AliasTable::legacy();
        let options = GenerateOptions {
            aliases: Some(&table),
            ..GenerateOptions::default()
        };
        let out = render_catalog(&legacy_catalog(), &options).unwrap();
        assert!(out.contains("    // Legacy flat names (alias table v1)\n"));
        assert!(out.contains("    pub use self::solid::{\n        PLUS as SOLID_PLUS,\n        MINUS as SOLID_MINUS,\n"));
        assert!(out.contains("    pub use self::brands::{\n        SQUARE_X_TWITTER as BRAND_SQUARE_X_TWITTER,\n"));
        assert!(out.trim_end().ends_with("    };\n}"));
    }

    #[test]
    fn test_regular_scope_follows_solid() {
        let out = render_catalog(&legacy_catalog(), &GenerateOptions::default()).unwrap();
        let solid = out.find("pub mod solid").unwrap();
        let regular = out.find("pub mod regular").unwrap();
        let brands = out.find("pub mod brands").unwrap();
        assert!(solid < regular && regular < brands);
    }
}
