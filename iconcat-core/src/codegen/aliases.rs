//! Versioned legacy alias table.
//!
//! Downstream code written against the old flat naming keeps compiling
//! because each legacy name is re-exported from the current catalog. Every
//! target is checked against the generated records before anything is
//! written; a missing target fails the whole generation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{IconcatError, IconcatResult};
use crate::model::{Category, IconRecord, Layout};
use crate::naming::{is_valid_identifier, qualified_name, scoped_path};

/// One legacy name mapped onto a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Name downstream code still uses
    pub legacy: String,
    pub category: Category,
    /// Bare catalog identifier the legacy name resolves to
    pub target: String,
}

/// A versioned list of legacy names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    pub version: u32,
    pub entries: Vec<AliasEntry>,
}

const LEGACY_SOLID: &[&str] = &[
    "PLUS",
    "MINUS",
    "ARROW_RIGHT",
    "ROTATE",
    "CIRCLE_NODES",
    "GEARS",
    "COMMENTS",
    "MAGNIFYING_GLASS",
    "MICROPHONE",
    "SHARE",
    "COPY",
];

const LEGACY_REGULAR: &[&str] = &["EYE", "EYE_SLASH", "THUMBS_UP", "CIRCLE_QUESTION", "CLIPBOARD"];

const LEGACY_BRANDS: &[&str] = &["SQUARE_X_TWITTER", "FACEBOOK", "LINKEDIN"];

impl AliasTable {
    /// The version 1 table shipped with the first namespaced catalog.
    pub fn legacy() -> Self {
        let groups = [
            (Category::Solid, LEGACY_SOLID),
            (Category::Regular, LEGACY_REGULAR),
            (Category::Brand, LEGACY_BRANDS),
        ];
        let entries = groups
            .iter()
            .flat_map(|(category, targets)| {
                targets.iter().map(move |target| AliasEntry {
                    legacy: qualified_name(target, Some(*category), Layout::Flat),
                    category: *category,
                    target: (*target).to_string(),
                })
            })
            .collect();
        Self { version: 1, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries targeting `category`, in table order.
    pub fn entries_for(&self, category: Category) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Check every entry against the records about to be emitted.
    ///
    /// Fails with [`IconcatError::AliasIntegrity`] listing every missing
    /// target, or with an invalid-argument error for malformed or repeated
    /// legacy names.
    pub fn validate(&self, records: &[IconRecord]) -> IconcatResult<()> {
        let mut legacy_seen = HashSet::new();
        for entry in &self.entries {
            if !is_valid_identifier(&entry.legacy) {
                return Err(IconcatError::invalid_argument(format!(
                    "alias table v{}: '{}' is not a valid identifier",
                    self.version, entry.legacy
                )));
            }
            if !legacy_seen.insert(entry.legacy.as_str()) {
                return Err(IconcatError::invalid_argument(format!(
                    "alias table v{}: legacy name '{}' listed twice",
                    self.version, entry.legacy
                )));
            }
        }

        let present: HashSet<(Category, &str)> = records
            .iter()
            .filter_map(|r| r.category.map(|c| (c, r.identifier.as_str())))
            .collect();

        let missing: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !present.contains(&(e.category, e.target.as_str())))
            .map(|e| scoped_path(&e.target, Some(e.category), Layout::Namespaced))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IconcatError::AliasIntegrity { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn full_catalog() -> Vec<IconRecord> {
        let mut records = Vec::new();
        records.extend(LEGACY_SOLID.iter().map(|id| record(id, Category::Solid)));
        records.extend(LEGACY_REGULAR.iter().map(|id| record(id, Category::Regular)));
        records.extend(LEGACY_BRANDS.iter().map(|id| record(id, Category::Brand)));
        records
    }

    #[test]
    fn test_legacy_table_shape() {
        let table = AliasTable::legacy();
        assert_eq!(table.version, 1);
        assert_eq!(table.entries.len(), 19);
        assert_eq!(table.entries[0].legacy, "SOLID_PLUS");
        let brands: Vec<_> = table.entries_for(Category::Brand).map(|e| e.legacy.as_str()).collect();
        assert_eq!(brands, vec!["BRAND_SQUARE_X_TWITTER", "BRAND_FACEBOOK", "BRAND_LINKEDIN"]);
    }

    #[test]
    fn test_validate_complete_catalog() {
        assert!(AliasTable::legacy().validate(&full_catalog()).is_ok());
    }

    #[test]
    fn test_validate_reports_every_missing_target() {
        let records: Vec<_> = full_catalog()
            .into_iter()
            .filter(|r| r.identifier != "PLUS" && r.identifier != "FACEBOOK")
            .collect();
        match AliasTable::legacy().validate(&records) {
            Err(IconcatError::AliasIntegrity { missing }) => {
                assert_eq!(missing, vec!["solid::PLUS".to_string(), "brands::FACEBOOK".to_string()]);
            }
            other => panic!("Expected AliasIntegrity, got {:?}", other),
        }
    }

    #[test]
    fn test_target_in_wrong_category_is_missing() {
        let table = AliasTable {
            version: 2,
            entries: vec![AliasEntry {
                legacy: "OLD_EYE".into(),
                category: Category::Solid,
                target: "EYE".into(),
            }],
        };
        let err = table.validate(&[record("EYE", Category::Regular)]).unwrap_err();
        assert!(matches!(err, IconcatError::AliasIntegrity { .. }));
    }

    #[test]
    fn test_repeated_legacy_name_rejected() {
        let entry = AliasEntry {
            legacy: "OLD".into(),
            category: Category::Solid,
            target: "PLUS".into(),
        };
        let table = AliasTable {
            version: 1,
            entries: vec![entry.clone(), entry],
        };
        let err = table.validate(&[record("PLUS", Category::Solid)]).unwrap_err();
        assert!(matches!(err, IconcatError::InvalidArgument { .. }));
    }
}
