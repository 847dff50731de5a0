//! Catalog merging: deduplicate mined usages and resolve them against the
//! scanned catalog.
//!
//! Identity is exact `path_data` string equality everywhere in this module.
//! Two visually identical icons serialized differently are distinct records.
//!
//! Performance characteristics:
//! - Index build: O(|C|) where C = scanned icons
//! - Dedup + resolve: O(|U|) where U = mined usages

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::error::IconcatError;
use crate::model::{Category, IconRecord, Layout, MinedUsage};
use crate::naming::{identifier_for_stem, is_valid_identifier, qualified_name, synthetic_identifier};
use crate::scan::ScannedIcon;

/// Scanned catalog with identifiers assigned, indexed by path data.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    records: Vec<IconRecord>,
    by_path: HashMap<String, usize>,
    /// Files dropped because their stem gave an invalid identifier or one
    /// already taken in the category
    pub rejected: Vec<IconcatError>,
}

impl CatalogIndex {
    /// Assign identifiers to scanned icons and index them.
    ///
    /// Within a category the first file to claim an identifier keeps it; later
    /// files mapping to the same identifier are reported in `rejected`, as are
    /// files whose stem does not yield a valid identifier (`v1.2.svg`).
    /// When several files share path data, the first in scan order resolves.
    pub fn build(icons: &[ScannedIcon]) -> Self {
        let mut index = Self {
            records: Vec::with_capacity(icons.len()),
            by_path: HashMap::with_capacity(icons.len()),
            rejected: Vec::new(),
        };
        let mut claimed: HashMap<(Category, String), &ScannedIcon> = HashMap::new();

        for icon in icons {
            let identifier = identifier_for_stem(&icon.stem);
            if !is_valid_identifier(&identifier) {
                warn!(
                    file = %icon.file.display(),
                    identifier = %identifier,
                    "file stem is not a valid identifier; file skipped"
                );
                index.rejected.push(IconcatError::parse(
                    &icon.file,
                    format!("stem '{}' gives invalid identifier {}", icon.stem, identifier),
                ));
                continue;
            }
            if let Some(first) = claimed.get(&(icon.category, identifier.clone())) {
                warn!(
                    file = %icon.file.display(),
                    first = %first.file.display(),
                    identifier = %identifier,
                    "identifier already assigned in category; file skipped"
                );
                index.rejected.push(IconcatError::parse(
                    &icon.file,
                    format!(
                        "identifier {} already assigned in {} by {}",
                        identifier,
                        icon.category,
                        first.file.display()
                    ),
                ));
                continue;
            }
            claimed.insert((icon.category, identifier.clone()), icon);

            let idx = index.records.len();
            index.by_path.entry(icon.path_data.clone()).or_insert(idx);
            index.records.push(IconRecord {
                identifier,
                category: Some(icon.category),
                view_box: icon.view_box.clone(),
                path_data: icon.path_data.clone(),
                provenance: None,
                hint: None,
            });
        }

        index
    }

    /// Every catalog record, in scan order.
    pub fn records(&self) -> &[IconRecord] {
        &self.records
    }

    /// Consume the index, keeping the records.
    pub fn into_records(self) -> Vec<IconRecord> {
        self.records
    }

    /// Look up the catalog record with exactly this path data.
    pub fn resolve(&self, path_data: &str) -> Option<&IconRecord> {
        self.by_path.get(path_data).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collapse usages with byte-identical path data.
///
/// The first occurrence is kept; its hint is backfilled from the first later
/// occurrence that has one. No other field is merged.
pub fn dedup_usages(usages: Vec<MinedUsage>) -> Vec<MinedUsage> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(usages.len());
    let mut unique: Vec<MinedUsage> = Vec::with_capacity(usages.len());

    for usage in usages {
        match seen.get(&usage.path_data) {
            Some(&idx) => {
                let kept = &mut unique[idx];
                if kept.hint.is_none() && usage.hint.is_some() {
                    kept.hint = usage.hint;
                }
            }
            None => {
                seen.insert(usage.path_data.clone(), unique.len());
                unique.push(usage);
            }
        }
    }

    unique
}

/// Result of merging mined usages with the catalog.
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    /// Identifier-bearing records, in first-seen usage order
    pub records: Vec<IconRecord>,
    /// Usages before deduplication
    pub total_usages: usize,
    /// Records that matched a catalog icon
    pub resolved: usize,
    /// Synthetic identifiers assigned to unresolved usages
    pub unresolved: Vec<String>,
}

impl MergeResult {
    /// Whether every usage matched the catalog.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Deduplicate `usages` and resolve each against `index`.
///
/// Resolved records adopt the catalog identifier and category and keep the
/// mined viewBox, path data, hint and provenance. Unresolved records get the
/// next free `ICON_<n>` name and a warning. A synthetic name never equals any
/// resolved record's bare or flat-qualified identifier.
pub fn merge_usages(usages: Vec<MinedUsage>, index: &CatalogIndex) -> MergeResult {
    merge_usages_reserving(usages, index, &HashSet::new())
}

/// [`merge_usages`], additionally keeping synthetic names clear of `taken`.
///
/// Used when records are appended to an artifact that already declares names.
pub fn merge_usages_reserving(
    usages: Vec<MinedUsage>,
    index: &CatalogIndex,
    taken: &HashSet<String>,
) -> MergeResult {
    let total_usages = usages.len();
    let unique = dedup_usages(usages);

    let mut reserved: HashSet<String> = taken.clone();
    reserved.extend(
        unique
            .iter()
            .filter_map(|u| index.resolve(&u.path_data))
            .flat_map(|hit| {
                [
                    hit.identifier.clone(),
                    qualified_name(&hit.identifier, hit.category, Layout::Flat),
                ]
            }),
    );

    let mut records: Vec<IconRecord> = Vec::with_capacity(unique.len());
    let mut unresolved = Vec::new();
    let mut seq = 0;

    for usage in unique {
        let (identifier, category) = match index.resolve(&usage.path_data) {
            Some(hit) => (hit.identifier.clone(), hit.category),
            None => {
                let mut name = synthetic_identifier(seq);
                while reserved.contains(&name) {
                    seq += 1;
                    name = synthetic_identifier(seq);
                }
                seq += 1;

                warn!(
                    identifier = %name,
                    at = %usage.provenance,
                    hint = usage.hint.as_deref().unwrap_or(""),
                    "no catalog icon matches mined path data; synthetic identifier assigned"
                );
                unresolved.push(name.clone());
                (name, None)
            }
        };

        records.push(IconRecord {
            identifier,
            category,
            view_box: usage.view_box,
            path_data: usage.path_data,
            provenance: Some(usage.provenance),
            hint: usage.hint,
        });
    }

    let resolved = records.len() - unresolved.len();

    info!(
        usages = total_usages,
        unique = records.len(),
        resolved,
        unresolved = unresolved.len(),
        "merge complete"
    );

    MergeResult {
        records,
        total_usages,
        resolved,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;
    use std::path::PathBuf;

    fn scanned(stem: &str, category: Category, d: &str) -> ScannedIcon {
        ScannedIcon {
            stem: stem.into(),
            category,
            view_box: "0 0 512 512".into(),
            path_data: d.into(),
            file: PathBuf::from(format!("{}/{}.svg", category.module_name(), stem)),
        }
    }

    fn mined(d: &str, hint: Option<&str>, file: &str, line: usize) -> MinedUsage {
        MinedUsage {
            view_box: "0 0 512 512".into(),
            path_data: d.into(),
            hint: hint.map(String::from),
            provenance: Provenance { file: PathBuf::from(file), line },
        }
    }

    #[test]
    fn test_dedup_backfills_first_hint() {
        let usages = vec![
            mined("M1 1", None, "a.rs", 1),
            mined("M1 1", Some("copy icon"), "b.rs", 7),
            mined("M1 1", Some("later"), "c.rs", 2),
            mined("M2 2", Some("other"), "a.rs", 9),
        ];
        let unique = dedup_usages(usages);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].hint.as_deref(), Some("copy icon"));
        assert_eq!(unique[0].provenance.file, PathBuf::from("a.rs"));
        assert_eq!(unique[0].provenance.line, 1);
    }

    #[test]
    fn test_dedup_keeps_existing_hint() {
        let usages = vec![
            mined("M1 1", Some("copy icon"), "a.rs", 1),
            mined("M1 1", None, "b.rs", 2),
        ];
        let unique = dedup_usages(usages);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].hint.as_deref(), Some("copy icon"));
    }

    #[test]
    fn test_dedup_is_byte_exact() {
        let usages = vec![mined("M1 1", None, "a.rs", 1), mined("M1  1", None, "a.rs", 2)];
        assert_eq!(dedup_usages(usages).len(), 2);
    }

    #[test]
    fn test_index_duplicate_identifier_guard() {
        let icons = vec![
            scanned("a-b", Category::Solid, "M1 1"),
            scanned("a_b", Category::Solid, "M2 2"),
            scanned("a-b", Category::Regular, "M3 3"),
        ];
        let index = CatalogIndex::build(&icons);
        assert_eq!(index.len(), 2);
        assert_eq!(index.rejected.len(), 1);
        assert!(index.resolve("M2 2").is_none());
        assert_eq!(index.resolve("M3 3").unwrap().category, Some(Category::Regular));
    }

    #[test]
    fn test_index_skips_invalid_identifiers() {
        let icons = vec![
            scanned("plus", Category::Solid, "M1 1"),
            scanned("v1.2", Category::Solid, "M2 2"),
            scanned("caf\u{e9}", Category::Regular, "M3 3"),
        ];
        let index = CatalogIndex::build(&icons);
        assert_eq!(index.len(), 1);
        assert_eq!(index.rejected.len(), 2);
        assert!(index.rejected.iter().all(|e| e.is_recoverable()));
        assert_eq!(
            index.rejected[0].path(),
            Some(&PathBuf::from("solid/v1.2.svg"))
        );
        assert!(index.resolve("M2 2").is_none());
    }

    #[test]
    fn test_index_first_path_data_wins() {
        let icons = vec![
            scanned("copy", Category::Solid, "M1 1"),
            scanned("copy", Category::Regular, "M1 1"),
        ];
        let index = CatalogIndex::build(&icons);
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("M1 1").unwrap().category, Some(Category::Solid));
    }

    #[test]
    fn test_merge_resolves_and_falls_back() {
        let index = CatalogIndex::build(&[scanned("arrow-right", Category::Solid, "M0 0")]);
        let usages = vec![
            mined("M9 9", Some("mystery"), "x.rs", 3),
            mined("M0 0", None, "y.rs", 4),
        ];
        let result = merge_usages(usages, &index);

        assert_eq!(result.total_usages, 2);
        assert_eq!(result.resolved, 1);
        assert_eq!(result.unresolved, vec!["ICON_0".to_string()]);
        assert!(!result.is_complete());

        let synthetic = &result.records[0];
        assert_eq!(synthetic.identifier, "ICON_0");
        assert!(synthetic.is_synthetic());
        assert_eq!(synthetic.hint.as_deref(), Some("mystery"));

        let resolved = &result.records[1];
        assert_eq!(resolved.identifier, "ARROW_RIGHT");
        assert_eq!(resolved.category, Some(Category::Solid));
        assert_eq!(resolved.provenance.as_ref().unwrap().line, 4);
    }

    #[test]
    fn test_synthetic_never_reuses_resolved_identifier() {
        let index = CatalogIndex::build(&[
            scanned("icon-0", Category::Solid, "M0 0"),
            scanned("icon-1", Category::Regular, "M1 1"),
        ]);
        let usages = vec![
            mined("M0 0", None, "a.rs", 1),
            mined("M1 1", None, "a.rs", 2),
            mined("M7 7", None, "a.rs", 3),
            mined("M8 8", None, "a.rs", 4),
        ];
        let result = merge_usages(usages, &index);
        assert_eq!(result.unresolved, vec!["ICON_2".to_string(), "ICON_3".to_string()]);
    }

    #[test]
    fn test_synthetic_skips_taken_names() {
        let taken: HashSet<String> = ["ICON_0".to_string()].into_iter().collect();
        let result = merge_usages_reserving(
            vec![mined("M7 7", None, "a.rs", 1)],
            &CatalogIndex::default(),
            &taken,
        );
        assert_eq!(result.unresolved, vec!["ICON_1".to_string()]);
    }

    #[test]
    fn test_merge_empty() {
        let result = merge_usages(Vec::new(), &CatalogIndex::default());
        assert!(result.records.is_empty());
        assert!(result.is_complete());
    }
}
