//! Usage mining: find icons already rendered by downstream source trees.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │ usage_extractor.rs  │     │   interchange.rs    │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  Match component    │────▶│  Pipe-delimited     │
//! │  tags, pull attrs   │     │  hand-off file      │
//! │  and hint comments  │     │  + mapping file     │
//! └─────────────────────┘     └──────────┬──────────┘
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │      merge.rs       │
//!                             └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use iconcat_core::mine::{mine_usages, UsagePattern};
//!
//! let pattern = UsagePattern::for_component("FontawesomeSvg")?;
//! let result = mine_usages(&[PathBuf::from("../app")], &["rs".into()], &pattern)?;
//! for usage in &result.usages {
//!     println!("{} {}", usage.provenance, usage.view_box);
//! }
//! ```

pub mod interchange;
pub mod usage_extractor;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::IconcatResult;
use crate::model::MinedUsage;
use crate::scan::gather_source_files;

// Re-exports for convenience
pub use interchange::{
    parse_interchange, read_interchange, write_interchange, write_mapping, InterchangeRead,
};
pub use usage_extractor::{extract_icon_usages, hint_before, UsagePattern, HINT_WINDOW};

/// Result of mining a set of source trees.
#[derive(Debug, Clone, Default)]
pub struct MineResult {
    /// Every call site found, in walk order (not deduplicated)
    pub usages: Vec<MinedUsage>,
    /// Files read and searched
    pub files_scanned: usize,
    /// Files that could not be read as UTF-8 text
    pub files_skipped: Vec<PathBuf>,
}

/// Mine every file with a matching extension under each root.
///
/// An unreadable root is fatal; an unreadable file is logged and skipped.
pub fn mine_usages(
    roots: &[PathBuf],
    extensions: &[String],
    pattern: &UsagePattern,
) -> IconcatResult<MineResult> {
    let mut result = MineResult::default();

    for root in roots {
        let files = gather_source_files(root, extensions)?;
        for file in files {
            let content = match fs::read_to_string(&file) {
                Ok(c) => c,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable source file");
                    result.files_skipped.push(file);
                    continue;
                }
            };
            result.files_scanned += 1;
            result
                .usages
                .extend(extract_icon_usages(&file, &content, pattern));
        }
    }

    info!(
        component = pattern.component(),
        files = result.files_scanned,
        usages = result.usages.len(),
        "usage mining complete"
    );
    Ok(result)
}

/// Group usages by their viewBox, sorted by viewBox text.
pub fn group_by_view_box(usages: &[MinedUsage]) -> BTreeMap<&str, Vec<&MinedUsage>> {
    let mut groups: BTreeMap<&str, Vec<&MinedUsage>> = BTreeMap::new();
    for usage in usages {
        groups.entry(usage.view_box.as_str()).or_default().push(usage);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("iconcat_mine_test_{}_{}", std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_mine_multiple_roots() {
        let a = temp_dir();
        let b = temp_dir();
        fs::write(
            a.join("nav.rs"),
            "// home\n<FontawesomeSvg view_box=\"0 0 576 512\" d=\"M1 1\" />\n",
        )
        .unwrap();
        fs::write(b.join("bar.rs"), "<FontawesomeSvg view_box=\"0 0 1 1\" d=\"M2 2\" />").unwrap();
        fs::write(b.join("bad.rs"), [0xff_u8, 0xfe, 0x00]).unwrap();

        let pattern = UsagePattern::for_component("FontawesomeSvg").unwrap();
        let result = mine_usages(&[a.clone(), b.clone()], &["rs".to_string()], &pattern).unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_skipped, vec![b.join("bad.rs")]);
        assert_eq!(result.usages.len(), 2);
        assert_eq!(result.usages[0].hint.as_deref(), Some("home"));
        assert_eq!(result.usages[0].provenance.line, 2);
        assert_eq!(result.usages[1].provenance.file, b.join("bar.rs"));

        fs::remove_dir_all(&a).ok();
        fs::remove_dir_all(&b).ok();
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let pattern = UsagePattern::for_component("FontawesomeSvg").unwrap();
        let missing = temp_dir().join("nope");
        assert!(mine_usages(&[missing], &["rs".to_string()], &pattern).is_err());
    }

    #[test]
    fn test_group_by_view_box() {
        let mk = |vb: &str, d: &str| MinedUsage {
            view_box: vb.into(),
            path_data: d.into(),
            hint: None,
            provenance: Provenance { file: PathBuf::from("x.rs"), line: 1 },
        };
        let usages = vec![mk("0 0 512 512", "A"), mk("0 0 448 512", "B"), mk("0 0 512 512", "C")];
        let groups = group_by_view_box(&usages);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["0 0 448 512", "0 0 512 512"]);
        assert_eq!(groups["0 0 512 512"].len(), 2);
    }
}
