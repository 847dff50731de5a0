//! Output formatting - plaintext and JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::IconcatError;
use crate::mine::group_by_view_box;
use crate::model::{Category, Layout, MinedUsage};

/// Which pipeline operation produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunKind {
    Full,
    Mine,
    FromUsages,
    Patch,
    Inventory,
}

impl RunKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full catalog",
            Self::Mine => "mine",
            Self::FromUsages => "usage-based catalog",
            Self::Patch => "incremental patch",
            Self::Inventory => "inventory",
        }
    }
}

/// Outcome of one run, printed at the end.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub kind: RunKind,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub layout: Layout,
    /// Records per category; `other` counts uncategorised records
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
    /// Recoverable errors, rendered
    pub errors: Vec<String>,
    /// Files named by `errors`, each listed once
    pub skipped_files: Vec<PathBuf>,
    /// Synthetic identifiers assigned
    pub unresolved: Vec<String>,
    pub output_path: Option<PathBuf>,
    /// SHA-256 of the artifact text, lowercase hex
    pub digest: Option<String>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(kind: RunKind, layout: Layout) -> Self {
        Self {
            kind,
            timestamp: chrono::Utc::now().to_rfc3339(),
            layout,
            counts: BTreeMap::new(),
            total: 0,
            errors: Vec::new(),
            skipped_files: Vec::new(),
            unresolved: Vec::new(),
            output_path: None,
            digest: None,
            dry_run: false,
        }
    }

    /// Count one record under its category.
    pub fn count(&mut self, category: Option<Category>) {
        let key = category.map(|c| c.module_name()).unwrap_or("other");
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Record recoverable errors and the files they point at.
    pub fn record_errors(&mut self, errors: &[IconcatError]) {
        for err in errors {
            self.errors.push(err.to_string());
            if let Some(path) = err.path() {
                if !self.skipped_files.contains(path) {
                    self.skipped_files.push(path.clone());
                }
            }
        }
    }

    /// Record the written artifact and its digest.
    pub fn with_artifact(mut self, path: PathBuf, text: &str) -> Self {
        self.output_path = Some(path);
        self.digest = Some(sha256_hex(text.as_bytes()));
        self
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

/// Prints a run summary in plain text format.
pub fn print_plain(summary: &RunSummary) {
    println!("iconcat {} ({} layout)", summary.kind.label(), summary.layout);
    for category in Category::ALL {
        if let Some(n) = summary.counts.get(category.module_name()) {
            println!("  {:<8} {}", category.module_name(), n);
        }
    }
    if let Some(n) = summary.counts.get("other") {
        println!("  {:<8} {}", "other", n);
    }
    println!("  total    {}", summary.total);

    if !summary.unresolved.is_empty() {
        println!("UNRESOLVED ({}):", summary.unresolved.len());
        for name in &summary.unresolved {
            println!("- {}", name);
        }
    }
    if !summary.errors.is_empty() {
        println!("ERRORS ({}):", summary.errors.len());
        for err in &summary.errors {
            println!("- {}", err);
        }
    }
    if let Some(path) = &summary.output_path {
        let verb = match (summary.kind, summary.dry_run) {
            (RunKind::Inventory, _) => "read",
            (_, true) => "would write",
            (_, false) => "wrote",
        };
        println!("{} {}", verb, path.display());
    }
    if let Some(digest) = &summary.digest {
        println!("sha256 {}", digest);
    }
}

/// Prints a run summary in JSON format.
///
/// Falls back to a minimal object if serialization fails.
pub fn print_json(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"total\": {}}}", summary.total);
        }
    }
}

/// Prints mined usages grouped by viewBox.
pub fn print_mining_plain(usages: &[MinedUsage], unique: usize) {
    println!("Found {} icon usages ({} unique)", usages.len(), unique);
    for (view_box, group) in group_by_view_box(usages) {
        println!();
        println!("viewBox \"{}\" ({}):", view_box, group.len());
        for usage in group {
            match &usage.hint {
                Some(hint) => println!("  {} ({})", usage.provenance, hint),
                None => println!("  {}", usage.provenance),
            }
        }
    }
}

/// Prints mined usages grouped by viewBox in JSON format.
pub fn print_mining_json(usages: &[MinedUsage], unique: usize) {
    let groups: BTreeMap<&str, Vec<serde_json::Value>> = group_by_view_box(usages)
        .into_iter()
        .map(|(view_box, group)| {
            let sites: Vec<serde_json::Value> = group
                .iter()
                .map(|u| {
                    json!({
                        "at": u.provenance.to_string(),
                        "hint": u.hint,
                        "d": u.path_data,
                    })
                })
                .collect();
            (view_box, sites)
        })
        .collect();

    let value = json!({
        "total": usages.len(),
        "unique": unique,
        "by_view_box": groups,
    });
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"total\": {}, \"unique\": {}}}", usages.len(), unique);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let digest = sha256_hex(b"");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new(RunKind::Full, Layout::Flat);
        summary.count(Some(Category::Solid));
        summary.count(Some(Category::Solid));
        summary.count(Some(Category::Brand));
        summary.count(None);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.counts["solid"], 2);
        assert_eq!(summary.counts["brands"], 1);
        assert_eq!(summary.counts["other"], 1);
    }

    #[test]
    fn test_record_errors_lists_files_once() {
        let mut summary = RunSummary::new(RunKind::FromUsages, Layout::Flat);
        summary.record_errors(&[
            IconcatError::interchange("found_icons.txt", 2, "expected at least viewBox and path data"),
            IconcatError::interchange("found_icons.txt", 5, "expected at least viewBox and path data"),
            IconcatError::parse("svgs/solid/v1.2.svg", "invalid identifier"),
            IconcatError::invalid_argument("no path"),
        ]);
        assert_eq!(summary.errors.len(), 4);
        assert_eq!(
            summary.skipped_files,
            vec![PathBuf::from("found_icons.txt"), PathBuf::from("svgs/solid/v1.2.svg")]
        );
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary::new(RunKind::FromUsages, Layout::Namespaced)
            .with_artifact(PathBuf::from("out.rs"), "pub mod icons {}\n");
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["kind"], "from-usages");
        assert_eq!(value["layout"], "namespaced");
        assert_eq!(value["digest"].as_str().map(str::len), Some(64));
        assert!(chrono::DateTime::parse_from_rfc3339(value["timestamp"].as_str().unwrap()).is_ok());
    }
}
