//! Builder API tying the stages together.
//!
//! ```rust,ignore
//! use iconcat_core::prelude::*;
//!
//! let cfg = CatalogConfig::load(Path::new("."), None)?;
//! let generated = Iconcat::new(cfg)
//!     .layout(Layout::Flat)
//!     .dry_run(true)
//!     .generate_full()?;
//!
//! println!("{}", generated.text);
//! ```
//!
//! Every operation runs single-threaded: scan, mine, merge and emit happen in
//! sequence, and the artifact is written once at the end.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::codegen::{render_catalog, GenerateOptions};
use crate::config::CatalogConfig;
use crate::error::{IconcatError, IoResultExt};
use crate::merge::{dedup_usages, merge_usages, CatalogIndex, MergeResult};
use crate::mine::{mine_usages, read_interchange, write_interchange, write_mapping, UsagePattern};
use crate::model::{IconRecord, Layout, MinedUsage};
use crate::report::{RunKind, RunSummary};
use crate::scan::scan_catalog;

/// A rendered artifact and the summary of the run that produced it.
#[derive(Debug, Clone)]
pub struct Generated {
    pub summary: RunSummary,
    /// Artifact text, written unless the run was a dry run
    pub text: String,
}

/// Outcome of a mining run.
#[derive(Debug, Clone)]
pub struct Mined {
    /// Every call site, in walk order
    pub usages: Vec<MinedUsage>,
    /// Distinct path data values among `usages`
    pub unique: usize,
    pub files_scanned: usize,
    pub files_skipped: Vec<PathBuf>,
    /// Lines written to the interchange file; `None` on a dry run
    pub written: Option<usize>,
    pub interchange_path: PathBuf,
}

/// Scanned catalog ready for resolution.
struct Catalog {
    index: CatalogIndex,
    license: Option<String>,
    errors: Vec<IconcatError>,
}

/// Builder for configuring and running a catalog generation.
#[derive(Debug, Clone)]
pub struct Iconcat {
    config: CatalogConfig,

    /// Render but do not write
    dry_run: bool,
}

impl Iconcat {
    /// Create a runner over a resolved configuration.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Override the output layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.config.mode = layout;
        self
    }

    /// Override the directory holding the category subdirectories.
    pub fn source_icon_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.source_icon_root = root.into();
        self
    }

    /// Override the generated artifact path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Replace the downstream source trees to mine.
    pub fn mine_roots(mut self, roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.config.mine_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Override the interchange file path.
    pub fn interchange_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.interchange_path = path.into();
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn options(&self) -> GenerateOptions<'_> {
        GenerateOptions {
            layout: self.config.mode,
            record_type: &self.config.record_type,
            license: None,
            aliases: None,
        }
    }

    fn scan(&self) -> Result<Catalog> {
        let scan = scan_catalog(&self.config.source_icon_root, &self.config.scan_roots)
            .with_context(|| {
                format!(
                    "Failed to scan icon catalog at {}",
                    self.config.source_icon_root.display()
                )
            })?;

        let mut index = CatalogIndex::build(&scan.icons);
        let mut errors = scan.errors;
        errors.extend(index.rejected.drain(..));

        info!(
            icons = index.len(),
            skipped = errors.len(),
            "catalog indexed"
        );
        Ok(Catalog {
            index,
            license: scan.license,
            errors,
        })
    }

    /// Render with `opts`, logging an abort before the error propagates.
    fn render(&self, records: &[IconRecord], opts: &GenerateOptions<'_>) -> Result<String> {
        match render_catalog(records, opts) {
            Ok(text) => Ok(text),
            Err(e) => {
                error!(error = %e, "generation aborted; nothing written");
                Err(e).context("Failed to render catalog")
            }
        }
    }

    fn write_artifact(&self, text: &str) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let path = &self.config.output_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(path, text)
            .with_path(path)
            .context("Failed to write generated catalog")?;
        info!(path = %path.display(), bytes = text.len(), "artifact written");
        Ok(())
    }

    fn summarize(&self, kind: RunKind, records: &[IconRecord], errors: &[IconcatError], text: &str) -> RunSummary {
        let mut summary = RunSummary::new(kind, self.config.mode)
            .with_artifact(self.config.output_path.clone(), text);
        for record in records {
            summary.count(record.category);
        }
        summary.record_errors(errors);
        summary.dry_run = self.dry_run;
        summary
    }

    /// Full-catalog mode: every scanned icon plus the legacy alias block.
    ///
    /// Fails without writing anything if an alias target is missing.
    pub fn generate_full(&self) -> Result<Generated> {
        let catalog = self.scan()?;
        let records = catalog.index.into_records();

        let opts = GenerateOptions {
            license: catalog.license.as_deref(),
            aliases: Some(&self.config.aliases),
            ..self.options()
        };
        let text = self.render(&records, &opts)?;
        self.write_artifact(&text)?;

        Ok(Generated {
            summary: self.summarize(RunKind::Full, &records, &catalog.errors, &text),
            text,
        })
    }

    /// Mine the configured source trees and write the interchange file.
    pub fn mine(&self) -> Result<Mined> {
        let usages = self.mine_now()?;
        let unique = dedup_usages(usages.usages.clone()).len();

        let written = if self.dry_run {
            None
        } else {
            let path = &self.config.interchange_path;
            Some(write_interchange(path, &usages.usages).context("Failed to write interchange file")?)
        };

        Ok(Mined {
            usages: usages.usages,
            unique,
            files_scanned: usages.files_scanned,
            files_skipped: usages.files_skipped,
            written,
            interchange_path: self.config.interchange_path.clone(),
        })
    }

    fn mine_now(&self) -> Result<crate::mine::MineResult> {
        if self.config.mine_roots.is_empty() {
            bail!(IconcatError::invalid_argument(
                "no mine roots configured (set mine_roots or pass --mine-root)"
            ));
        }
        let pattern = UsagePattern::for_component(&self.config.component)?;
        mine_usages(&self.config.mine_roots, &self.config.mine_extensions, &pattern)
            .context("Failed to mine downstream sources")
    }

    /// Usages from the interchange file, or mined inline when it is absent.
    fn load_usages(&self) -> Result<(Vec<MinedUsage>, Vec<IconcatError>)> {
        let path = &self.config.interchange_path;
        if path.exists() {
            let read = read_interchange(path).context("Failed to read interchange file")?;
            info!(path = %path.display(), usages = read.usages.len(), "interchange loaded");
            Ok((read.usages, read.errors))
        } else {
            info!(path = %path.display(), "no interchange file; mining inline");
            Ok((self.mine_now()?.usages, Vec::new()))
        }
    }

    fn merge(&self, catalog: &Catalog, usages: Vec<MinedUsage>) -> Result<MergeResult> {
        let merged = merge_usages(usages, &catalog.index);
        if !merged.is_complete() {
            warn!(
                unresolved = merged.unresolved.len(),
                resolved = merged.resolved,
                "catalog does not cover every mined usage"
            );
        }
        self.write_mapping(&merged.records)?;
        Ok(merged)
    }

    fn write_mapping(&self, records: &[IconRecord]) -> Result<()> {
        match (&self.config.mapping_path, self.dry_run) {
            (Some(path), false) => {
                write_mapping(path, records, self.config.mode).context("Failed to write mapping file")?;
                info!(path = %path.display(), records = records.len(), "mapping written");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Usage-based mode: only icons already rendered downstream.
    pub fn generate_from_usages(&self) -> Result<Generated> {
        let catalog = self.scan()?;
        let (usages, mut errors) = self.load_usages()?;
        let merged = self.merge(&catalog, usages)?;

        let opts = GenerateOptions {
            license: catalog.license.as_deref(),
            ..self.options()
        };
        let text = self.render(&merged.records, &opts)?;
        self.write_artifact(&text)?;

        errors.extend(catalog.errors);
        let mut summary = self.summarize(RunKind::FromUsages, &merged.records, &errors, &text);
        summary.unresolved = merged.unresolved;
        Ok(Generated { summary, text })
    }

    /// Append records missing from the existing artifact.
    ///
    /// Records whose path data or flat-qualified name the artifact already
    /// holds are left out; the rest are inserted before its closing brace.
    #[cfg(all(feature = "patch", feature = "inventory"))]
    pub fn patch_missing(&self) -> Result<Generated> {
        use std::collections::HashSet;

        use crate::inventory::Inventory;
        use crate::merge::merge_usages_reserving;
        use crate::patch::patch_artifact;

        let path = &self.config.output_path;
        let inventory = Inventory::read(path).context("Failed to read existing artifact")?;

        let catalog = self.scan()?;
        let (usages, mut errors) = self.load_usages()?;
        let usages: Vec<MinedUsage> = usages
            .into_iter()
            .filter(|u| !inventory.contains_path_data(&u.path_data))
            .collect();
        let taken: HashSet<String> = inventory.top_level_names().into_iter().map(String::from).collect();
        let merged = merge_usages_reserving(usages, &catalog.index, &taken);
        self.write_mapping(&merged.records)?;

        let (new, present) = inventory.partition_new(&merged.records);
        info!(new = new.len(), present = present.len(), "patch candidates");
        let new: Vec<IconRecord> = new.into_iter().cloned().collect();

        let patched = patch_artifact(path, &new, &self.config.record_type, self.dry_run)
            .context("Failed to patch artifact")?;

        errors.extend(catalog.errors);
        let mut summary = self.summarize(RunKind::Patch, &new, &errors, &patched.text);
        summary.unresolved = new
            .iter()
            .filter(|r| r.is_synthetic())
            .map(|r| r.identifier.clone())
            .collect();
        Ok(Generated {
            summary,
            text: patched.text,
        })
    }

    /// Inventory of the existing artifact and its demo listing.
    #[cfg(feature = "inventory")]
    pub fn inventory(&self, icons_path: &str) -> Result<Generated> {
        use crate::inventory::{render_demo_listing, Inventory};

        let path = &self.config.output_path;
        let text = fs::read_to_string(path)
            .with_path(path)
            .context("Failed to read existing artifact")?;
        let inventory = Inventory::parse(&text);

        let mut summary = RunSummary::new(RunKind::Inventory, self.config.mode)
            .with_artifact(path.to_path_buf(), &text);
        for entry in &inventory.entries {
            summary.count(entry.category());
        }

        let listing = render_demo_listing(&inventory, icons_path, &self.config.record_type)?;
        Ok(Generated {
            summary,
            text: listing,
        })
    }
}
