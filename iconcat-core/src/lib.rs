//! iconcat-core: static icon catalog generation library
//!
//! Turns a directory tree of single-path SVG icons into a generated Rust
//! source file of strongly-named constants, optionally restricted to the
//! icons a downstream application already renders.
//!
//! # Features
//!
//! - **Catalog scanning**: Parse every `<root>/<category>/*.svg` for viewBox and path data
//! - **Deterministic naming**: `arrow-right.svg` becomes `ARROW_RIGHT` (or `SOLID_ARROW_RIGHT`)
//! - **Usage mining**: Find icon call sites in downstream source trees
//! - **Merging**: Resolve mined usages against the catalog by exact path data
//! - **Code generation**: Flat or namespaced layouts with a validated legacy alias block
//! - **Incremental patching**: Append missing declarations to an existing artifact
//! - **Inventory**: Count and list what an existing artifact declares
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use iconcat_core::prelude::*;
//!
//! let cfg = CatalogConfig::load(Path::new("."), None)?;
//! let generated = Iconcat::new(cfg).generate_full()?;
//! print_plain(&generated.summary);
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: Catalog directory walking and per-file isolation
//! - [`parse`]: SVG parsing (viewBox, path data, license comment)
//! - [`naming`]: Identifier derivation for both layouts
//! - [`mine`]: Usage mining, interchange and mapping files
//! - [`merge`]: Deduplication and catalog resolution
//! - [`codegen`]: Artifact rendering and the legacy alias table
//! - [`pipeline`]: Fluent builder API running the stages in order
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `patch` (default): Incremental patching of an existing artifact
//! - `inventory` (default): Inventory and demo listing extraction
//! - `full`: Enable all optional features

// Core modules (always available)
pub mod codegen;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod mine;
pub mod model;
pub mod naming;
pub mod parse;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod scan;

// Feature-gated modules
#[cfg(feature = "patch")]
pub mod patch;

#[cfg(feature = "inventory")]
pub mod inventory;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IconcatError, IconcatResult, IoResultExt};

// Record model
pub use model::{Category, IconRecord, Layout, MinedUsage, Provenance};

// Naming
pub use naming::{identifier_for_stem, qualified_name, scoped_path, synthetic_identifier};

// Configuration
pub use config::{load_config, load_config_file, CatalogConfig, IconcatConfig};

// Logging
pub use logging::{init_plain_logging, init_structured_logging};

// Scanning and parsing
pub use parse::{parse_svg, ParsedSvg};
pub use scan::{gather_source_files, gather_svg_files, scan_catalog, ScanResult, ScannedIcon};

// Mining
pub use mine::{
    extract_icon_usages, group_by_view_box, mine_usages, read_interchange, write_interchange,
    write_mapping, InterchangeRead, MineResult, UsagePattern,
};

// Merging
pub use merge::{dedup_usages, merge_usages, merge_usages_reserving, CatalogIndex, MergeResult};

// Code generation
pub use codegen::{
    escape_str, render_catalog, serializer_for, unescape_str, AliasEntry, AliasTable,
    CatalogSerializer, GenerateOptions,
};

// Builder API
pub use pipeline::{Generated, Iconcat, Mined};

// Reporting
pub use report::{print_json, print_mining_json, print_mining_plain, print_plain, RunKind, RunSummary};

// Feature-gated re-exports
#[cfg(feature = "patch")]
pub use patch::{patch_artifact, patch_text, PatchResult};

#[cfg(feature = "inventory")]
pub use inventory::{render_demo_listing, Inventory, InventoryEntry};
