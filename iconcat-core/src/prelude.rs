//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use iconcat_core::prelude::*;
//! ```
//!
//! This provides the types needed to configure and run a generation without
//! pulling in the per-stage helpers.

// Core record types
pub use crate::error::{IconcatError, IconcatResult};
pub use crate::model::{Category, IconRecord, Layout};

// Configuration
pub use crate::config::{load_config, CatalogConfig};

// Builder API
pub use crate::pipeline::{Generated, Iconcat, Mined};

// Code generation
pub use crate::codegen::{render_catalog, AliasTable, GenerateOptions};

// Reporting
pub use crate::report::{print_json, print_plain, RunSummary};
