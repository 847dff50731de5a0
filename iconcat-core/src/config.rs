//! Configuration loading from iconcat.toml.
//!
//! The file is optional. Its values are merged over built-in defaults into a
//! [`CatalogConfig`], which the entry point adjusts with command line
//! overrides and then hands by reference to every stage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codegen::{AliasTable, DEFAULT_RECORD_TYPE};
use crate::error::{IconcatError, IconcatResult};
use crate::model::Layout;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "iconcat.toml";

/// Default category directories under the source icon root.
pub const DEFAULT_SCAN_ROOTS: &[&str] = &["solid", "regular", "brands"];

/// Default icon-rendering component mined for.
pub const DEFAULT_COMPONENT: &str = "FontawesomeSvg";

/// Default interchange file between mining and generation.
pub const DEFAULT_INTERCHANGE: &str = "found_icons.txt";

/// Main configuration structure for iconcat.toml. Every key is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IconcatConfig {
    /// Directory holding one subdirectory per category.
    pub source_icon_root: Option<PathBuf>,
    /// Category subdirectories to scan.
    pub scan_roots: Option<Vec<String>>,
    /// Generated artifact path.
    pub output_path: Option<PathBuf>,
    /// Output layout: "flat" or "namespaced".
    pub mode: Option<Layout>,
    /// Downstream source trees to mine.
    pub mine_roots: Option<Vec<PathBuf>>,
    /// File extensions mined, without the dot.
    pub mine_extensions: Option<Vec<String>>,
    /// Tag name of the icon-rendering component.
    pub component: Option<String>,
    pub interchange_path: Option<PathBuf>,
    /// Where to write the `pathData|name` migration mapping.
    pub mapping_path: Option<PathBuf>,
    /// Name of the generated record struct.
    pub record_type: Option<String>,
    /// Replaces the built-in legacy alias table.
    pub aliases: Option<AliasTable>,
}

/// Loads configuration from iconcat.toml under `root` if it exists.
pub fn load_config(root: &Path) -> IconcatResult<Option<IconcatConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads an explicitly named configuration file; a missing file is an error.
pub fn load_config_file(path: &Path) -> IconcatResult<IconcatConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| IconcatError::config(path, format!("cannot read: {}", e)))?;
    toml::from_str(&content)
        .map_err(|e| IconcatError::config(path, format!("invalid {}: {}", CONFIG_FILE_NAME, e)))
}

/// Fully defaulted run configuration.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogConfig {
    pub source_icon_root: PathBuf,
    pub scan_roots: Vec<String>,
    pub output_path: PathBuf,
    pub mode: Layout,
    pub mine_roots: Vec<PathBuf>,
    pub mine_extensions: Vec<String>,
    pub component: String,
    pub interchange_path: PathBuf,
    pub mapping_path: Option<PathBuf>,
    pub record_type: String,
    pub aliases: AliasTable,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_icon_root: PathBuf::from("svgs"),
            scan_roots: DEFAULT_SCAN_ROOTS.iter().map(|s| s.to_string()).collect(),
            output_path: PathBuf::from("src/fontawesome.rs"),
            mode: Layout::default(),
            mine_roots: Vec::new(),
            mine_extensions: vec!["rs".to_string()],
            component: DEFAULT_COMPONENT.to_string(),
            interchange_path: PathBuf::from(DEFAULT_INTERCHANGE),
            mapping_path: None,
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            aliases: AliasTable::legacy(),
        }
    }
}

impl CatalogConfig {
    /// Merge a parsed file over the defaults.
    ///
    /// Relative paths in the file are taken relative to `base`, the
    /// directory the file was found in.
    pub fn from_file(cfg: IconcatConfig, base: &Path) -> Self {
        let defaults = Self::default();
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };

        Self {
            source_icon_root: cfg
                .source_icon_root
                .map(rebase)
                .unwrap_or(defaults.source_icon_root),
            scan_roots: cfg.scan_roots.unwrap_or(defaults.scan_roots),
            output_path: cfg.output_path.map(rebase).unwrap_or(defaults.output_path),
            mode: cfg.mode.unwrap_or(defaults.mode),
            mine_roots: cfg
                .mine_roots
                .map(|roots| roots.into_iter().map(rebase).collect())
                .unwrap_or(defaults.mine_roots),
            mine_extensions: cfg
                .mine_extensions
                .map(|exts| exts.into_iter().map(|e| e.trim_start_matches('.').to_string()).collect())
                .unwrap_or(defaults.mine_extensions),
            component: cfg.component.unwrap_or(defaults.component),
            interchange_path: cfg
                .interchange_path
                .map(rebase)
                .unwrap_or(defaults.interchange_path),
            mapping_path: cfg.mapping_path.map(rebase),
            record_type: cfg.record_type.unwrap_or(defaults.record_type),
            aliases: cfg.aliases.unwrap_or(defaults.aliases),
        }
    }

    /// Load `explicit` if given, else iconcat.toml in `cwd` if present, else
    /// the defaults.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> IconcatResult<Self> {
        match explicit {
            Some(path) => {
                let cfg = load_config_file(path)?;
                let base = path.parent().unwrap_or(Path::new(""));
                Ok(Self::from_file(cfg, base))
            }
            None => Ok(load_config(cwd)?
                .map(|cfg| Self::from_file(cfg, cwd))
                .unwrap_or_default()),
        }
    }
}
