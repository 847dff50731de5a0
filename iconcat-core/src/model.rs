//! Shared record model for every pipeline stage.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Style category partitioning the icon namespace.
///
/// Closed set; output order is always `Solid`, `Regular`, `Brand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Solid,
    Regular,
    #[serde(alias = "brands")]
    Brand,
}

impl Category {
    /// All categories in emission order.
    pub const ALL: [Category; 3] = [Category::Solid, Category::Regular, Category::Brand];

    /// Map a scan-root directory name onto a category.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "regular" => Some(Self::Regular),
            "brands" | "brand" => Some(Self::Brand),
            _ => None,
        }
    }

    /// Scope name used in namespaced output (`icons::solid`).
    pub fn module_name(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Regular => "regular",
            Self::Brand => "brands",
        }
    }

    /// Prefix used in flat output (`SOLID_`).
    pub fn flat_prefix(&self) -> &'static str {
        match self {
            Self::Solid => "SOLID_",
            Self::Regular => "REGULAR_",
            Self::Brand => "BRAND_",
        }
    }

    /// Doc line emitted above the category scope.
    pub fn doc_title(&self) -> &'static str {
        match self {
            Self::Solid => "Solid style icons",
            Self::Regular => "Regular style icons",
            Self::Brand => "Brand icons",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

/// How categories are encoded in generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One scope, category prepended to each name (`SOLID_ARROW_RIGHT`).
    Flat,
    /// One nested scope per category, bare names (`solid::ARROW_RIGHT`).
    #[default]
    Namespaced,
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "namespaced" | "nested" => Ok(Self::Namespaced),
            other => Err(format!("unknown layout '{}': expected flat or namespaced", other)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => f.write_str("flat"),
            Self::Namespaced => f.write_str("namespaced"),
        }
    }
}

/// Where a mined record was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub file: PathBuf,
    /// 1-indexed line of the match start; 0 when unknown (e.g. read back
    /// from an interchange line without a line field)
    pub line: usize,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{}:{}", self.file.display(), self.line)
        } else {
            write!(f, "{}", self.file.display())
        }
    }
}

/// The central catalog entity.
///
/// `path_data` is the identity key: byte-identical comparison only, never
/// geometric. `identifier` is the bare transformed name; category encoding is
/// applied by the serializer for the selected [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRecord {
    pub identifier: String,
    /// `None` for synthetic fallback records that matched no catalog file
    pub category: Option<Category>,
    pub view_box: String,
    pub path_data: String,
    pub provenance: Option<Provenance>,
    pub hint: Option<String>,
}

impl IconRecord {
    /// Whether this record carries a synthetic fallback identifier.
    pub fn is_synthetic(&self) -> bool {
        self.category.is_none()
    }
}

/// A mined call site before identifier resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedUsage {
    pub view_box: String,
    pub path_data: String,
    pub hint: Option<String>,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_dir_name() {
        assert_eq!(Category::from_dir_name("solid"), Some(Category::Solid));
        assert_eq!(Category::from_dir_name("Regular"), Some(Category::Regular));
        assert_eq!(Category::from_dir_name("brands"), Some(Category::Brand));
        assert_eq!(Category::from_dir_name("duotone"), None);
    }

    #[test]
    fn test_category_order_is_fixed() {
        let mut cats = vec![Category::Brand, Category::Solid, Category::Regular];
        cats.sort();
        assert_eq!(cats, Category::ALL.to_vec());
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("flat".parse::<Layout>(), Ok(Layout::Flat));
        assert_eq!("NAMESPACED".parse::<Layout>(), Ok(Layout::Namespaced));
        assert!("tree".parse::<Layout>().is_err());
    }

    #[test]
    fn test_provenance_display() {
        let p = Provenance { file: PathBuf::from("src/app.rs"), line: 12 };
        assert_eq!(p.to_string(), "src/app.rs:12");
        let p = Provenance { file: PathBuf::from("src/app.rs"), line: 0 };
        assert_eq!(p.to_string(), "src/app.rs");
    }
}
