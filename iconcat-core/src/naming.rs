//! Deterministic identifier derivation.
//!
//! One transform, [`identifier_for_stem`], feeds both layouts:
//! [`qualified_name`] only decides where the category goes.

use crate::model::{Category, Layout};

/// Prefix for stems that would otherwise start with a digit.
pub const NUMERIC_PREFIX: &str = "NUM_";

/// Prefix for synthetic fallback identifiers.
pub const SYNTHETIC_PREFIX: &str = "ICON_";

/// Transform a file stem into a bare constant name.
///
/// Uppercases, maps `-` to `_`, and prepends [`NUMERIC_PREFIX`] when the
/// result starts with an ASCII digit.
pub fn identifier_for_stem(stem: &str) -> String {
    let name = stem.to_uppercase().replace('-', "_");
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("{}{}", NUMERIC_PREFIX, name)
    } else {
        name
    }
}

/// Render the name a record is declared under for the given layout.
///
/// Synthetic records (no category) are emitted bare in both layouts.
pub fn qualified_name(identifier: &str, category: Option<Category>, layout: Layout) -> String {
    match (layout, category) {
        (Layout::Flat, Some(cat)) => format!("{}{}", cat.flat_prefix(), identifier),
        _ => identifier.to_string(),
    }
}

/// Path of a record relative to the top-level `icons` scope.
///
/// `solid::ARROW_RIGHT` in namespaced layout, `SOLID_ARROW_RIGHT` in flat.
pub fn scoped_path(identifier: &str, category: Option<Category>, layout: Layout) -> String {
    match (layout, category) {
        (Layout::Namespaced, Some(cat)) => format!("{}::{}", cat.module_name(), identifier),
        _ => qualified_name(identifier, category, layout),
    }
}

/// Synthetic identifier for the `seq`-th unresolved usage.
pub fn synthetic_identifier(seq: usize) -> String {
    format!("{}{}", SYNTHETIC_PREFIX, seq)
}

/// Whether `name` is usable as a bare constant identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
