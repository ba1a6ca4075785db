//! Semantic icon name resolution against an externally loaded icon set.
//! Resolution is total: every non-empty name yields a `ResolvedIcon`.

use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Name handed out when an unmapped icon meets `FallbackPolicy::None`.
pub const PLACEHOLDER_ICON: &str = "image-missing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Reuse the semantic name as a symbolic reference so unmapped icons
    /// degrade to the platform's generic symbol catalog.
    #[default]
    System,
    /// Hand back a fixed placeholder instead.
    None,
}

/// One entry in an icon set. Several reference forms may be present at once;
/// resolution picks the first in symbol > asset > file order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IconDefinition {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub preserve_colors: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IconSetDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub icons: BTreeMap<IconName, IconDefinition>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Symbolic,
    Asset,
    File,
    Image,
}

/// Transient resolution result. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIcon {
    pub name: String,
    pub kind: IconKind,
    #[serde(default)]
    pub location: Option<PathBuf>,
    pub preserve_colors: bool,
}

/// Resolve a menu item's icon. A per-item color flag, when set, overrides
/// whatever the icon definition says.
pub fn resolve_for_item(item: &crate::menu::MenuItem, set: &IconSetDefinition) -> ResolvedIcon {
    let mut resolved = resolve(&item.icon, set);
    if let Some(flag) = item.preserve_icon_colors {
        resolved.preserve_colors = flag;
    }
    resolved
}

pub fn resolve(name: &IconName, set: &IconSetDefinition) -> ResolvedIcon {
    if let Some(def) = set.icons.get(name) {
        if let Some(symbol) = &def.symbol {
            return ResolvedIcon {
                name: symbol.clone(),
                kind: IconKind::Symbolic,
                location: None,
                preserve_colors: def.preserve_colors,
            };
        }
        if let Some(asset) = &def.asset {
            return ResolvedIcon {
                name: asset.clone(),
                kind: IconKind::Asset,
                location: None,
                preserve_colors: def.preserve_colors,
            };
        }
        if let Some(file) = &def.file {
            return ResolvedIcon {
                name: name.to_string(),
                kind: IconKind::File,
                location: Some(file.clone()),
                preserve_colors: def.preserve_colors,
            };
        }
        // entry exists but carries no concrete reference; fall through
    }

    match set.fallback {
        FallbackPolicy::System => ResolvedIcon {
            name: name.to_string(),
            kind: IconKind::Symbolic,
            location: None,
            preserve_colors: false,
        },
        FallbackPolicy::None => ResolvedIcon {
            name: PLACEHOLDER_ICON.to_string(),
            kind: IconKind::Symbolic,
            location: None,
            preserve_colors: false,
        },
    }
}
