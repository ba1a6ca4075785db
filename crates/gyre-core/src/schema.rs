//! The persisted menu definition format: a versioned JSON record that
//! tolerates unknown and missing optional fields so the schema can grow
//! without breaking old files.

use crate::icon::IconName;
use crate::menu::{
    ActionDescriptor, Appearance, Behavior, ItemId, MenuConfiguration, MenuItem, MenuName,
    PositionMode,
};
use crate::source::SourceError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SCHEMA_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDefinition {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: Option<MenuName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_title: Option<String>,
    pub items: Vec<ItemDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<AppearanceOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconName>,
    pub action: ActionDescriptor,
}

/// Partial appearance record; anything absent keeps the baseline value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppearanceOverride {
    pub radius: Option<f64>,
    pub center_radius: Option<f64>,
    pub highlight_scale: Option<f64>,
    pub animation_ms: Option<u64>,
    pub icon_set: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub selected: Option<String>,
}

impl AppearanceOverride {
    fn apply(&self, base: &Appearance) -> Appearance {
        Appearance {
            radius: self.radius.unwrap_or(base.radius),
            center_radius: self.center_radius.unwrap_or(base.center_radius),
            highlight_scale: self.highlight_scale.unwrap_or(base.highlight_scale),
            animation_ms: self.animation_ms.unwrap_or(base.animation_ms),
            icon_set: self.icon_set.clone().or_else(|| base.icon_set.clone()),
            background: self.background.clone().unwrap_or_else(|| base.background.clone()),
            foreground: self.foreground.clone().unwrap_or_else(|| base.foreground.clone()),
            selected: self.selected.clone().unwrap_or_else(|| base.selected.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorOverride {
    pub position: Option<PositionMode>,
    pub fixed_position: Option<crate::geometry::Point>,
    pub all_spaces: Option<bool>,
    pub deadzone: Option<f64>,
    pub sticky: Option<bool>,
}

impl BehaviorOverride {
    fn apply(&self, base: &Behavior) -> Behavior {
        Behavior {
            position: self.position.unwrap_or(base.position),
            fixed_position: self.fixed_position.or(base.fixed_position),
            all_spaces: self.all_spaces.unwrap_or(base.all_spaces),
            deadzone: self.deadzone.unwrap_or(base.deadzone),
            sticky: self.sticky.unwrap_or(base.sticky),
        }
    }
}

impl MenuDefinition {
    pub fn parse(json: &str) -> Result<Self, SourceError> {
        let def: Self = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                SourceError::SchemaInvalid(e.to_string())
            } else {
                SourceError::Malformed(e.to_string())
            }
        })?;
        def.validate()?;
        Ok(def)
    }

    fn validate(&self) -> Result<(), SourceError> {
        if self.version == 0 {
            return Err(SourceError::SchemaInvalid("version must be >= 1".into()));
        }
        if self.items.is_empty() {
            return Err(SourceError::EmptyItems);
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SourceError> {
        serde_json::to_string_pretty(self).map_err(|e| SourceError::Malformed(e.to_string()))
    }

    /// Materialize a configuration, filling every gap from the baseline.
    /// Item ids absent from the definition are slugged from the title so
    /// they stay stable across re-parses of the same file.
    pub fn into_configuration(self, baseline: &MenuConfiguration) -> MenuConfiguration {
        let mut taken: HashSet<String> = self
            .items
            .iter()
            .filter_map(|i| i.id.as_ref().map(|id| id.to_string()))
            .collect();

        let items = self
            .items
            .into_iter()
            .map(|def| {
                let id = def
                    .id
                    .unwrap_or_else(|| ItemId::new(unique_slug(&def.title, &mut taken)));
                let icon = def
                    .icon
                    .unwrap_or_else(|| IconName::new(def.title.to_lowercase()));
                MenuItem {
                    id,
                    title: def.title,
                    icon,
                    action: def.action,
                    accessibility_label: None,
                    accessibility_hint: None,
                    preserve_icon_colors: None,
                }
            })
            .collect();

        MenuConfiguration {
            name: self.name,
            center_title: self.center_title,
            items,
            appearance: self
                .appearance
                .map(|o| o.apply(&baseline.appearance))
                .unwrap_or_else(|| baseline.appearance.clone()),
            behavior: self
                .behavior
                .map(|o| o.apply(&baseline.behavior))
                .unwrap_or_else(|| baseline.behavior.clone()),
        }
    }
}

fn unique_slug(title: &str, taken: &mut HashSet<String>) -> String {
    let mut slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    let slug = slug.trim_matches('-');
    let base = if slug.is_empty() { "item" } else { slug };

    let mut candidate = base.to_string();
    let mut n = 1;
    while taken.contains(&candidate) {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    taken.insert(candidate.clone());
    candidate
}
