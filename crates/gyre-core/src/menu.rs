//! The menu data model: items, action descriptors, and the immutable
//! configuration snapshot the orchestrator works from.

use crate::geometry::Point;
use crate::icon::IconName;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, Deref,
    From, Into, AsRef,
)]
#[serde(transparent)]
pub struct MenuName(String);

crate::impl_string_newtype!(MenuName);

/// Reserved `Internal` action the orchestrator routes as a context switch
/// instead of forwarding to the executor.
pub const INTERNAL_SWITCH_APP: &str = "switch-app";

/// What a slice does when confirmed. The orchestrator treats `TaskSwitcher`
/// and `Internal(INTERNAL_SWITCH_APP)` specially (ring navigation); every
/// other variant is forwarded opaquely to the action executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActionDescriptor {
    /// Open a file or application bundle at a path.
    Launch { path: String },
    /// Run a shell command line.
    Run { command: String },
    /// Synthesize a keyboard shortcut, e.g. `"ctrl+shift+t"`.
    Shortcut { chord: String },
    /// Bring up the task-switcher context.
    TaskSwitcher,
    /// Activate a running application by identifier.
    Activate { id: String },
    /// A named command handled inside the host.
    Internal { name: String },
}

impl ActionDescriptor {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Launch { .. } => ActionKind::Launch,
            Self::Run { .. } => ActionKind::Run,
            Self::Shortcut { .. } => ActionKind::Shortcut,
            Self::TaskSwitcher => ActionKind::TaskSwitcher,
            Self::Activate { .. } => ActionKind::Activate,
            Self::Internal { .. } => ActionKind::Internal,
        }
    }

    /// True for the reserved kinds the orchestrator handles itself.
    pub fn is_context_switch(&self) -> bool {
        matches!(self, Self::TaskSwitcher)
            || matches!(self, Self::Internal { name } if name == INTERNAL_SWITCH_APP)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ActionKind {
    Launch,
    Run,
    Shortcut,
    TaskSwitcher,
    Activate,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub title: String,
    pub icon: IconName,
    pub action: ActionDescriptor,
    #[serde(default)]
    pub accessibility_label: Option<String>,
    #[serde(default)]
    pub accessibility_hint: Option<String>,
    #[serde(default)]
    pub preserve_icon_colors: Option<bool>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, action: ActionDescriptor) -> Self {
        let title = title.into();
        Self {
            id: ItemId::new(id),
            icon: IconName::new(title.to_lowercase()),
            title,
            action,
            accessibility_label: None,
            accessibility_hint: None,
            preserve_icon_colors: None,
        }
    }

    /// Text announced when this item becomes selected.
    pub fn spoken_label(&self) -> &str {
        self.accessibility_label.as_deref().unwrap_or(&self.title)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PositionMode {
    #[default]
    Cursor,
    Center,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub radius: f64,
    pub center_radius: f64,
    pub highlight_scale: f64,
    pub animation_ms: u64,
    pub icon_set: Option<String>,
    pub background: String,
    pub foreground: String,
    pub selected: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            radius: 150.0,
            center_radius: 40.0,
            highlight_scale: 1.15,
            animation_ms: 180,
            icon_set: None,
            background: "#1a1b26cc".into(),
            foreground: "#c0caf5".into(),
            selected: "#7aa2f7".into(),
        }
    }
}

impl Appearance {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    pub position: PositionMode,
    pub fixed_position: Option<Point>,
    pub all_spaces: bool,
    /// Stick magnitude below this fraction is ignored. Clamped to [0, 1]
    /// where it is consumed.
    pub deadzone: f64,
    /// Sticky menus stay open after an action fires so several can be
    /// triggered without reopening.
    pub sticky: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            position: PositionMode::Cursor,
            fixed_position: None,
            all_spaces: true,
            deadzone: 0.3,
            sticky: false,
        }
    }
}

/// Immutable snapshot of one menu. The orchestrator holds at most two: the
/// baseline and, transiently, an override for a single open/close cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfiguration {
    #[serde(default)]
    pub name: Option<MenuName>,
    #[serde(default)]
    pub center_title: Option<String>,
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub behavior: Behavior,
}

impl MenuConfiguration {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            name: None,
            center_title: None,
            items,
            appearance: Appearance::default(),
            behavior: Behavior::default(),
        }
    }

    pub fn item_by_id(&self, id: &ItemId) -> Option<(usize, &MenuItem)> {
        self.items.iter().enumerate().find(|(_, item)| &item.id == id)
    }

    /// Case-insensitive title lookup, mirroring how external callers address
    /// items by what they can see.
    pub fn item_by_title(&self, title: &str) -> Option<(usize, &MenuItem)> {
        let wanted = title.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.title.to_lowercase() == wanted)
    }
}
