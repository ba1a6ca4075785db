//! Request/response types for the external automation surface: show a menu
//! and wait for the choice, execute an item directly, or list what is
//! available. The same types form the daemon's line-delimited JSON socket
//! protocol, so client and server cannot drift apart.

use crate::geometry::Point;
use crate::icon::IconName;
use crate::lifecycle::{ExecutionError, LifecycleError};
use crate::menu::{ActionKind, ItemId, MenuConfiguration, MenuItem, MenuName, PositionMode};
use crate::selection::StepDirection;
use crate::source::{MenuSource, SourceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the caller learns about the chosen item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: ItemId,
    pub title: String,
    pub icon: IconName,
    pub action_kind: ActionKind,
    /// 1-based position among the menu's items.
    pub position: usize,
}

impl SelectedItem {
    pub fn from_item(index: usize, item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            icon: item.icon.clone(),
            action_kind: item.action.kind(),
            position: index + 1,
        }
    }
}

/// Outcome of one open/close cycle, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum MenuOutcome {
    Selected { item: SelectedItem },
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecuteTarget {
    Id { id: ItemId },
    Title { title: String },
}

/// One line on the control socket, client to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
    Show {
        #[serde(default)]
        source: MenuSource,
        #[serde(default)]
        position: Option<PositionMode>,
        #[serde(default)]
        at: Option<Point>,
        #[serde(default)]
        select_only: bool,
    },
    Execute {
        target: ExecuteTarget,
    },
    List,
    // surface-to-daemon input relay
    Pointer { point: Point },
    Click { point: Point },
    Stick { x: f64, y: f64 },
    Step { direction: StepDirection },
    Confirm,
    Cancel,
    Focus { focused: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub title: String,
    pub icon: IconName,
    pub action_kind: ActionKind,
}

impl From<&MenuItem> for ItemSummary {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            icon: item.icon.clone(),
            action_kind: item.action.kind(),
        }
    }
}

/// Read-only listing: named menus on disk plus the current baseline items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuListing {
    pub menus: Vec<MenuName>,
    pub items: Vec<ItemSummary>,
}

impl MenuListing {
    pub fn of(menus: Vec<MenuName>, baseline: &MenuConfiguration) -> Self {
        Self {
            menus,
            items: baseline.items.iter().map(ItemSummary::from).collect(),
        }
    }
}

/// One line on the control socket, daemon to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Response {
    Outcome { outcome: MenuOutcome },
    Executed { item: SelectedItem },
    Menus { listing: MenuListing },
    Ok,
    Error { kind: String, message: String },
}

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("no item with id or title '{0}'")]
    ItemNotFound(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl AutomationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "not-found",
            Self::Source(e) => e.kind(),
            Self::Lifecycle(LifecycleError::AlreadyActive) => "busy",
            Self::Lifecycle(_) => "not-applicable",
            Self::Execution(_) => "execution-failed",
        }
    }
}

impl From<AutomationError> for Response {
    fn from(err: AutomationError) -> Self {
        Response::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Resolve an execute target against a configuration. Ids match exactly,
/// titles case-insensitively; a miss is a structured not-found failure and
/// never touches lifecycle state.
pub fn find_item<'a>(
    config: &'a MenuConfiguration,
    target: &ExecuteTarget,
) -> Result<(usize, &'a MenuItem), AutomationError> {
    match target {
        ExecuteTarget::Id { id } => config
            .item_by_id(id)
            .ok_or_else(|| AutomationError::ItemNotFound(id.to_string())),
        ExecuteTarget::Title { title } => config
            .item_by_title(title)
            .ok_or_else(|| AutomationError::ItemNotFound(title.clone())),
    }
}
