//! Menu lifecycle: the one stateful component. Everything here must be
//! driven from a single sequencing context (one event-loop turn at a time);
//! the orchestrator never spawns work or sleeps on its own. Timed
//! transitions and action execution are returned to the host as directives.

pub mod orchestrator;

pub use orchestrator::{ClickOutcome, Confirmation, ExecutionResolution, OpenRequest, Orchestrator};

use crate::automation::MenuOutcome;
use crate::geometry::{GeometryError, Point};
use crate::menu::{ActionDescriptor, ActionKind};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Opening,
    Open(Option<usize>),
    Executing(usize),
    Closing,
}

impl MenuState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Named menu contexts cycled by ring navigation. Reset to `Default` every
/// time the lifecycle returns to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationContext {
    #[default]
    Default,
    Application,
    TaskSwitcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncePriority {
    Open,
    Select,
    Close,
}

/// The overlay surface, owned elsewhere. The orchestrator only instructs;
/// notifications coming back the other way (focus changes) are relayed by
/// the host into `Orchestrator::focus_changed`.
pub trait SurfaceDriver: Send {
    fn show(&mut self, at: Option<Point>);
    fn hide(&mut self);
    fn update_size(&mut self, radius: f64);
    fn move_by(&mut self, dx: f64, dy: f64);
}

/// Best-effort accessibility announcements. Lifecycle correctness must not
/// depend on anyone listening.
pub trait Announcer: Send {
    fn announce(&mut self, priority: AnnouncePriority, text: &str);
}

pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&mut self, _priority: AnnouncePriority, _text: &str) {}
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unsupported action kind: {0}")]
    Unsupported(ActionKind),
    #[error("malformed command line: {0}")]
    BadCommand(String),
    #[error("failed to spawn '{command}': {reason}")]
    Spawn { command: String, reason: String },
}

/// Executes the side effect a slice stands for. Failures are reported, not
/// retried; the lifecycle treats success and failure identically.
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, action: &ActionDescriptor) -> Result<(), ExecutionError>;

    fn execute_async(
        &self,
        action: &ActionDescriptor,
        done: Box<dyn FnOnce(Result<(), ExecutionError>) + Send>,
    ) {
        done(self.execute(action));
    }
}

/// Single-shot completion registered at open time, invoked exactly once when
/// the cycle returns to `Closed`.
pub type Completion = Box<dyn FnOnce(MenuOutcome) + Send>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("a menu cycle is already in flight")]
    AlreadyActive,
    #[error("request does not apply while {state:?}")]
    NotApplicable { state: MenuState },
    #[error("confirm requires a selected slice")]
    NothingSelected,
    #[error(transparent)]
    InvalidConfiguration(#[from] GeometryError),
}
