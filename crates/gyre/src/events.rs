use gyre_core::automation::{ExecuteTarget, Request, Response};
use gyre_core::geometry::Point;
use gyre_core::lifecycle::ExecutionError;
use gyre_core::menu::PositionMode;
use gyre_core::selection::StepDirection;
use gyre_core::source::MenuSource;
use tokio::sync::oneshot;

/// Everything the driver loop reacts to. All orchestrator mutation funnels
/// through this one channel, which is what serializes it.
#[derive(Debug)]
pub enum AppEvent {
    Show {
        source: MenuSource,
        position: Option<PositionMode>,
        at: Option<Point>,
        select_only: bool,
        reply: oneshot::Sender<Response>,
    },
    Execute {
        target: ExecuteTarget,
        reply: oneshot::Sender<Response>,
    },
    List {
        reply: oneshot::Sender<Response>,
    },
    Pointer(Point),
    Click(Point),
    Stick(f64, f64),
    Step(StepDirection),
    Confirm,
    Cancel,
    Focus(bool),
    OpeningElapsed,
    ClosingElapsed,
    ExecutionFinished(Result<(), ExecutionError>),
    ConfigReload,
}

impl AppEvent {
    /// Translate a socket request. Requests that expect an answer hand back
    /// the receiving end; fire-and-forget input relay gets an immediate Ok.
    pub fn from_request(request: Request) -> (AppEvent, Option<oneshot::Receiver<Response>>) {
        match request {
            Request::Show { source, position, at, select_only } => {
                let (reply, rx) = oneshot::channel();
                (AppEvent::Show { source, position, at, select_only, reply }, Some(rx))
            }
            Request::Execute { target } => {
                let (reply, rx) = oneshot::channel();
                (AppEvent::Execute { target, reply }, Some(rx))
            }
            Request::List => {
                let (reply, rx) = oneshot::channel();
                (AppEvent::List { reply }, Some(rx))
            }
            Request::Pointer { point } => (AppEvent::Pointer(point), None),
            Request::Click { point } => (AppEvent::Click(point), None),
            Request::Stick { x, y } => (AppEvent::Stick(x, y), None),
            Request::Step { direction } => (AppEvent::Step(direction), None),
            Request::Confirm => (AppEvent::Confirm, None),
            Request::Cancel => (AppEvent::Cancel, None),
            Request::Focus { focused } => (AppEvent::Focus(focused), None),
        }
    }
}
