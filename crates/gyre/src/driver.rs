//! The single-writer loop around the orchestrator. Every lifecycle mutation
//! arrives as an `AppEvent` on one channel; directives coming back out
//! (animation timers, action execution) are scheduled here and re-enter the
//! loop as further events.

use crate::events::AppEvent;
use crate::provider::{self, FsMenuResolver, Paths};
use async_channel::{Receiver, Sender};
use gyre_core::automation::{
    self, AutomationError, MenuListing, Response, SelectedItem,
};
use gyre_core::lifecycle::{
    ActionExecutor, ClickOutcome, Confirmation, ExecutionResolution, NavigationContext,
    OpenRequest, Orchestrator,
};
use gyre_core::source::{MenuSource, MenuSourceResolver};
use std::sync::Arc;
use std::time::Duration;

pub struct Driver {
    orchestrator: Orchestrator,
    executor: Arc<dyn ActionExecutor>,
    resolver: Arc<FsMenuResolver>,
    paths: Paths,
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl Driver {
    pub fn new(
        orchestrator: Orchestrator,
        executor: Arc<dyn ActionExecutor>,
        resolver: Arc<FsMenuResolver>,
        paths: Paths,
        tx: Sender<AppEvent>,
        rx: Receiver<AppEvent>,
    ) -> Self {
        Self { orchestrator, executor, resolver, paths, tx, rx }
    }

    pub async fn run(mut self) {
        while let Ok(event) = self.rx.recv().await {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Show { source, position, at, select_only, reply } => {
                self.handle_show(source, position, at, select_only, reply);
            }
            AppEvent::Execute { target, reply } => self.handle_execute(target, reply),
            AppEvent::List { reply } => {
                let listing = MenuListing::of(
                    self.resolver.named_menus(),
                    self.orchestrator.baseline(),
                );
                let _ = reply.send(Response::Menus { listing });
            }
            AppEvent::Pointer(point) => {
                self.orchestrator.pointer_moved(point);
            }
            AppEvent::Click(point) => match self.orchestrator.click(point) {
                Ok(ClickOutcome::Confirmed(confirmation)) => {
                    self.handle_confirmation(confirmation);
                }
                Ok(ClickOutcome::Cancelled(after)) => self.schedule(after, AppEvent::ClosingElapsed),
                Err(err) => log::debug!("click ignored: {err}"),
            },
            AppEvent::Stick(x, y) => {
                self.orchestrator.stick_moved(x, y);
            }
            AppEvent::Step(direction) => {
                self.orchestrator.step(direction);
            }
            AppEvent::Confirm => match self.orchestrator.confirm() {
                Ok(confirmation) => self.handle_confirmation(confirmation),
                Err(err) => log::debug!("confirm rejected: {err}"),
            },
            AppEvent::Cancel => match self.orchestrator.cancel() {
                Ok(after) => self.schedule(after, AppEvent::ClosingElapsed),
                Err(err) => log::debug!("cancel ignored: {err}"),
            },
            AppEvent::Focus(focused) => {
                if let Some(after) = self.orchestrator.focus_changed(focused) {
                    self.schedule(after, AppEvent::ClosingElapsed);
                }
            }
            AppEvent::OpeningElapsed => {
                if let Err(err) = self.orchestrator.opening_elapsed() {
                    log::debug!("stale opening timer: {err}");
                }
            }
            AppEvent::ClosingElapsed => {
                if let Err(err) = self.orchestrator.closing_elapsed() {
                    log::debug!("stale closing timer: {err}");
                }
            }
            AppEvent::ExecutionFinished(result) => {
                match self.orchestrator.execution_finished(result) {
                    Ok(ExecutionResolution::Close(after)) => {
                        self.schedule(after, AppEvent::ClosingElapsed);
                    }
                    Ok(ExecutionResolution::StayOpen) => {}
                    Err(err) => log::debug!("stray execution result: {err}"),
                }
            }
            AppEvent::ConfigReload => self.handle_reload(),
        }
    }

    fn handle_show(
        &mut self,
        source: MenuSource,
        position: Option<gyre_core::menu::PositionMode>,
        at: Option<gyre_core::geometry::Point>,
        select_only: bool,
        reply: tokio::sync::oneshot::Sender<Response>,
    ) {
        // the default source is the baseline itself, not an override
        let override_config = match source {
            MenuSource::Default => None,
            other => match self.resolver.resolve(&other) {
                Ok(config) => Some(config),
                Err(err) => {
                    let _ = reply.send(AutomationError::from(err).into());
                    return;
                }
            },
        };

        let request = OpenRequest {
            override_config,
            position,
            at,
            return_selection_only: select_only,
            context: NavigationContext::Default,
            completion: Some(Box::new(move |outcome| {
                let _ = reply.send(Response::Outcome { outcome });
            })),
        };

        match self.orchestrator.open(request) {
            // rejection already dismissed the completion
            Ok(after) => self.schedule(after, AppEvent::OpeningElapsed),
            Err(err) => log::warn!("show rejected: {err}"),
        }
    }

    fn handle_execute(
        &mut self,
        target: gyre_core::automation::ExecuteTarget,
        reply: tokio::sync::oneshot::Sender<Response>,
    ) {
        let baseline = self.orchestrator.baseline();
        match automation::find_item(baseline, &target) {
            Ok((index, item)) => {
                let action = item.action.clone();
                let selected = SelectedItem::from_item(index, item);
                let executor = self.executor.clone();
                tokio::task::spawn_blocking(move || {
                    let response = match executor.execute(&action) {
                        Ok(()) => Response::Executed { item: selected },
                        Err(err) => AutomationError::from(err).into(),
                    };
                    let _ = reply.send(response);
                });
            }
            Err(err) => {
                let _ = reply.send(err.into());
            }
        }
    }

    fn handle_confirmation(&mut self, confirmation: Confirmation) {
        match confirmation {
            Confirmation::Execute(action) => {
                let executor = self.executor.clone();
                let tx = self.tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = executor.execute(&action);
                    let _ = tx.send_blocking(AppEvent::ExecutionFinished(result));
                });
            }
            Confirmation::Close(after) => self.schedule(after, AppEvent::ClosingElapsed),
            Confirmation::SwitchContext(context) => self.switch_context(context),
        }
    }

    /// Ring navigation: resolve the context's menu and swap it in, or fall
    /// back to closing when the context has no menu configured.
    fn switch_context(&mut self, context: NavigationContext) {
        match self.resolver.resolve_context(context) {
            Ok(config) => {
                if let Err(err) = self.orchestrator.swap_configuration(config, context) {
                    log::warn!("context switch refused: {err}");
                }
            }
            Err(err) => {
                log::warn!("no menu for {context:?}: {err}");
                if let Ok(after) = self.orchestrator.cancel() {
                    self.schedule(after, AppEvent::ClosingElapsed);
                }
            }
        }
    }

    fn handle_reload(&mut self) {
        match provider::load_config(&self.paths) {
            Ok(config) => {
                self.resolver.set_baseline(config.clone());
                match self.orchestrator.config_changed(config) {
                    Ok(()) => log::info!("configuration reloaded"),
                    Err(err) => log::error!("reloaded config rejected: {err}"),
                }
            }
            Err(err) => log::error!("failed to reload config: {err}"),
        }
    }

    fn schedule(&self, after: Duration, event: AppEvent) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(event).await;
        });
    }
}
