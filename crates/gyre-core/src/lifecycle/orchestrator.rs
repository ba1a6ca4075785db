use super::{
    AnnouncePriority, Announcer, Completion, ExecutionError, LifecycleError, MenuState,
    NavigationContext, SurfaceDriver,
};
use crate::automation::{MenuOutcome, SelectedItem};
use crate::geometry::{self, Point, Slice};
use crate::menu::{ActionDescriptor, MenuConfiguration, PositionMode};
use crate::selection::{self, StepDirection};
use std::time::Duration;

/// Parameters for one open/close cycle.
pub struct OpenRequest {
    /// Temporary configuration for this cycle only; the baseline is restored
    /// unconditionally when the cycle ends.
    pub override_config: Option<MenuConfiguration>,
    pub position: Option<PositionMode>,
    /// Host-resolved coordinate for cursor/center positioning.
    pub at: Option<Point>,
    /// Report the chosen item without ever invoking the executor.
    pub return_selection_only: bool,
    pub context: NavigationContext,
    pub completion: Option<Completion>,
}

impl Default for OpenRequest {
    fn default() -> Self {
        Self {
            override_config: None,
            position: None,
            at: None,
            return_selection_only: false,
            context: NavigationContext::Default,
            completion: None,
        }
    }
}

/// What the host must do after a successful confirm.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// Run this action, then report back via `execution_finished`.
    Execute(ActionDescriptor),
    /// No execution wanted (return-selection-only); schedule
    /// `closing_elapsed` after the close animation.
    Close(Duration),
    /// Ring navigation: resolve the context's menu and hand it to
    /// `swap_configuration`, or `cancel` if that fails.
    SwitchContext(NavigationContext),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Confirmed(Confirmation),
    /// Click landed outside every slice; treated as a close request.
    Cancelled(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResolution {
    /// Schedule `closing_elapsed` after the close animation.
    Close(Duration),
    /// Sticky menu: back to open with nothing selected.
    StayOpen,
}

/// The single-writer lifecycle state machine. All mutation must arrive on
/// one logical sequencing context; the host owns timers and the executor and
/// feeds their completions back in (`opening_elapsed`, `closing_elapsed`,
/// `execution_finished`).
pub struct Orchestrator {
    state: MenuState,
    baseline: MenuConfiguration,
    override_config: Option<MenuConfiguration>,
    slices: Vec<Slice>,
    center: Point,
    context: NavigationContext,
    return_selection_only: bool,
    pending_outcome: Option<MenuOutcome>,
    completion: Option<Completion>,
    surface: Box<dyn SurfaceDriver>,
    announcer: Box<dyn Announcer>,
}

impl Orchestrator {
    pub fn new(
        baseline: MenuConfiguration,
        surface: Box<dyn SurfaceDriver>,
        announcer: Box<dyn Announcer>,
    ) -> Self {
        Self {
            state: MenuState::Closed,
            baseline,
            override_config: None,
            slices: Vec::new(),
            center: Point::default(),
            context: NavigationContext::default(),
            return_selection_only: false,
            pending_outcome: None,
            completion: None,
            surface,
            announcer,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn context(&self) -> NavigationContext {
        self.context
    }

    /// The configuration the current (or next) cycle shows.
    pub fn active(&self) -> &MenuConfiguration {
        self.override_config.as_ref().unwrap_or(&self.baseline)
    }

    pub fn baseline(&self) -> &MenuConfiguration {
        &self.baseline
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn selected(&self) -> Option<usize> {
        match self.state {
            MenuState::Open(selected) => selected,
            MenuState::Executing(index) => Some(index),
            _ => None,
        }
    }

    /// Begin a cycle. Returns the open-animation duration; the host calls
    /// `opening_elapsed` once it passes. A request while a cycle is in
    /// flight is rejected and its completion fired immediately with
    /// `Dismissed`; requests are never queued.
    pub fn open(&mut self, request: OpenRequest) -> Result<Duration, LifecycleError> {
        if self.state != MenuState::Closed {
            log::warn!("open rejected: cycle already in flight ({:?})", self.state);
            if let Some(done) = request.completion {
                done(MenuOutcome::Dismissed);
            }
            return Err(LifecycleError::AlreadyActive);
        }

        // baseline stays untouched; dropping the override restores it
        self.override_config = request.override_config;

        let config = self.active();
        let mode = request.position.unwrap_or(config.behavior.position);
        let center = match mode {
            PositionMode::Fixed => request.at.or(config.behavior.fixed_position).unwrap_or_default(),
            PositionMode::Cursor | PositionMode::Center => request.at.unwrap_or_default(),
        };

        let slices = match geometry::calculate_slices(
            config.items.len(),
            config.appearance.radius,
            config.appearance.center_radius,
            center,
        ) {
            Ok(slices) => slices,
            Err(err) => {
                log::error!("open rejected: {err}");
                self.override_config = None;
                if let Some(done) = request.completion {
                    done(MenuOutcome::Dismissed);
                }
                return Err(err.into());
            }
        };

        let radius = config.appearance.radius;
        let animation = config.appearance.animation();

        self.slices = slices;
        self.center = center;
        self.context = request.context;
        self.return_selection_only = request.return_selection_only;
        self.pending_outcome = None;
        self.completion = request.completion;
        self.state = MenuState::Opening;

        self.surface.update_size(radius);
        self.surface.show(Some(center));
        log::debug!("opening menu with {} slices at {center:?}", self.slices.len());
        Ok(animation)
    }

    /// The open animation finished.
    pub fn opening_elapsed(&mut self) -> Result<(), LifecycleError> {
        if self.state != MenuState::Opening {
            return Err(self.not_applicable());
        }
        self.state = MenuState::Open(None);
        let text = format!("Menu opened with {} items", self.active().items.len());
        self.announcer.announce(AnnouncePriority::Open, &text);
        Ok(())
    }

    /// Pointer hit-test. Misses (center hole, past the rim) keep the
    /// current selection. Ignored outside `Open`.
    pub fn pointer_moved(&mut self, point: Point) -> Option<usize> {
        let MenuState::Open(_) = self.state else {
            return None;
        };
        let config = self.active();
        let hit = selection::hit_test(
            point,
            self.center,
            &self.slices,
            config.appearance.center_radius,
            config.appearance.radius,
        );
        self.apply_selection(hit);
        self.selected()
    }

    /// Analog-stick update; below the deadzone the selection is preserved.
    pub fn stick_moved(&mut self, x: f64, y: f64) -> Option<usize> {
        let MenuState::Open(_) = self.state else {
            return None;
        };
        let hit = selection::stick_select(x, y, self.active().behavior.deadzone, &self.slices);
        self.apply_selection(hit);
        self.selected()
    }

    /// Discrete navigation; with no current selection both directions land
    /// on slice 0.
    pub fn step(&mut self, direction: StepDirection) -> Option<usize> {
        let MenuState::Open(current) = self.state else {
            return None;
        };
        let next = selection::step(current, self.active().items.len(), direction);
        self.apply_selection(next);
        self.selected()
    }

    fn apply_selection(&mut self, hit: Option<usize>) {
        let MenuState::Open(current) = self.state else {
            return;
        };
        let Some(index) = hit else {
            return; // sticky: keep the previous pick
        };
        if current == Some(index) {
            return;
        }
        self.state = MenuState::Open(Some(index));
        let config = self.active();
        if let Some(item) = config.items.get(index) {
            let text = format!(
                "{}, {} of {}",
                item.spoken_label(),
                index + 1,
                config.items.len()
            );
            self.announcer.announce(AnnouncePriority::Select, &text);
        }
    }

    /// Confirm the current selection.
    pub fn confirm(&mut self) -> Result<Confirmation, LifecycleError> {
        match self.state {
            MenuState::Open(Some(index)) => {
                let item = &self.active().items[index];
                let action = item.action.clone();

                if action.is_context_switch() {
                    let target = match action {
                        ActionDescriptor::TaskSwitcher => NavigationContext::TaskSwitcher,
                        _ => NavigationContext::Application,
                    };
                    return Ok(Confirmation::SwitchContext(target));
                }

                let selected = SelectedItem::from_item(index, item);
                self.pending_outcome = Some(MenuOutcome::Selected { item: selected });
                if self.return_selection_only {
                    Ok(Confirmation::Close(self.begin_close()))
                } else {
                    self.state = MenuState::Executing(index);
                    Ok(Confirmation::Execute(action))
                }
            }
            MenuState::Open(None) => Err(LifecycleError::NothingSelected),
            _ => Err(self.not_applicable()),
        }
    }

    /// A click: inside a slice it selects and confirms, outside every slice
    /// it is a request to close.
    pub fn click(&mut self, point: Point) -> Result<ClickOutcome, LifecycleError> {
        let MenuState::Open(_) = self.state else {
            return Err(self.not_applicable());
        };
        let config = self.active();
        let hit = selection::hit_test(
            point,
            self.center,
            &self.slices,
            config.appearance.center_radius,
            config.appearance.radius,
        );
        match hit {
            Some(index) => {
                self.apply_selection(Some(index));
                self.confirm().map(ClickOutcome::Confirmed)
            }
            None => self.cancel().map(ClickOutcome::Cancelled),
        }
    }

    /// The executor came back. Success and failure close the menu the same
    /// way; the attempted item is still the reported outcome. Sticky menus
    /// stay open for another round instead.
    pub fn execution_finished(
        &mut self,
        result: Result<(), ExecutionError>,
    ) -> Result<ExecutionResolution, LifecycleError> {
        let MenuState::Executing(index) = self.state else {
            return Err(self.not_applicable());
        };
        if let Err(err) = result {
            let title = self
                .active()
                .items
                .get(index)
                .map(|i| i.title.as_str())
                .unwrap_or("?");
            log::warn!("action for '{title}' failed: {err}");
        }
        if self.active().behavior.sticky {
            self.state = MenuState::Open(None);
            Ok(ExecutionResolution::StayOpen)
        } else {
            Ok(ExecutionResolution::Close(self.begin_close()))
        }
    }

    /// The surface reported a focus change. Losing focus while the menu is
    /// interactive dismisses it, the same as an outside click; the returned
    /// duration is the close animation to wait before `closing_elapsed`.
    /// Focus loss during `Executing` is ignored, since that cycle already
    /// has its exit path through `execution_finished`.
    pub fn focus_changed(&mut self, focused: bool) -> Option<Duration> {
        if focused {
            return None;
        }
        match self.state {
            MenuState::Opening | MenuState::Open(_) => {
                log::debug!("surface lost focus, dismissing");
                self.pending_outcome = None;
                Some(self.begin_close())
            }
            _ => None,
        }
    }

    /// Explicit cancel (escape, outside click, controller cancel). Valid
    /// from any non-terminal active state; nothing is reported as selected.
    pub fn cancel(&mut self) -> Result<Duration, LifecycleError> {
        match self.state {
            MenuState::Opening | MenuState::Open(_) | MenuState::Executing(_) => {
                self.pending_outcome = None;
                Ok(self.begin_close())
            }
            _ => Err(self.not_applicable()),
        }
    }

    /// The close animation finished: restore the baseline, fire the
    /// completion exactly once, reset navigation context.
    pub fn closing_elapsed(&mut self) -> Result<(), LifecycleError> {
        if self.state != MenuState::Closing {
            return Err(self.not_applicable());
        }
        self.state = MenuState::Closed;
        self.override_config = None;
        self.return_selection_only = false;
        self.context = NavigationContext::default();
        self.slices.clear();

        let outcome = self.pending_outcome.take().unwrap_or(MenuOutcome::Dismissed);
        if let Some(done) = self.completion.take() {
            done(outcome);
        }
        Ok(())
    }

    /// Ring navigation: swap in the resolved context menu without closing
    /// the surface. The original baseline is still what gets restored when
    /// the cycle finally ends.
    pub fn swap_configuration(
        &mut self,
        config: MenuConfiguration,
        context: NavigationContext,
    ) -> Result<(), LifecycleError> {
        let MenuState::Open(_) = self.state else {
            return Err(self.not_applicable());
        };
        let slices = geometry::calculate_slices(
            config.items.len(),
            config.appearance.radius,
            config.appearance.center_radius,
            self.center,
        )?;
        self.surface.update_size(config.appearance.radius);
        self.slices = slices;
        self.override_config = Some(config);
        self.context = context;
        self.state = MenuState::Open(None);
        let text = format!("Menu changed, {} items", self.active().items.len());
        self.announcer.announce(AnnouncePriority::Open, &text);
        Ok(())
    }

    /// External configuration edit. While an override cycle is showing only
    /// the stored baseline changes; otherwise an open menu is re-laid-out
    /// when the radius or item count moved.
    pub fn config_changed(&mut self, new: MenuConfiguration) -> Result<(), LifecycleError> {
        let showing_baseline = self.override_config.is_none();
        let needs_relayout = showing_baseline
            && self.state.is_active()
            && (new.items.len() != self.baseline.items.len()
                || new.appearance.radius != self.baseline.appearance.radius
                || new.appearance.center_radius != self.baseline.appearance.center_radius);

        if needs_relayout {
            let slices = geometry::calculate_slices(
                new.items.len(),
                new.appearance.radius,
                new.appearance.center_radius,
                self.center,
            )?;
            self.surface.update_size(new.appearance.radius);
            self.slices = slices;
            // a shrunken item list can orphan the selection
            if let MenuState::Open(Some(i)) = self.state
                && i >= new.items.len()
            {
                self.state = MenuState::Open(None);
            }
        }
        self.baseline = new;
        Ok(())
    }

    /// Nudge the whole surface; slice anchors travel with it.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        if !self.state.is_active() {
            return;
        }
        self.center.x += dx;
        self.center.y += dy;
        for slice in &mut self.slices {
            slice.label_anchor.x += dx;
            slice.label_anchor.y += dy;
        }
        self.surface.move_by(dx, dy);
    }

    fn begin_close(&mut self) -> Duration {
        self.state = MenuState::Closing;
        self.surface.hide();
        self.announcer.announce(AnnouncePriority::Close, "Menu closed");
        self.active().appearance.animation()
    }

    fn not_applicable(&self) -> LifecycleError {
        LifecycleError::NotApplicable { state: self.state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::NullAnnouncer;
    use crate::menu::{ActionDescriptor, MenuItem};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl SurfaceDriver for Recorder {
        fn show(&mut self, _at: Option<Point>) {
            self.0.lock().unwrap().push("show".into());
        }
        fn hide(&mut self) {
            self.0.lock().unwrap().push("hide".into());
        }
        fn update_size(&mut self, radius: f64) {
            self.0.lock().unwrap().push(format!("size:{radius}"));
        }
        fn move_by(&mut self, dx: f64, dy: f64) {
            self.0.lock().unwrap().push(format!("move:{dx},{dy}"));
        }
    }

    fn config(n: usize) -> MenuConfiguration {
        MenuConfiguration::new(
            (0..n)
                .map(|i| {
                    MenuItem::new(
                        format!("item-{i}"),
                        format!("Item {i}"),
                        ActionDescriptor::Run { command: format!("cmd-{i}") },
                    )
                })
                .collect(),
        )
    }

    fn orchestrator(n: usize) -> Orchestrator {
        Orchestrator::new(config(n), Box::new(Recorder::default()), Box::new(NullAnnouncer))
    }

    fn open_to_idle(orch: &mut Orchestrator) {
        orch.open(OpenRequest::default()).unwrap();
        orch.opening_elapsed().unwrap();
    }

    #[test]
    fn full_cycle_reports_the_executed_item() {
        let outcome = Arc::new(Mutex::new(None));
        let sink = outcome.clone();

        let mut orch = orchestrator(8);
        orch.open(OpenRequest {
            completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();

        // slice 2's anchor is a guaranteed hit
        let anchor = orch.slices()[2].label_anchor;
        assert_eq!(orch.pointer_moved(anchor), Some(2));

        let confirmation = orch.confirm().unwrap();
        assert!(matches!(confirmation, Confirmation::Execute(_)));
        assert_eq!(orch.state(), MenuState::Executing(2));

        let resolution = orch.execution_finished(Ok(())).unwrap();
        assert!(matches!(resolution, ExecutionResolution::Close(_)));
        orch.closing_elapsed().unwrap();

        assert_eq!(orch.state(), MenuState::Closed);
        match outcome.lock().unwrap().take() {
            Some(MenuOutcome::Selected { item }) => {
                assert_eq!(item.id.to_string(), "item-2");
                assert_eq!(item.position, 3);
            }
            other => panic!("expected a selected outcome, got {other:?}"),
        }
    }

    #[test]
    fn open_while_active_is_rejected_with_immediate_dismissal() {
        let mut orch = orchestrator(4);
        open_to_idle(&mut orch);

        let dismissed = Arc::new(Mutex::new(None));
        let sink = dismissed.clone();
        let err = orch
            .open(OpenRequest {
                completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
                ..OpenRequest::default()
            })
            .unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyActive));
        assert_eq!(orch.state(), MenuState::Open(None));
        assert_eq!(*dismissed.lock().unwrap(), Some(MenuOutcome::Dismissed));
    }

    #[test]
    fn confirm_with_nothing_selected_is_rejected() {
        let mut orch = orchestrator(4);
        open_to_idle(&mut orch);
        assert!(matches!(orch.confirm(), Err(LifecycleError::NothingSelected)));
        assert_eq!(orch.state(), MenuState::Open(None));
    }

    #[test]
    fn cancelled_override_still_restores_the_baseline() {
        let mut orch = orchestrator(8);
        let override_config = config(3);
        orch.open(OpenRequest {
            override_config: Some(override_config),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();
        assert_eq!(orch.active().items.len(), 3);

        orch.cancel().unwrap();
        orch.closing_elapsed().unwrap();

        assert_eq!(orch.state(), MenuState::Closed);
        assert_eq!(orch.active().items.len(), 8);
        assert_eq!(orch.baseline().items.len(), 8);
    }

    #[test]
    fn return_selection_only_never_executes() {
        let outcome = Arc::new(Mutex::new(None));
        let sink = outcome.clone();

        let mut orch = orchestrator(5);
        orch.open(OpenRequest {
            return_selection_only: true,
            completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();
        orch.step(StepDirection::Clockwise);

        let confirmation = orch.confirm().unwrap();
        assert!(matches!(confirmation, Confirmation::Close(_)));
        assert_eq!(orch.state(), MenuState::Closing);
        orch.closing_elapsed().unwrap();

        assert!(matches!(
            outcome.lock().unwrap().take(),
            Some(MenuOutcome::Selected { .. })
        ));
    }

    #[test]
    fn sticky_menu_stays_open_after_execution() {
        let mut base = config(4);
        base.behavior.sticky = true;
        let mut orch =
            Orchestrator::new(base, Box::new(Recorder::default()), Box::new(NullAnnouncer));
        open_to_idle(&mut orch);

        orch.step(StepDirection::Clockwise);
        orch.confirm().unwrap();
        let resolution = orch.execution_finished(Ok(())).unwrap();
        assert_eq!(resolution, ExecutionResolution::StayOpen);
        assert_eq!(orch.state(), MenuState::Open(None));
    }

    #[test]
    fn execution_failure_closes_and_still_reports_the_item() {
        let outcome = Arc::new(Mutex::new(None));
        let sink = outcome.clone();

        let mut orch = orchestrator(4);
        orch.open(OpenRequest {
            completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();
        orch.step(StepDirection::Clockwise);
        orch.confirm().unwrap();

        let resolution = orch
            .execution_finished(Err(ExecutionError::BadCommand("oops".into())))
            .unwrap();
        assert!(matches!(resolution, ExecutionResolution::Close(_)));
        orch.closing_elapsed().unwrap();
        assert!(matches!(
            outcome.lock().unwrap().take(),
            Some(MenuOutcome::Selected { .. })
        ));
    }

    #[test]
    fn focus_loss_dismisses_an_open_menu() {
        let outcome = Arc::new(Mutex::new(None));
        let sink = outcome.clone();

        let mut orch = orchestrator(4);
        orch.open(OpenRequest {
            completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();
        orch.step(StepDirection::Clockwise);

        let after = orch.focus_changed(false);
        assert!(after.is_some());
        assert_eq!(orch.state(), MenuState::Closing);
        orch.closing_elapsed().unwrap();
        assert_eq!(*outcome.lock().unwrap(), Some(MenuOutcome::Dismissed));
    }

    #[test]
    fn focus_changes_outside_an_interactive_state_are_ignored() {
        let mut orch = orchestrator(4);
        // closed: nothing to dismiss
        assert_eq!(orch.focus_changed(false), None);

        open_to_idle(&mut orch);
        // regaining focus never transitions
        assert_eq!(orch.focus_changed(true), None);
        assert_eq!(orch.state(), MenuState::Open(None));

        // mid-execution the cycle finishes through the execution result
        orch.step(StepDirection::Clockwise);
        orch.confirm().unwrap();
        assert_eq!(orch.focus_changed(false), None);
        assert_eq!(orch.state(), MenuState::Executing(0));
        assert!(matches!(
            orch.execution_finished(Ok(())).unwrap(),
            ExecutionResolution::Close(_)
        ));
    }

    #[test]
    fn click_outside_every_slice_closes() {
        let mut orch = orchestrator(6);
        open_to_idle(&mut orch);
        let outcome = orch.click(Point::new(0.0, 1000.0)).unwrap();
        assert!(matches!(outcome, ClickOutcome::Cancelled(_)));
        assert_eq!(orch.state(), MenuState::Closing);
    }

    #[test]
    fn click_inside_selects_and_confirms() {
        let mut orch = orchestrator(6);
        open_to_idle(&mut orch);
        let anchor = orch.slices()[4].label_anchor;
        let outcome = orch.click(anchor).unwrap();
        assert!(matches!(outcome, ClickOutcome::Confirmed(Confirmation::Execute(_))));
        assert_eq!(orch.state(), MenuState::Executing(4));
    }

    #[test]
    fn selection_is_sticky_across_dead_input() {
        let mut orch = orchestrator(8);
        open_to_idle(&mut orch);
        orch.stick_moved(0.0, -1.0);
        assert_eq!(orch.selected(), Some(0));
        // scenario B: a faint nudge changes nothing
        orch.stick_moved(0.02, 0.01);
        assert_eq!(orch.selected(), Some(0));
    }

    #[test]
    fn task_switcher_action_becomes_a_context_switch() {
        let mut base = config(3);
        base.items[1].action = ActionDescriptor::TaskSwitcher;
        let mut orch =
            Orchestrator::new(base, Box::new(Recorder::default()), Box::new(NullAnnouncer));
        open_to_idle(&mut orch);
        orch.step(StepDirection::Clockwise);
        orch.step(StepDirection::Clockwise);
        assert_eq!(orch.selected(), Some(1));

        let confirmation = orch.confirm().unwrap();
        assert_eq!(
            confirmation,
            Confirmation::SwitchContext(NavigationContext::TaskSwitcher)
        );
        // still open; the host now resolves and swaps
        orch.swap_configuration(config(5), NavigationContext::TaskSwitcher)
            .unwrap();
        assert_eq!(orch.state(), MenuState::Open(None));
        assert_eq!(orch.active().items.len(), 5);
        assert_eq!(orch.context(), NavigationContext::TaskSwitcher);

        // closing still lands back on the baseline, context reset
        orch.cancel().unwrap();
        orch.closing_elapsed().unwrap();
        assert_eq!(orch.active().items.len(), 3);
        assert_eq!(orch.context(), NavigationContext::Default);
    }

    #[test]
    fn config_edit_relayouts_an_open_baseline_menu() {
        let mut orch = orchestrator(4);
        open_to_idle(&mut orch);
        assert_eq!(orch.slices().len(), 4);

        let mut edited = config(6);
        edited.appearance.radius = 200.0;
        orch.config_changed(edited).unwrap();
        assert_eq!(orch.slices().len(), 6);
        assert_eq!(orch.baseline().items.len(), 6);
    }

    #[test]
    fn config_edit_under_an_override_only_updates_the_baseline() {
        let mut orch = orchestrator(4);
        orch.open(OpenRequest {
            override_config: Some(config(3)),
            ..OpenRequest::default()
        })
        .unwrap();
        orch.opening_elapsed().unwrap();

        orch.config_changed(config(9)).unwrap();
        assert_eq!(orch.slices().len(), 3);
        assert_eq!(orch.baseline().items.len(), 9);
    }

    #[test]
    fn config_shrink_drops_an_orphaned_selection() {
        let mut orch = orchestrator(6);
        open_to_idle(&mut orch);
        for _ in 0..6 {
            orch.step(StepDirection::Clockwise);
        }
        assert_eq!(orch.selected(), Some(5));
        orch.config_changed(config(2)).unwrap();
        assert_eq!(orch.selected(), None);
    }

    #[test]
    fn open_with_empty_override_fails_fast() {
        let mut orch = orchestrator(4);
        let err = orch
            .open(OpenRequest {
                override_config: Some(MenuConfiguration::new(Vec::new())),
                ..OpenRequest::default()
            })
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidConfiguration(_)));
        assert_eq!(orch.state(), MenuState::Closed);
        // the bad override must not leak into the next cycle
        open_to_idle(&mut orch);
        assert_eq!(orch.active().items.len(), 4);
    }

    #[test]
    fn timed_transitions_reject_out_of_order_delivery() {
        let mut orch = orchestrator(4);
        assert!(matches!(
            orch.opening_elapsed(),
            Err(LifecycleError::NotApplicable { .. })
        ));
        assert!(matches!(
            orch.closing_elapsed(),
            Err(LifecycleError::NotApplicable { .. })
        ));
        open_to_idle(&mut orch);
        assert!(matches!(
            orch.opening_elapsed(),
            Err(LifecycleError::NotApplicable { .. })
        ));
    }

    #[test]
    fn nudge_moves_center_and_anchors_together() {
        let mut orch = orchestrator(4);
        open_to_idle(&mut orch);
        let before = orch.slices()[0].label_anchor;
        orch.nudge(10.0, -5.0);
        let after = orch.slices()[0].label_anchor;
        assert_eq!(after.x, before.x + 10.0);
        assert_eq!(after.y, before.y - 5.0);
        // hit-testing still works at the shifted anchor
        assert_eq!(orch.pointer_moved(after), Some(0));
    }
}
