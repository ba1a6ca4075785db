//! End-to-end exercises of the core: geometry through lifecycle through
//! automation, with fake collaborators standing in for the host.

use gyre_core::automation::{self, ExecuteTarget, MenuOutcome};
use gyre_core::geometry::Point;
use gyre_core::lifecycle::{
    AnnouncePriority, Announcer, MenuState, NullAnnouncer, Orchestrator, OpenRequest,
    SurfaceDriver,
};
use gyre_core::menu::{ActionDescriptor, MenuConfiguration, MenuItem};
use gyre_core::schema::MenuDefinition;
use std::sync::{Arc, Mutex};

struct NullSurface;

impl SurfaceDriver for NullSurface {
    fn show(&mut self, _at: Option<Point>) {}
    fn hide(&mut self) {}
    fn update_size(&mut self, _radius: f64) {}
    fn move_by(&mut self, _dx: f64, _dy: f64) {}
}

#[derive(Clone, Default)]
struct SpyAnnouncer(Arc<Mutex<Vec<(AnnouncePriority, String)>>>);

impl Announcer for SpyAnnouncer {
    fn announce(&mut self, priority: AnnouncePriority, text: &str) {
        self.0.lock().unwrap().push((priority, text.to_string()));
    }
}

fn items(n: usize) -> Vec<MenuItem> {
    (0..n)
        .map(|i| {
            MenuItem::new(
                format!("id-{i}"),
                format!("Item {i}"),
                ActionDescriptor::Run { command: format!("cmd {i}") },
            )
        })
        .collect()
}

#[test]
fn scenario_a_eight_items_default_radii() {
    let config = MenuConfiguration::new(items(8));
    assert_eq!(config.appearance.radius, 150.0);
    assert_eq!(config.appearance.center_radius, 40.0);

    let mut orch = Orchestrator::new(config, Box::new(NullSurface), Box::new(NullAnnouncer));
    orch.open(OpenRequest::default()).unwrap();

    let slices = orch.slices();
    assert_eq!(slices.len(), 8);
    for slice in slices {
        assert!((slice.width().to_degrees() - 45.0).abs() < 1e-9);
    }
    assert!((slices[0].start_angle.to_degrees() - -90.0).abs() < 1e-9);
    assert!((slices[0].end_angle.to_degrees() - -45.0).abs() < 1e-9);
}

#[test]
fn scenario_b_faint_stick_keeps_the_selection() {
    let mut config = MenuConfiguration::new(items(8));
    config.behavior.deadzone = 0.3;
    let mut orch = Orchestrator::new(config, Box::new(NullSurface), Box::new(NullAnnouncer));
    orch.open(OpenRequest::default()).unwrap();
    orch.opening_elapsed().unwrap();

    orch.stick_moved(1.0, 0.0);
    let before = orch.selected();
    assert!(before.is_some());

    orch.stick_moved(0.02, 0.01);
    assert_eq!(orch.selected(), before);
}

#[test]
fn scenario_c_override_cancel_restores_configuration_a() {
    let config_a = MenuConfiguration::new(items(8));
    let config_b = MenuConfiguration::new(items(3));

    let mut orch =
        Orchestrator::new(config_a.clone(), Box::new(NullSurface), Box::new(NullAnnouncer));
    orch.open(OpenRequest {
        override_config: Some(config_b),
        ..OpenRequest::default()
    })
    .unwrap();
    orch.opening_elapsed().unwrap();
    assert_eq!(orch.active().items.len(), 3);

    orch.cancel().unwrap();
    orch.closing_elapsed().unwrap();

    assert_eq!(orch.state(), MenuState::Closed);
    assert_eq!(orch.active(), &config_a);
}

#[test]
fn scenario_d_execute_by_unknown_title_is_not_found() {
    let config = MenuConfiguration::new(items(4));
    let err = automation::find_item(
        &config,
        &ExecuteTarget::Title { title: "No Such Item".into() },
    )
    .unwrap_err();
    assert_eq!(err.kind(), "not-found");
}

#[test]
fn announcements_carry_item_count_and_position() {
    let spy = SpyAnnouncer::default();
    let log = spy.0.clone();
    let mut orch = Orchestrator::new(
        MenuConfiguration::new(items(5)),
        Box::new(NullSurface),
        Box::new(spy),
    );
    orch.open(OpenRequest::default()).unwrap();
    orch.opening_elapsed().unwrap();
    orch.step(gyre_core::selection::StepDirection::Clockwise);

    let log = log.lock().unwrap();
    assert_eq!(log[0], (AnnouncePriority::Open, "Menu opened with 5 items".to_string()));
    assert_eq!(log[1], (AnnouncePriority::Select, "Item 0, 1 of 5".to_string()));
}

#[test]
fn inline_definition_flows_through_an_override_cycle() {
    let baseline = MenuConfiguration::new(items(2));
    let def = MenuDefinition::parse(
        r#"{"name":"quick","items":[
            {"title":"Screenshot","action":{"type":"run","command":"grim"}},
            {"title":"Lock","action":{"type":"run","command":"swaylock"}},
            {"title":"Logout","action":{"type":"internal","name":"logout"}}
        ]}"#,
    )
    .unwrap();
    let override_config = def.into_configuration(&baseline);

    let outcome = Arc::new(Mutex::new(None));
    let sink = outcome.clone();
    let mut orch =
        Orchestrator::new(baseline, Box::new(NullSurface), Box::new(NullAnnouncer));
    orch.open(OpenRequest {
        override_config: Some(override_config),
        return_selection_only: true,
        completion: Some(Box::new(move |o| *sink.lock().unwrap() = Some(o))),
        ..OpenRequest::default()
    })
    .unwrap();
    orch.opening_elapsed().unwrap();

    // pick "Lock" via its slice anchor
    let anchor = orch.slices()[1].label_anchor;
    orch.pointer_moved(anchor);
    orch.confirm().unwrap();
    orch.closing_elapsed().unwrap();

    match outcome.lock().unwrap().take() {
        Some(MenuOutcome::Selected { item }) => {
            assert_eq!(item.id.to_string(), "lock");
            assert_eq!(item.title, "Lock");
            assert_eq!(item.position, 2);
        }
        other => panic!("expected lock to be selected, got {other:?}"),
    }
    // baseline is back
    assert_eq!(orch.active().items.len(), 2);
}
