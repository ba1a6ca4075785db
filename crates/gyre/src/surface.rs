//! Stand-in collaborators. The real overlay surface and screen-reader
//! bridge live outside this process; the daemon ships logging versions so
//! the lifecycle can run headless.

use gyre_core::geometry::Point;
use gyre_core::lifecycle::{AnnouncePriority, Announcer, SurfaceDriver};

pub struct LogSurface;

impl SurfaceDriver for LogSurface {
    fn show(&mut self, at: Option<Point>) {
        log::debug!("surface: show at {at:?}");
    }

    fn hide(&mut self) {
        log::debug!("surface: hide");
    }

    fn update_size(&mut self, radius: f64) {
        log::debug!("surface: resize for radius {radius}");
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        log::debug!("surface: move by ({dx}, {dy})");
    }
}

pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, priority: AnnouncePriority, text: &str) {
        log::info!("announce [{priority:?}]: {text}");
    }
}
