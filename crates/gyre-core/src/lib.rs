//! gyre-core: the geometry, selection, and lifecycle engine behind the gyre
//! radial menu. Pure math and a single-writer state machine, with no windows,
//! I/O, or runtime of its own. Hosts wire in the surface, executor, and
//! announcer.

pub mod automation;
pub mod geometry;
pub mod icon;
pub mod lifecycle;
pub mod menu;
pub mod schema;
pub mod selection;
pub mod source;

#[macro_export]
macro_rules! impl_string_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }
    };
}
