//! Keeps a list of data-source attributions in sync with what the map shows.
//!
//! `AttributionView` observes a `map::Map`: its layer collection, every
//! layer's visibility flag and store readiness, and the view parameters. It
//! renders one element per attribution through a `RenderSurface` and toggles
//! each element as the viewport moves in and out of the attribution's
//! coverage areas.

pub mod cache;
pub mod dispatcher;
pub mod registry;
pub mod subscriptions;
pub mod surface;
pub mod view;
pub mod visibility;

pub use cache::*;
pub use dispatcher::*;
pub use registry::*;
pub use subscriptions::*;
pub use surface::*;
pub use view::*;
pub use visibility::*;
