//! Slidetext Render Library
//!
//! Renderer abstraction that projects overlay box records onto visual
//! elements, plus an in-memory renderer for native shells and tests.

mod renderer;
mod snapshot;
mod view;

pub use renderer::{Presented, RenderResult, Renderer, RendererError, present};
pub use snapshot::{ElementSnapshot, SnapshotRenderer};
pub use view::BoxView;
