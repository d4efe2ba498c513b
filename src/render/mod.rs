//! Raster surface, text layers and the compositor.

pub(crate) mod composite;
/// Layer ordering and output.
pub mod compositor;
pub(crate) mod raster;
/// Drawing surface with a state stack.
pub mod surface;
/// Text element rendering.
pub mod text;
