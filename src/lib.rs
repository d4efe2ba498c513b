//! thumbforge composites video thumbnails: a filtered base frame, styled text layers and
//! a background-removed foreground cutout, rendered deterministically on the CPU.
//!
//! The typical flow is:
//!
//! - Build [`TextElement`]s and an [`ImageFilter`] (directly or through an [`EditSession`])
//! - Decode or load the base frame and its cutout as [`PreparedImage`]s
//! - Run a [`Compositor`] and encode the [`CompositeOutput`] as PNG or a data URI
//!
//! Text sized in logical pixels against a 1280 px reference width scales with the output.
//! Fonts are registered on a [`FontBook`]; unknown families fall back to a built-in bitmap
//! face so output never depends on system fonts.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Input images.
pub mod assets;
/// Editing data and workflow.
pub mod composition;
/// Image filters.
pub mod effects;
/// Output encoding.
pub mod encode;
/// Pivot resolution.
pub mod layout;
/// Surfaces, text layers and compositing.
pub mod render;
/// Fonts.
pub mod text;

pub use crate::foundation::color::parse_css_color;
pub use crate::foundation::config::RenderConfig;
pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{ThumbError, ThumbResult};

pub use crate::assets::decode::decode_image;
pub use crate::assets::image::PreparedImage;
pub use crate::assets::removal::{BackgroundRemover, ChromaKeyRemover, ProgressFn};
pub use crate::assets::source::{
    BytesSource, DataUriSource, FileSource, ImageSource, decode_data_uri, load_inputs,
};
pub use crate::composition::model::{Anchor, ImageFilter, LayerOrder, TextAlign, TextElement};
pub use crate::composition::session::EditSession;
pub use crate::composition::workflow::WorkflowStage;
pub use crate::effects::filter::{
    FilterChain, FilterOp, NO_FILTER, build_filter_string, parse_filter_string,
};
pub use crate::effects::presets::{PRESET_NAMES, filter_preset};
pub use crate::encode::png::{encode_png, to_data_uri};
pub use crate::layout::anchor::{
    ANCHOR_MARGIN_PX, pivot_transform, resolve_pivot, resolve_position,
};
pub use crate::render::compositor::{
    CompositeOutput, Compositor, RenderReport, SkippedElement, composite_png,
};
pub use crate::render::raster::Shadow;
pub use crate::render::surface::{DrawState, Surface, SurfaceScope};
pub use crate::render::text::render_text_element;
pub use crate::text::fonts::{FontBook, FontSpec};
