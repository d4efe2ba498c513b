//! Input images: decoding, async sources and the background-removal seam.

/// Image bytes to premultiplied pixels.
pub mod decode;
/// The decoded image type.
pub mod image;
/// Background removal collaborator.
pub mod removal;
/// Async image sources with timeouts.
pub mod source;
