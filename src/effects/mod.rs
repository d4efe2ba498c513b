//! Photographic filters for the base image.

pub(crate) mod blur;
/// CSS filter strings and their pixel implementation.
pub mod filter;
/// Named filter presets.
pub mod presets;
