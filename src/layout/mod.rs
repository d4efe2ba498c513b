/// Anchor resolution.
pub mod anchor;
