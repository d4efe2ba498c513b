/// Font registry and shaping.
pub mod fonts;
