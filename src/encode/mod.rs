//! Output encoding for finished surfaces.

/// PNG bytes and `data:` URIs.
pub mod png;
