//! Editing data: text elements, filter settings, edit sessions and workflow stages.

/// Text element and filter settings.
pub mod model;
/// Caller-owned edit session with undo/redo.
pub mod session;
/// Stages of the thumbnail flow.
pub mod workflow;
