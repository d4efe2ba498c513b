use crate::{
    assets::image::PreparedImage,
    composition::session::EditSession,
    foundation::{
        core::Canvas,
        error::{ThumbError, ThumbResult},
    },
    render::compositor::Compositor,
};

/// Where the thumbnail came from: an uploaded file name or a URL.
pub type SourceRef = String;

/// Stage of the create-a-thumbnail flow, carrying only what that stage needs.
///
/// Forward transitions consume the stage and fail with [`ThumbError::Validation`] when called
/// from the wrong stage; [`WorkflowStage::previous`] always succeeds.
#[derive(Clone, Debug)]
pub enum WorkflowStage {
    /// A video or image has been chosen.
    Video {
        /// Chosen source.
        source: SourceRef,
    },
    /// A still frame has been captured.
    Snapshot {
        /// Chosen source.
        source: SourceRef,
        /// Captured frame.
        frame: PreparedImage,
    },
    /// The background has been removed.
    Edit {
        /// Chosen source.
        source: SourceRef,
        /// Captured frame, used as the base layer.
        frame: PreparedImage,
        /// Foreground cutout of `frame`.
        cutout: PreparedImage,
    },
    /// Text layers and filters are being edited.
    Text {
        /// Chosen source.
        source: SourceRef,
        /// Base layer.
        frame: PreparedImage,
        /// Foreground cutout.
        cutout: PreparedImage,
        /// Caller-owned editing state.
        session: EditSession,
    },
    /// The composite has been rendered.
    Preview {
        /// Chosen source.
        source: SourceRef,
        /// Base layer.
        frame: PreparedImage,
        /// Foreground cutout.
        cutout: PreparedImage,
        /// Editing state that produced `png`.
        session: EditSession,
        /// Encoded result.
        png: Vec<u8>,
    },
}

impl WorkflowStage {
    /// Start the flow from a chosen source.
    pub fn start(source: impl Into<SourceRef>) -> Self {
        Self::Video {
            source: source.into(),
        }
    }

    /// Stage name, lowercase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video { .. } => "video",
            Self::Snapshot { .. } => "snapshot",
            Self::Edit { .. } => "edit",
            Self::Text { .. } => "text",
            Self::Preview { .. } => "preview",
        }
    }

    /// Name of the stage a forward transition leads to, if any.
    pub fn next_stage_name(&self) -> Option<&'static str> {
        match self {
            Self::Video { .. } => Some("snapshot"),
            Self::Snapshot { .. } => Some("edit"),
            Self::Edit { .. } => Some("text"),
            Self::Text { .. } => Some("preview"),
            Self::Preview { .. } => None,
        }
    }

    /// Video -> Snapshot.
    pub fn capture(self, frame: PreparedImage) -> ThumbResult<Self> {
        match self {
            Self::Video { source } => Ok(Self::Snapshot { source, frame }),
            other => Err(other.wrong_stage("capture")),
        }
    }

    /// Snapshot -> Edit, given the cutout of the captured frame.
    pub fn with_cutout(self, cutout: PreparedImage) -> ThumbResult<Self> {
        match self {
            Self::Snapshot { source, frame } => {
                if (cutout.width, cutout.height) != (frame.width, frame.height) {
                    tracing::debug!(
                        frame_w = frame.width,
                        frame_h = frame.height,
                        cutout_w = cutout.width,
                        cutout_h = cutout.height,
                        "cutout size differs from frame; it will be resampled"
                    );
                }
                Ok(Self::Edit {
                    source,
                    frame,
                    cutout,
                })
            }
            other => Err(other.wrong_stage("with_cutout")),
        }
    }

    /// Edit -> Text.
    pub fn start_text(self, session: EditSession) -> ThumbResult<Self> {
        match self {
            Self::Edit {
                source,
                frame,
                cutout,
            } => Ok(Self::Text {
                source,
                frame,
                cutout,
                session,
            }),
            other => Err(other.wrong_stage("start_text")),
        }
    }

    /// Text -> Preview: composite the session and keep the PNG.
    pub fn render_preview(
        self,
        compositor: &mut Compositor,
        target: Option<Canvas>,
    ) -> ThumbResult<Self> {
        match self {
            Self::Text {
                source,
                frame,
                cutout,
                session,
            } => {
                let png = compositor.composite_png(
                    &frame,
                    &cutout,
                    session.text_elements(),
                    session.filters(),
                    target,
                )?;
                Ok(Self::Preview {
                    source,
                    frame,
                    cutout,
                    session,
                    png,
                })
            }
            other => Err(other.wrong_stage("render_preview")),
        }
    }

    /// Step back one stage, dropping what the later stage added.
    pub fn previous(self) -> Self {
        match self {
            Self::Video { source } | Self::Snapshot { source, .. } => Self::Video { source },
            Self::Edit { source, frame, .. } => Self::Snapshot { source, frame },
            Self::Text {
                source,
                frame,
                cutout,
                ..
            } => Self::Edit {
                source,
                frame,
                cutout,
            },
            Self::Preview {
                source,
                frame,
                cutout,
                session,
                ..
            } => Self::Text {
                source,
                frame,
                cutout,
                session,
            },
        }
    }

    /// Editing state, in the stages that have one.
    pub fn session(&self) -> Option<&EditSession> {
        match self {
            Self::Text { session, .. } | Self::Preview { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Mutable editing state, in the stages that have one.
    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match self {
            Self::Text { session, .. } | Self::Preview { session, .. } => Some(session),
            _ => None,
        }
    }

    fn wrong_stage(&self, op: &str) -> ThumbError {
        ThumbError::validation(format!("cannot {op} from the {} stage", self.name()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/workflow.rs"]
mod tests;
