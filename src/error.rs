//! Errors raised while building a figure.

use crate::layout::LayoutError;

/// Everything that can abort a [`plot`](crate::plot) call.
///
/// A failure always aborts the whole figure; there are no partial results.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("node `{node}` has no attribute `{attribute}`")]
    MissingNodeAttribute { node: String, attribute: String },

    #[error("edge `{from}` -> `{to}` has no attribute `{attribute}`")]
    MissingEdgeAttribute {
        from: String,
        to: String,
        attribute: String,
    },

    #[error("attribute `{attribute}` of node `{node}` is not a number")]
    NonNumericAttribute { node: String, attribute: String },

    #[error("{what} has {actual} entries but the graph has {expected} nodes")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown color scale `{0}`")]
    UnknownColorScale(String),

    #[error("unknown text position `{0}`")]
    UnknownTextPosition(String),

    #[error("no node with id `{0}`")]
    UnknownNode(String),

    #[error("no node is drawn at ({x}, {y})")]
    UnknownHoverPoint { x: f64, y: f64 },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;
