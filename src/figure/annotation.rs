use glam::DVec2;
use serde::Serialize;

/// Coordinate system an annotation position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRef {
    Paper,
    X,
    Y,
}

/// A plotly layout annotation: the caption under the plot, or an edge arrow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub showarrow: bool,
    pub x: f64,
    pub y: f64,
    pub xref: AxisRef,
    pub yref: AxisRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axref: Option<AxisRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayref: Option<AxisRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowhead: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowsize: Option<f64>,
}

impl Annotation {
    /// Text pinned to the lower left corner of the paper.
    pub fn caption(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            showarrow: false,
            x: 0.005,
            y: -0.002,
            xref: AxisRef::Paper,
            yref: AxisRef::Paper,
            ax: None,
            ay: None,
            axref: None,
            ayref: None,
            arrowhead: None,
            arrowsize: None,
        }
    }

    /// An arrow from `tail` to `head`, both in data coordinates.
    pub fn arrow(tail: DVec2, head: DVec2, arrowhead: u8, arrowsize: f64) -> Self {
        Self {
            text: None,
            showarrow: true,
            x: head.x,
            y: head.y,
            xref: AxisRef::X,
            yref: AxisRef::Y,
            ax: Some(tail.x),
            ay: Some(tail.y),
            axref: Some(AxisRef::X),
            ayref: Some(AxisRef::Y),
            arrowhead: Some(arrowhead),
            arrowsize: Some(arrowsize),
        }
    }

    pub fn is_arrow(&self) -> bool {
        self.showarrow
    }

    pub fn head(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Start of the arrow, if this is one.
    pub fn tail(&self) -> Option<DVec2> {
        Some(DVec2::new(self.ax?, self.ay?))
    }
}
