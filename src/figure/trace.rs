//! Scatter traces and their styling blocks.

use crate::error::PlotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A marker color: a number mapped through the color scale, or a literal CSS color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Value(f64),
    Css(String),
}

impl Color {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Color::Value(_))
    }
}

impl From<f64> for Color {
    fn from(value: f64) -> Self {
        Color::Value(value)
    }
}

impl From<&str> for Color {
    fn from(css: &str) -> Self {
        Color::Css(css.to_string())
    }
}

/// Drawing mode of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "markers+text")]
    MarkersText,
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+text")]
    LinesText,
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $error:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = PlotError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.name().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| PlotError::$error(s.to_string()))
            }
        }
    };
}

named_enum! {
    /// Where a label sits relative to its marker.
    TextPosition, UnknownTextPosition {
        TopLeft => "top left",
        TopCenter => "top center",
        TopRight => "top right",
        MiddleLeft => "middle left",
        MiddleCenter => "middle center",
        MiddleRight => "middle right",
        BottomLeft => "bottom left",
        BottomCenter => "bottom center",
        BottomRight => "bottom right",
    }
}

named_enum! {
    /// Built-in plotly color scales.
    ColorScale, UnknownColorScale {
        Greys => "Greys",
        YlGnBu => "YlGnBu",
        Greens => "Greens",
        YlOrRd => "YlOrRd",
        Bluered => "Bluered",
        RdBu => "RdBu",
        Reds => "Reds",
        Blues => "Blues",
        Picnic => "Picnic",
        Rainbow => "Rainbow",
        Portland => "Portland",
        Jet => "Jet",
        Hot => "Hot",
        Blackbody => "Blackbody",
        Earth => "Earth",
        Electric => "Electric",
        Viridis => "Viridis",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Line {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self {
            width: Some(width),
            color: Some(color.into()),
        }
    }

    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBarTitle {
    pub text: String,
    pub side: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub thickness: f64,
    pub xanchor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ColorBarTitle>,
}

impl ColorBar {
    pub fn new(title: Option<String>) -> Self {
        Self {
            thickness: 15.0,
            xanchor: "left",
            title: title.map(|text| ColorBarTitle {
                text,
                side: "right",
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub size: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<ColorScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversescale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A plotly `scatter` trace.
///
/// `x` and `y` use `None` as the gap between line segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    #[serde(rename = "type")]
    kind: &'static str,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: Mode,
    pub hoverinfo: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hovertext: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<TextPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

impl Scatter {
    pub fn new(mode: Mode) -> Self {
        Self {
            kind: "scatter",
            x: Vec::new(),
            y: Vec::new(),
            mode,
            hoverinfo: "text",
            text: Vec::new(),
            hovertext: Vec::new(),
            textposition: None,
            marker: None,
            line: None,
        }
    }

    /// Number of coordinate entries, gaps included.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push_point(&mut self, x: f64, y: f64) {
        self.x.push(Some(x));
        self.y.push(Some(y));
    }

    pub fn push_gap(&mut self) {
        self.x.push(None);
        self.y.push(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Top Left".parse::<TextPosition>().unwrap(), TextPosition::TopLeft);
        assert_eq!("viridis".parse::<ColorScale>().unwrap(), ColorScale::Viridis);
        assert!(matches!(
            "sideways".parse::<TextPosition>(),
            Err(PlotError::UnknownTextPosition(_))
        ));
        assert!(matches!(
            "Plasma".parse::<ColorScale>(),
            Err(PlotError::UnknownColorScale(_))
        ));
        assert_eq!(ColorScale::ALL.len(), 17);
    }

    #[test]
    fn gaps_serialize_as_null() {
        let mut trace = Scatter::new(Mode::Lines);
        trace.push_point(0.0, 1.0);
        trace.push_point(2.0, 3.0);
        trace.push_gap();
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["x"], json!([0.0, 2.0, null]));
        assert_eq!(value["type"], "scatter");
        assert_eq!(value["mode"], "lines");
        assert!(value.get("marker").is_none());
    }

    #[test]
    fn colors_serialize_untagged() {
        let colors = vec![Color::from(3.0), Color::from("#ff0000")];
        assert_eq!(serde_json::to_value(colors).unwrap(), json!([3.0, "#ff0000"]));
    }
}
