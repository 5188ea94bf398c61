use super::annotation::Annotation;
use serde::Serialize;

/// Background used when the figure is transparent.
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

impl Title {
    pub fn new(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            font: Font { size },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            b: 20,
            l: 5,
            r: 5,
            t: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub showgrid: bool,
    pub zeroline: bool,
    pub showticklabels: bool,
}

impl Axis {
    /// No grid, zero line or tick labels.
    pub fn hidden() -> Self {
        Self {
            showgrid: false,
            zeroline: false,
            showticklabels: false,
        }
    }
}

/// The plotly `layout` block of a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub showlegend: bool,
    pub hovermode: &'static str,
    pub margin: Margin,
    pub annotations: Vec<Annotation>,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
}

impl FigureLayout {
    pub fn new(title: Title) -> Self {
        Self {
            title,
            showlegend: false,
            hovermode: "closest",
            margin: Margin::default(),
            annotations: Vec::new(),
            xaxis: Axis::hidden(),
            yaxis: Axis::hidden(),
            plot_bgcolor: None,
            paper_bgcolor: None,
        }
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        let background = transparent.then(|| TRANSPARENT.to_string());
        self.plot_bgcolor = background.clone();
        self.paper_bgcolor = background;
        self
    }

    /// Edge arrows among the annotations.
    pub fn arrows(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| a.is_arrow())
    }
}
