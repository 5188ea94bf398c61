use super::encoding::{ColorMethod, SizeMethod};
use crate::error::Result;
use crate::figure::{ColorScale, TextPosition};
use crate::layout::LayoutKind;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Everything that controls how a graph becomes a figure.
///
/// Build it with the setters, or load it from JSON with [`PlotOptions::from_json`];
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub title: String,
    pub layout: Option<LayoutKind>,
    pub size_method: SizeMethod,
    pub color_method: ColorMethod,
    pub node_label: Option<String>,
    pub node_label_position: TextPosition,
    pub node_text: Vec<String>,
    pub edge_label: Option<String>,
    pub edge_label_position: TextPosition,
    pub edge_text: Vec<String>,
    #[serde(alias = "titlefont_size")]
    pub title_font_size: u32,
    #[serde(alias = "showlegend")]
    pub show_legend: bool,
    pub annotation_text: Option<String>,
    pub colorscale: ColorScale,
    pub colorbar_title: Option<String>,
    pub node_opacity: f64,
    pub arrow_size: f64,
    pub arrow_head: u8,
    pub transparent_background: bool,
    #[serde(alias = "highlight_neighbours_on_hover")]
    pub highlight_neighbors_on_hover: bool,
    pub figure_layout: Map<String, Value>,
    pub node_style: Map<String, Value>,
    pub seed: Option<u64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: "Graph".to_string(),
            layout: None,
            size_method: SizeMethod::Degree,
            color_method: ColorMethod::Degree,
            node_label: None,
            node_label_position: TextPosition::BottomCenter,
            node_text: Vec::new(),
            edge_label: None,
            edge_label_position: TextPosition::MiddleCenter,
            edge_text: Vec::new(),
            title_font_size: 16,
            show_legend: false,
            annotation_text: None,
            colorscale: ColorScale::YlGnBu,
            colorbar_title: None,
            node_opacity: 0.8,
            arrow_size: 2.0,
            arrow_head: 1,
            transparent_background: true,
            highlight_neighbors_on_hover: true,
            figure_layout: Map::new(),
            node_style: Map::new(),
            seed: None,
        }
    }
}

impl PlotOptions {
    /// Get a instance of `PlotOptions` with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Figure title.
    ///
    /// Default: `"Graph"`
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Layout to compute. Without one, stored positions are reused when every node has
    /// one, and a random layout is drawn otherwise.
    ///
    /// Default: `None`
    pub fn layout(mut self, layout: LayoutKind) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Default: [`SizeMethod::Degree`]
    pub fn size_method(mut self, method: impl Into<SizeMethod>) -> Self {
        self.size_method = method.into();
        self
    }

    /// Default: [`ColorMethod::Degree`]
    pub fn color_method(mut self, method: impl Into<ColorMethod>) -> Self {
        self.color_method = method.into();
        self
    }

    /// Node attribute shown as text next to each node.
    ///
    /// Default: `None`
    pub fn node_label(mut self, attribute: impl Into<String>) -> Self {
        self.node_label = Some(attribute.into());
        self
    }

    /// Default: `"bottom center"`
    pub fn node_label_position(mut self, position: TextPosition) -> Self {
        self.node_label_position = position;
        self
    }

    /// Node attributes appended to the hover text.
    ///
    /// Default: none
    pub fn node_text<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_text = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Edge attribute shown as text at the middle of each edge.
    ///
    /// Default: `None`
    pub fn edge_label(mut self, attribute: impl Into<String>) -> Self {
        self.edge_label = Some(attribute.into());
        self
    }

    /// Default: `"middle center"`
    pub fn edge_label_position(mut self, position: TextPosition) -> Self {
        self.edge_label_position = position;
        self
    }

    /// Edge attributes shown when hovering the middle of an edge.
    ///
    /// Default: none
    pub fn edge_text<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_text = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Default: `16`
    pub fn title_font_size(mut self, size: u32) -> Self {
        self.title_font_size = size;
        self
    }

    /// Default: `false`
    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Caption in the lower left corner.
    ///
    /// Default: `None`
    pub fn annotation_text(mut self, text: impl Into<String>) -> Self {
        self.annotation_text = Some(text.into());
        self
    }

    /// Default: [`ColorScale::YlGnBu`]
    pub fn colorscale(mut self, scale: ColorScale) -> Self {
        self.colorscale = scale;
        self
    }

    /// Default: `None`
    pub fn colorbar_title(mut self, title: impl Into<String>) -> Self {
        self.colorbar_title = Some(title.into());
        self
    }

    /// Default: `0.8`
    pub fn node_opacity(mut self, opacity: f64) -> Self {
        self.node_opacity = opacity;
        self
    }

    /// Size of the arrow heads drawn for directed graphs.
    ///
    /// Default: `2.0`
    pub fn arrow_size(mut self, size: f64) -> Self {
        self.arrow_size = size;
        self
    }

    /// Plotly arrow head style, `0` to `8`.
    ///
    /// Default: `1`
    pub fn arrow_head(mut self, style: u8) -> Self {
        self.arrow_head = style;
        self
    }

    /// Default: `true`
    pub fn transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    /// Dim everything but the hovered node and its neighbors.
    ///
    /// Default: `true`
    pub fn highlight_neighbors_on_hover(mut self, highlight: bool) -> Self {
        self.highlight_neighbors_on_hover = highlight;
        self
    }

    /// JSON object deep-merged into the figure layout block.
    ///
    /// Default: empty
    pub fn figure_layout(mut self, overrides: Map<String, Value>) -> Self {
        self.figure_layout = overrides;
        self
    }

    /// JSON object deep-merged into the node trace.
    ///
    /// Default: empty
    pub fn node_style(mut self, style: Map<String, Value>) -> Self {
        self.node_style = style;
        self
    }

    /// Seed for the random and spring layouts.
    ///
    /// Default: `None`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(PlotOptions::from_json("{}").unwrap(), PlotOptions::default());
    }

    #[test]
    fn loads_keywords_from_json() {
        let options = PlotOptions::from_json(
            r#"{
                "title": "Roads",
                "layout": "kamada",
                "size_method": "static",
                "color_method": "population",
                "node_text": ["population"],
                "node_label_position": "top center",
                "colorscale": "Viridis",
                "titlefont_size": 20,
                "showlegend": true,
                "figure_layout": {"width": 600},
                "seed": 9
            }"#,
        )
        .unwrap();

        assert_eq!(options.title, "Roads");
        assert_eq!(options.layout, Some(LayoutKind::Kamada));
        assert_eq!(options.size_method, SizeMethod::Static);
        assert_eq!(options.color_method, ColorMethod::Attribute("population".into()));
        assert_eq!(options.node_text, vec!["population"]);
        assert_eq!(options.node_label_position, TextPosition::TopCenter);
        assert_eq!(options.colorscale, ColorScale::Viridis);
        assert_eq!(options.title_font_size, 20);
        assert!(options.show_legend);
        assert_eq!(options.figure_layout["width"], 600);
        assert_eq!(options.seed, Some(9));
    }

    #[test]
    fn unknown_layout_name_is_rejected() {
        assert!(PlotOptions::from_json(r#"{"layout": "force"}"#).is_err());
    }
}
