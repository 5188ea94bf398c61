//! The plotly figure produced by [`plot`](crate::plot).
//!
//! A figure is a typed mirror of plotly's JSON schema: three scatter traces and a
//! layout block. Caller supplied overrides are kept as raw JSON and deep-merged when
//! the figure is serialized.

pub mod annotation;
pub mod style;
pub mod trace;

pub use annotation::{Annotation, AxisRef};
pub use style::{Axis, FigureLayout, Font, Margin, Title, TRANSPARENT};
pub use trace::{Color, ColorBar, ColorScale, Line, Marker, Mode, Scatter, TextPosition};

use crate::error::Result;
use crate::hover::{HoverEvent, HoverState, NeighborHighlighter};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

/// Index of the edge line trace in [`Figure::data`].
pub const EDGE_TRACE: usize = 0;
/// Index of the node marker trace in [`Figure::data`].
pub const NODE_TRACE: usize = 1;
/// Index of the invisible edge midpoint trace in [`Figure::data`].
pub const MIDPOINT_TRACE: usize = 2;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    /// Edge lines, nodes and edge midpoints, in that order.
    pub data: [Scatter; 3],
    pub layout: FigureLayout,
    #[serde(skip)]
    node_style: Map<String, Value>,
    #[serde(skip)]
    layout_overrides: Map<String, Value>,
    #[serde(skip)]
    highlighter: Option<NeighborHighlighter>,
}

impl Figure {
    pub fn new(data: [Scatter; 3], layout: FigureLayout) -> Self {
        Self {
            data,
            layout,
            node_style: Map::new(),
            layout_overrides: Map::new(),
            highlighter: None,
        }
    }

    /// Extra properties merged into the node trace on serialization.
    pub fn with_node_style(mut self, style: Map<String, Value>) -> Self {
        self.node_style = style;
        self
    }

    /// Extra properties merged into the layout block on serialization.
    pub fn with_layout_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.layout_overrides = overrides;
        self
    }

    pub(crate) fn with_highlighter(mut self, highlighter: Option<NeighborHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn edge_trace(&self) -> &Scatter {
        &self.data[EDGE_TRACE]
    }

    pub fn node_trace(&self) -> &Scatter {
        &self.data[NODE_TRACE]
    }

    pub fn midpoint_trace(&self) -> &Scatter {
        &self.data[MIDPOINT_TRACE]
    }

    /// Whether hover events change the node colors.
    pub fn is_interactive(&self) -> bool {
        self.highlighter.is_some()
    }

    pub fn hover_state(&self) -> HoverState {
        self.highlighter
            .as_ref()
            .map_or(HoverState::Neutral, NeighborHighlighter::state)
    }

    pub fn highlighter(&self) -> Option<&NeighborHighlighter> {
        self.highlighter.as_ref()
    }

    /// Applies a hover event to the node trace. Does nothing when neighbor
    /// highlighting is switched off.
    pub fn handle(&mut self, event: HoverEvent) -> Result<()> {
        let Some(highlighter) = self.highlighter.as_mut() else {
            return Ok(());
        };
        let Some(marker) = self.data[NODE_TRACE].marker.as_mut() else {
            return Ok(());
        };
        match event {
            HoverEvent::Hover(points) => highlighter.focus(marker, &points),
            HoverEvent::Unhover => {
                highlighter.reset(marker);
                Ok(())
            }
        }
    }

    /// The figure as plotly JSON, overrides applied.
    pub fn to_value(&self) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if !self.node_style.is_empty() {
            if let Some(Value::Object(trace)) = value
                .get_mut("data")
                .and_then(|data| data.get_mut(NODE_TRACE))
            {
                merge_object(trace, &self.node_style);
            }
        }
        if !self.layout_overrides.is_empty() {
            if let Some(Value::Object(layout)) = value.get_mut("layout") {
                merge_object(layout, &self.layout_overrides);
            }
        }
        Ok(value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// A standalone HTML page rendering the figure into a `div` with id `div_id`.
    ///
    /// When neighbor highlighting is on, the page carries the neighbor table and
    /// restyles the node trace on `plotly_hover` / `plotly_unhover`.
    pub fn to_html(&self, div_id: &str) -> Result<String> {
        let figure = script_json(&self.to_json()?);
        let div = script_json(&serde_json::to_string(div_id)?);
        let div_attribute = html_attribute(div_id);
        let mut script = format!(
            "var figure = {figure};\nvar div = document.getElementById({div});\nPlotly.newPlot(div, figure.data, figure.layout);\n"
        );
        if let Some(highlighter) = &self.highlighter {
            let neighbors = script_json(&serde_json::to_string(highlighter.neighbor_table())?);
            script.push_str(&format!(
                r#"var neighbors = {neighbors};
var original = (figure.data[{NODE_TRACE}].marker.color || []).slice();
div.on('plotly_hover', function (event) {{
  var point = event.points.find(function (p) {{ return p.curveNumber === {NODE_TRACE}; }});
  if (!point) {{ return; }}
  var colors = original.map(function () {{ return '{dimmed}'; }});
  colors[point.pointNumber] = original[point.pointNumber];
  neighbors[point.pointNumber].forEach(function (n) {{ colors[n] = original[n]; }});
  Plotly.restyle(div, {{'marker.color': [colors]}}, [{NODE_TRACE}]);
}});
div.on('plotly_unhover', function () {{
  Plotly.restyle(div, {{'marker.color': [original]}}, [{NODE_TRACE}]);
}});
"#,
                dimmed = crate::hover::DIMMED_COLOR,
            ));
        }
        debug!("rendered figure into html div {div_id}");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="{div_attribute}" style="width:100%;height:100vh;"></div>
<script>
{script}</script>
</body>
</html>
"#
        ))
    }
}

/// JSON that can sit inside a `<script>` element: characters that could close the
/// element or end a JavaScript line are written as `\u` escapes.
fn script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn html_attribute(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Recursively merges `patch` into `target`. Nested objects merge key by key; any
/// other value replaces what was there.
fn merge_object(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(inner)) = (target.get_mut(key), value) {
            merge_object(existing, inner);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn figure() -> Figure {
        let mut nodes = Scatter::new(Mode::Markers);
        nodes.push_point(0.0, 0.0);
        nodes.marker = Some(Marker {
            size: vec![13.0],
            color: vec![Color::Value(1.0)],
            ..Marker::default()
        });
        Figure::new(
            [Scatter::new(Mode::Lines), nodes, Scatter::new(Mode::Markers)],
            FigureLayout::new(Title::new("Graph", 16)),
        )
    }

    #[test]
    fn merge_keeps_untouched_keys() {
        let mut target = json!({"a": {"b": 1, "c": 2}, "d": 3});
        let patch = json!({"a": {"b": 10}, "e": [1]});
        if let (Value::Object(target), Value::Object(patch)) = (&mut target, &patch) {
            merge_object(target, patch);
        }
        assert_eq!(target, json!({"a": {"b": 10, "c": 2}, "d": 3, "e": [1]}));
    }

    #[test]
    fn overrides_land_in_node_trace_and_layout() {
        let node_style = json!({"marker": {"symbol": "square"}});
        let layout = json!({"width": 800, "title": {"text": "Other"}});
        let figure = figure()
            .with_node_style(node_style.as_object().cloned().unwrap())
            .with_layout_overrides(layout.as_object().cloned().unwrap());
        let value = figure.to_value().unwrap();

        assert_eq!(value["data"][1]["marker"]["symbol"], "square");
        assert_eq!(value["data"][1]["marker"]["size"], json!([13.0]));
        assert_eq!(value["layout"]["width"], 800);
        assert_eq!(value["layout"]["title"]["text"], "Other");
        assert_eq!(value["layout"]["title"]["font"]["size"], 16);
        assert!(value["data"][0].get("marker").is_none());
    }

    #[test]
    fn html_embeds_the_figure() {
        let html = figure().to_html("graph").unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#"<div id="graph""#));
        assert!(html.contains("Plotly.newPlot"));
        assert!(!html.contains("plotly_hover"));
    }

    #[test]
    fn html_escapes_user_text() {
        let mut figure = figure();
        figure.data[NODE_TRACE].hovertext = vec!["</script><script>alert(1)</script>".into()];
        let html = figure.to_html("a\"b<c").unwrap();

        assert!(!html.contains("<script>alert(1)"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains(r"\u003c/script\u003e\u003cscript\u003ealert(1)"));
        assert!(html.contains(r#"<div id="a&quot;b&lt;c""#));
    }

    #[test]
    fn script_json_stays_valid_json() {
        let raw = serde_json::to_string("a<b>&c\u{2028}").unwrap();
        let escaped = script_json(&raw);
        assert!(!escaped.contains(['<', '>', '&', '\u{2028}']));
        let back: String = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back, "a<b>&c\u{2028}");
    }

    #[test]
    fn events_are_ignored_without_highlighter() {
        let mut figure = figure();
        assert!(!figure.is_interactive());
        figure.handle(HoverEvent::Unhover).unwrap();
        assert_eq!(figure.hover_state(), HoverState::Neutral);
    }
}
