//! Graph to figure pipeline.

mod edges;
mod encoding;
mod nodes;
mod options;

pub use encoding::{is_color_literal, ColorMethod, SizeMethod};
pub use options::PlotOptions;

use crate::error::Result;
use crate::figure::{Annotation, Figure, FigureLayout, Scatter, Title, NODE_TRACE};
use crate::graph::Graph;
use crate::hover::NeighborHighlighter;
use crate::layout::{resolve_positions, LayoutKind};
use edges::EdgeTraces;
use glam::DVec2;
use log::info;

/// Where along a directed edge its arrow head sits, as the weight of the target.
pub const ARROW_HEAD_POSITION: f64 = 0.85;

/// Lays out `graph` and builds its figure.
///
/// Positions are written back onto the graph's nodes. Any failure aborts the whole
/// call.
///
/// # Example
///
/// ```
/// use graphplot::prelude::*;
///
/// let mut graph = Graph::undirected();
/// graph.add_edge("A", "B");
/// graph.add_edge("B", "C");
///
/// let options = PlotOptions::new().layout(LayoutKind::Circular);
/// let figure = plot(&mut graph, &options).unwrap();
/// assert_eq!(figure.edge_trace().len(), 6);
/// ```
pub fn plot(graph: &mut Graph, options: &PlotOptions) -> Result<Figure> {
    info!(
        "plotting {} nodes and {} edges with {} layout",
        graph.node_count(),
        graph.edge_count(),
        options.layout.map_or("stored", LayoutKind::name)
    );
    let plot = GraphPlot::new(graph, options)?;
    let nodes = plot.node_trace()?;
    let edges = plot.edge_traces()?;
    Ok(plot.figure(nodes, edges))
}

/// A graph whose positions are settled, ready to be turned into traces.
pub(crate) struct GraphPlot<'a> {
    graph: &'a Graph,
    positions: Vec<DVec2>,
    options: &'a PlotOptions,
}

impl<'a> GraphPlot<'a> {
    fn new(graph: &'a mut Graph, options: &'a PlotOptions) -> Result<Self> {
        let positions = resolve_positions(graph, options.layout, options.seed)?;
        Ok(Self {
            graph: &*graph,
            positions,
            options,
        })
    }

    fn node_trace(&self) -> Result<Scatter> {
        nodes::node_trace(self.graph, &self.positions, self.options)
    }

    fn edge_traces(&self) -> Result<EdgeTraces> {
        edges::edge_traces(self.graph, &self.positions, self.options)
    }

    /// Arrow annotations, one per edge, for directed graphs.
    fn arrows(&self) -> Vec<Annotation> {
        if !self.graph.is_directed() {
            return Vec::new();
        }
        self.graph
            .edges()
            .map(|(source, target, _)| {
                let tail = self.positions[source.index()];
                let head = self.positions[target.index()] * ARROW_HEAD_POSITION
                    + tail * (1.0 - ARROW_HEAD_POSITION);
                Annotation::arrow(tail, head, self.options.arrow_head, self.options.arrow_size)
            })
            .collect()
    }

    fn figure(&self, nodes: Scatter, edges: EdgeTraces) -> Figure {
        let options = self.options;
        let mut layout = FigureLayout::new(Title::new(&options.title, options.title_font_size))
            .transparent(options.transparent_background);
        layout.showlegend = options.show_legend;
        layout.annotations.push(Annotation::caption(
            options.annotation_text.clone().unwrap_or_default(),
        ));
        layout.annotations.extend(self.arrows());

        let figure = Figure::new([edges.lines, nodes, edges.midpoints], layout)
            .with_node_style(options.node_style.clone())
            .with_layout_overrides(options.figure_layout.clone());
        let highlighter = options
            .highlight_neighbors_on_hover
            .then(|| figure.data[NODE_TRACE].marker.as_ref())
            .flatten()
            .map(|marker| NeighborHighlighter::new(self.graph, &self.positions, marker));
        figure.with_highlighter(highlighter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::TRANSPARENT;
    use crate::graph::GraphKind;

    #[test]
    fn directed_edge_gets_one_arrow() {
        let mut graph = Graph::from_edges(GraphKind::DiGraph, [("A", "B")]);
        graph.node_mut("A").unwrap().pos = Some(DVec2::new(0.0, 0.0));
        graph.node_mut("B").unwrap().pos = Some(DVec2::new(1.0, 2.0));
        let figure = plot(&mut graph, &PlotOptions::new()).unwrap();

        let arrows: Vec<&Annotation> = figure.layout.arrows().collect();
        assert_eq!(arrows.len(), 1);
        let head = arrows[0].head();
        assert!((head.x - 0.85).abs() < 1e-12);
        assert!((head.y - 1.7).abs() < 1e-12);
        assert_eq!(arrows[0].tail(), Some(DVec2::ZERO));
        assert_eq!(arrows[0].arrowhead, Some(1));
        assert_eq!(arrows[0].arrowsize, Some(2.0));
    }

    #[test]
    fn undirected_graph_has_only_the_caption() {
        let mut graph = Graph::from_edges(GraphKind::Graph, [("A", "B")]);
        let options = PlotOptions::new()
            .layout(LayoutKind::Circular)
            .annotation_text("source: survey");
        let figure = plot(&mut graph, &options).unwrap();

        assert_eq!(figure.layout.annotations.len(), 1);
        assert_eq!(
            figure.layout.annotations[0].text.as_deref(),
            Some("source: survey")
        );
        assert_eq!(figure.layout.plot_bgcolor.as_deref(), Some(TRANSPARENT));
    }

    #[test]
    fn highlighting_can_be_switched_off() {
        let mut graph = Graph::from_edges(GraphKind::Graph, [("A", "B")]);
        let options = PlotOptions::new()
            .layout(LayoutKind::Circular)
            .highlight_neighbors_on_hover(false)
            .transparent_background(false);
        let figure = plot(&mut graph, &options).unwrap();
        assert!(!figure.is_interactive());
        assert!(figure.layout.paper_bgcolor.is_none());
    }

    #[test]
    fn planar_failure_aborts_the_plot() {
        let mut graph = Graph::undirected();
        for u in 0..5 {
            for v in u + 1..5 {
                graph.add_edge(u.to_string(), v.to_string());
            }
        }
        let error = plot(&mut graph, &PlotOptions::new().layout(LayoutKind::Planar)).unwrap_err();
        assert!(matches!(
            error,
            crate::PlotError::Layout(crate::layout::LayoutError::NotPlanar)
        ));
        assert!(graph.positions().is_none());
    }
}
