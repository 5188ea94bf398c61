use super::options::PlotOptions;
use crate::error::{PlotError, Result};
use crate::figure::{Line, Marker, Mode, Scatter};
use crate::graph::{AttrValue, EdgeData, Graph};
use glam::DVec2;
use indexmap::IndexMap;
use log::debug;
use petgraph::graph::NodeIndex;

pub(crate) struct EdgeTraces {
    pub lines: Scatter,
    pub midpoints: Scatter,
}

/// Everything shown at the middle of one node pair.
struct Midpoint {
    position: DVec2,
    values: IndexMap<String, Vec<AttrValue>>,
    label: Option<String>,
}

/// Edge lines plus one invisible midpoint marker per distinct node pair.
pub(crate) fn edge_traces(
    graph: &Graph,
    positions: &[DVec2],
    options: &PlotOptions,
) -> Result<EdgeTraces> {
    let labelled = options.edge_label.is_some();
    let mut lines = Scatter::new(if labelled { Mode::LinesText } else { Mode::Lines });
    lines.line = Some(Line::new(1.0, "#888"));

    let wants_midpoints = labelled || !options.edge_text.is_empty();
    let mut pairs: IndexMap<(usize, usize), Midpoint> = IndexMap::new();

    for (source, target, edge) in graph.edges() {
        let (a, b) = (positions[source.index()], positions[target.index()]);
        lines.push_point(a.x, a.y);
        lines.push_point(b.x, b.y);
        lines.push_gap();

        if !wants_midpoints {
            continue;
        }
        let midpoint = pairs
            .entry(pair_key(source, target, graph.is_directed()))
            .or_insert_with(|| Midpoint {
                position: (a + b) / 2.0,
                values: IndexMap::new(),
                label: None,
            });
        for name in &options.edge_text {
            let value = edge_attr(graph, source, target, edge, name)?;
            midpoint
                .values
                .entry(name.clone())
                .or_default()
                .push(value.clone());
        }
        if let Some(label) = &options.edge_label {
            midpoint.label = Some(edge_attr(graph, source, target, edge, label)?.to_string());
        }
    }
    debug!(
        "{} edges collapse onto {} midpoints",
        graph.edge_count(),
        pairs.len()
    );

    let mut midpoints = Scatter::new(if labelled {
        Mode::MarkersText
    } else {
        Mode::Markers
    });
    midpoints.textposition = Some(options.edge_label_position);
    midpoints.marker = Some(Marker {
        opacity: Some(0.0),
        ..Marker::default()
    });
    for midpoint in pairs.into_values() {
        midpoints.push_point(midpoint.position.x, midpoint.position.y);
        if !options.edge_text.is_empty() {
            midpoints.hovertext.push(hover_text(&midpoint.values));
        }
        if labelled {
            midpoints.text.push(midpoint.label.unwrap_or_default());
        }
    }

    Ok(EdgeTraces { lines, midpoints })
}

/// Parallel edges share a key: ordered for directed graphs, unordered otherwise.
fn pair_key(source: NodeIndex, target: NodeIndex, directed: bool) -> (usize, usize) {
    let (s, t) = (source.index(), target.index());
    if directed {
        (s, t)
    } else {
        (s.min(t), s.max(t))
    }
}

/// `name: [v1, v2]` per attribute, one line each.
fn hover_text(values: &IndexMap<String, Vec<AttrValue>>) -> String {
    values
        .iter()
        .map(|(name, values)| {
            let joined = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{name}: [{joined}]")
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn edge_attr<'a>(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    edge: &'a EdgeData,
    name: &str,
) -> Result<&'a AttrValue> {
    edge.attr(name).ok_or_else(|| PlotError::MissingEdgeAttribute {
        from: graph.node_data(source).id.clone(),
        to: graph.node_data(target).id.clone(),
        attribute: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    fn positions(graph: &Graph) -> Vec<DVec2> {
        (0..graph.node_count())
            .map(|i| DVec2::new(i as f64, (i * i) as f64))
            .collect()
    }

    #[test]
    fn three_coordinates_per_edge() {
        let graph = Graph::from_edges(GraphKind::MultiGraph, [("a", "b"), ("b", "c"), ("a", "b")]);
        let traces = edge_traces(&graph, &positions(&graph), &PlotOptions::new()).unwrap();
        assert_eq!(traces.lines.len(), 9);
        assert_eq!(traces.lines.x[2], None);
        assert_eq!(traces.lines.line, Some(Line::new(1.0, "#888")));
        assert!(traces.midpoints.is_empty());
    }

    #[test]
    fn parallel_edges_share_a_midpoint() {
        let mut graph = Graph::multi();
        graph.add_edge_with("a", "b", [("road", "A1")]);
        graph.add_edge_with("b", "a", [("road", "A2")]);
        graph.add_edge_with("b", "c", [("road", "B7")]);
        let options = PlotOptions::new().edge_text(["road"]);
        let traces = edge_traces(&graph, &positions(&graph), &options).unwrap();

        assert_eq!(traces.midpoints.len(), 2);
        assert_eq!(traces.midpoints.hovertext[0], "road: [A1, A2]");
        assert_eq!(traces.midpoints.hovertext[1], "road: [B7]");
        assert_eq!(traces.midpoints.x[0], Some(0.5));
        assert_eq!(traces.midpoints.marker.as_ref().unwrap().opacity, Some(0.0));
    }

    #[test]
    fn directed_pairs_keep_orientation() {
        let mut graph = Graph::multi_directed();
        graph.add_edge_with("a", "b", [("w", 1)]);
        graph.add_edge_with("b", "a", [("w", 2)]);
        let options = PlotOptions::new().edge_text(["w"]);
        let traces = edge_traces(&graph, &positions(&graph), &options).unwrap();
        assert_eq!(traces.midpoints.len(), 2);
    }

    #[test]
    fn last_label_wins() {
        let mut graph = Graph::multi();
        graph.add_edge_with("a", "b", [("name", "first")]);
        graph.add_edge_with("a", "b", [("name", "second")]);
        let options = PlotOptions::new().edge_label("name");
        let traces = edge_traces(&graph, &positions(&graph), &options).unwrap();

        assert_eq!(traces.midpoints.text, vec!["second"]);
        assert_eq!(traces.midpoints.mode, Mode::MarkersText);
        assert_eq!(traces.lines.mode, Mode::LinesText);
        assert!(traces.midpoints.hovertext.is_empty());
    }

    #[test]
    fn label_and_hover_text_share_the_midpoint() {
        let mut graph = Graph::multi();
        graph.add_edge_with("a", "b", [("name", "north"), ("lanes", "2")]);
        graph.add_edge_with("b", "a", [("name", "south"), ("lanes", "1")]);
        let options = PlotOptions::new().edge_label("name").edge_text(["lanes"]);
        let traces = edge_traces(&graph, &positions(&graph), &options).unwrap();

        assert_eq!(traces.midpoints.len(), 1);
        assert_eq!(traces.midpoints.text, vec!["south"]);
        assert_eq!(traces.midpoints.hovertext, vec!["lanes: [2, 1]"]);
        assert_eq!(traces.midpoints.mode, Mode::MarkersText);
    }

    #[test]
    fn missing_edge_attribute_names_the_edge() {
        let graph = Graph::from_edges(GraphKind::DiGraph, [("a", "b")]);
        let options = PlotOptions::new().edge_text(["weight"]);
        let error = edge_traces(&graph, &positions(&graph), &options)
            .err()
            .unwrap();
        assert_eq!(error.to_string(), "edge `a` -> `b` has no attribute `weight`");
    }
}
