use super::encoding::{ColorMethod, SizeMethod};
use super::options::PlotOptions;
use crate::error::{PlotError, Result};
use crate::figure::{Color, ColorBar, Line, Marker, Mode, Scatter};
use crate::graph::{AttrValue, Graph, NodeData};
use glam::DVec2;

/// One marker per node, in node order.
pub(crate) fn node_trace(
    graph: &Graph,
    positions: &[DVec2],
    options: &PlotOptions,
) -> Result<Scatter> {
    let n = graph.node_count();
    let mut trace = Scatter::new(if options.node_label.is_some() {
        Mode::MarkersText
    } else {
        Mode::Markers
    });
    let mut sizes = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);

    for (index, node) in graph.nodes() {
        let position = positions[index.index()];
        let degree = graph.degree(index);
        trace.push_point(position.x, position.y);

        let mut hover = format!("Node: {}<br>Degree: {}", node.id, degree);
        for name in &options.node_text {
            hover.push_str(&format!("<br>{name}: {}", node_attr(node, name)?));
        }
        trace.hovertext.push(hover);

        if let Some(label) = &options.node_label {
            trace.text.push(node_attr(node, label)?.to_string());
        }

        match &options.size_method {
            SizeMethod::Degree => sizes.push(degree as f64 + SizeMethod::DEGREE_OFFSET),
            SizeMethod::Static => sizes.push(SizeMethod::STATIC_SIZE),
            SizeMethod::Attribute(name) => sizes.push(numeric_attr(node, name)?),
            SizeMethod::Values(_) => {}
        }
        match &options.color_method {
            ColorMethod::Degree => colors.push(Color::Value(degree as f64)),
            ColorMethod::Attribute(name) => colors.push(attr_color(node_attr(node, name)?)),
            ColorMethod::Fixed(color) => colors.push(Color::Css(color.clone())),
            ColorMethod::Values(_) => {}
        }
    }

    if let SizeMethod::Values(values) = &options.size_method {
        check_length("size list", n, values.len())?;
        sizes = values.clone();
    }
    if let ColorMethod::Values(values) = &options.color_method {
        check_length("color list", n, values.len())?;
        colors = values.clone();
    }

    let showscale = !colors.is_empty() && colors.iter().all(Color::is_numeric);
    trace.textposition = Some(options.node_label_position);
    trace.marker = Some(Marker {
        size: sizes,
        color: colors,
        colorscale: Some(options.colorscale),
        reversescale: Some(true),
        showscale: Some(showscale),
        colorbar: Some(ColorBar::new(options.colorbar_title.clone())),
        line: Some(Line::width(0.0)),
        opacity: Some(options.node_opacity),
    });
    Ok(trace)
}

fn node_attr<'a>(node: &'a NodeData, name: &str) -> Result<&'a AttrValue> {
    node.attr(name).ok_or_else(|| PlotError::MissingNodeAttribute {
        node: node.id.clone(),
        attribute: name.to_string(),
    })
}

fn numeric_attr(node: &NodeData, name: &str) -> Result<f64> {
    node_attr(node, name)?
        .as_f64()
        .ok_or_else(|| PlotError::NonNumericAttribute {
            node: node.id.clone(),
            attribute: name.to_string(),
        })
}

fn attr_color(value: &AttrValue) -> Color {
    match value.as_f64() {
        Some(number) => Color::Value(number),
        None => Color::Css(value.to_string()),
    }
}

fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PlotError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    fn path() -> (Graph, Vec<DVec2>) {
        let mut graph = Graph::from_edges(GraphKind::Graph, [("A", "B"), ("B", "C")]);
        graph.add_node("D");
        let positions = (0..4).map(|i| DVec2::new(i as f64, 0.0)).collect();
        (graph, positions)
    }

    fn marker(trace: &Scatter) -> &Marker {
        trace.marker.as_ref().unwrap()
    }

    #[test]
    fn degree_sizes_and_colors() {
        let (graph, positions) = path();
        let trace = node_trace(&graph, &positions, &PlotOptions::new()).unwrap();

        assert_eq!(marker(&trace).size, vec![13.0, 14.0, 13.0, 12.0]);
        assert_eq!(
            marker(&trace).color,
            vec![Color::Value(1.0), Color::Value(2.0), Color::Value(1.0), Color::Value(0.0)]
        );
        assert_eq!(marker(&trace).showscale, Some(true));
        assert_eq!(trace.hovertext[1], "Node: B<br>Degree: 2");
        assert_eq!(trace.mode, Mode::Markers);
        assert!(trace.text.is_empty());
    }

    #[test]
    fn static_size() {
        let (graph, positions) = path();
        let options = PlotOptions::new().size_method("static");
        let trace = node_trace(&graph, &positions, &options).unwrap();
        assert!(marker(&trace).size.iter().all(|&s| s == 28.0));
    }

    #[test]
    fn fixed_color_hides_the_scale() {
        let (graph, positions) = path();
        let options = PlotOptions::new().color_method("#ff0000");
        let trace = node_trace(&graph, &positions, &options).unwrap();
        assert!(marker(&trace).color.iter().all(|c| *c == Color::from("#ff0000")));
        assert_eq!(marker(&trace).showscale, Some(false));
    }

    #[test]
    fn labels_and_hover_attributes() {
        let (mut graph, positions) = path();
        for (id, name) in [("A", "a"), ("B", "b"), ("C", "c"), ("D", "d")] {
            graph.set_node_attr(id, "name", name).unwrap();
            graph.set_node_attr(id, "weight", 1.5).unwrap();
        }
        let options = PlotOptions::new().node_label("name").node_text(["weight"]);
        let trace = node_trace(&graph, &positions, &options).unwrap();

        assert_eq!(trace.mode, Mode::MarkersText);
        assert_eq!(trace.text, vec!["a", "b", "c", "d"]);
        assert_eq!(trace.hovertext[0], "Node: A<br>Degree: 1<br>weight: 1.5");
    }

    #[test]
    fn missing_attribute_aborts() {
        let (graph, positions) = path();
        let options = PlotOptions::new().color_method("group");
        let error = node_trace(&graph, &positions, &options).unwrap_err();
        assert!(matches!(
            error,
            PlotError::MissingNodeAttribute { node, attribute } if node == "A" && attribute == "group"
        ));
    }

    #[test]
    fn non_numeric_size_attribute_aborts() {
        let (mut graph, positions) = path();
        for id in ["A", "B", "C", "D"] {
            graph.set_node_attr(id, "kind", "city").unwrap();
        }
        let options = PlotOptions::new().size_method("kind");
        assert!(matches!(
            node_trace(&graph, &positions, &options),
            Err(PlotError::NonNumericAttribute { .. })
        ));
    }

    #[test]
    fn explicit_lists_must_cover_every_node() {
        let (graph, positions) = path();
        let options = PlotOptions::new().size_method(vec![1.0, 2.0]);
        assert!(matches!(
            node_trace(&graph, &positions, &options),
            Err(PlotError::LengthMismatch { expected: 4, actual: 2, .. })
        ));

        let options = PlotOptions::new().size_method(vec![1.0, 2.0, 3.0, 4.0]);
        let trace = node_trace(&graph, &positions, &options).unwrap();
        assert_eq!(marker(&trace).size, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
