//! Neighbor highlighting on hover.
//!
//! Hovering a node dims every node except the hovered one and its direct neighbors;
//! leaving it restores the colors and sizes the figure was built with.

use crate::error::{PlotError, Result};
use crate::figure::{Color, Marker};
use crate::graph::Graph;
use glam::DVec2;
use log::debug;
use std::collections::HashMap;

/// Color given to nodes outside the hovered neighborhood.
pub const DIMMED_COLOR: &str = "#E4E4E4";

/// Points reported by a plotly hover event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverPoints {
    pub point_inds: Vec<usize>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl HoverPoints {
    /// A hover over the single node drawn at `position`.
    pub fn single(index: usize, position: DVec2) -> Self {
        Self {
            point_inds: vec![index],
            xs: vec![position.x],
            ys: vec![position.y],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Hover(HoverPoints),
    Unhover,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Neutral,
    /// `node` and its neighbors keep their colors, the rest is dimmed.
    Focused { node: usize },
}

/// Recolors the node trace in response to hover events.
#[derive(Debug, Clone)]
pub struct NeighborHighlighter {
    original_colors: Vec<Color>,
    original_sizes: Vec<f64>,
    /// Drawn position to node trace index.
    points: HashMap<(u64, u64), usize>,
    neighbors: Vec<Vec<usize>>,
    state: HoverState,
}

impl NeighborHighlighter {
    /// Snapshots the node marker as built and indexes nodes by drawn position.
    pub fn new(graph: &Graph, positions: &[DVec2], marker: &Marker) -> Self {
        let points = positions
            .iter()
            .enumerate()
            .map(|(i, p)| (point_key(p.x, p.y), i))
            .collect();
        let neighbors = graph
            .nodes()
            .map(|(index, _)| {
                graph
                    .neighbors(index)
                    .into_iter()
                    .map(|n| n.index())
                    .collect()
            })
            .collect();
        Self {
            original_colors: marker.color.clone(),
            original_sizes: marker.size.clone(),
            points,
            neighbors,
            state: HoverState::Neutral,
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Neighbors of node trace point `node`.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.neighbors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn neighbor_table(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    /// Dims everything but the hovered node and its neighbors. An event without
    /// points changes nothing.
    pub fn focus(&mut self, marker: &mut Marker, points: &HoverPoints) -> Result<()> {
        if points.point_inds.is_empty() {
            return Ok(());
        }
        let (x, y) = match (points.xs.first(), points.ys.first()) {
            (Some(&x), Some(&y)) => (x, y),
            _ => {
                return Err(PlotError::UnknownHoverPoint {
                    x: f64::NAN,
                    y: f64::NAN,
                })
            }
        };
        let node = *self
            .points
            .get(&point_key(x, y))
            .ok_or(PlotError::UnknownHoverPoint { x, y })?;

        let mut colors = vec![Color::Css(DIMMED_COLOR.to_string()); self.original_colors.len()];
        for &keep in std::iter::once(&node).chain(self.neighbors(node)) {
            if let (Some(slot), Some(original)) = (colors.get_mut(keep), self.original_colors.get(keep)) {
                *slot = original.clone();
            }
        }
        marker.color = colors;
        self.state = HoverState::Focused { node };
        debug!("focused node {node}");
        Ok(())
    }

    /// Restores the colors and sizes captured at construction.
    pub fn reset(&mut self, marker: &mut Marker) {
        marker.color = self.original_colors.clone();
        marker.size = self.original_sizes.clone();
        self.state = HoverState::Neutral;
    }
}

/// Bit pattern key of a drawn position. `-0.0` and `0.0` map to the same key.
fn point_key(x: f64, y: f64) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    fn setup() -> (NeighborHighlighter, Marker, Vec<DVec2>) {
        let mut graph = Graph::from_edges(GraphKind::Graph, [("A", "B"), ("B", "C")]);
        graph.add_node("D");
        let positions = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(-0.0, 1.0),
        ];
        let marker = Marker {
            size: vec![13.0, 14.0, 13.0, 12.0],
            color: (1..=4).map(|d| Color::Value(d as f64)).collect(),
            ..Marker::default()
        };
        (NeighborHighlighter::new(&graph, &positions, &marker), marker, positions)
    }

    #[test]
    fn hover_dims_everything_outside_the_neighborhood() {
        let (mut highlighter, mut marker, positions) = setup();
        highlighter
            .focus(&mut marker, &HoverPoints::single(1, positions[1]))
            .unwrap();

        assert_eq!(marker.color[0], Color::Value(1.0));
        assert_eq!(marker.color[1], Color::Value(2.0));
        assert_eq!(marker.color[2], Color::Value(3.0));
        assert_eq!(marker.color[3], Color::from(DIMMED_COLOR));
        assert_eq!(highlighter.state(), HoverState::Focused { node: 1 });
    }

    #[test]
    fn unhover_restores_colors_and_sizes() {
        let (mut highlighter, mut marker, positions) = setup();
        let original = marker.clone();
        highlighter
            .focus(&mut marker, &HoverPoints::single(0, positions[0]))
            .unwrap();
        marker.size[0] = 40.0;
        highlighter.reset(&mut marker);
        assert_eq!(marker, original);
        assert_eq!(highlighter.state(), HoverState::Neutral);
    }

    #[test]
    fn refocus_uses_original_colors() {
        let (mut highlighter, mut marker, positions) = setup();
        highlighter
            .focus(&mut marker, &HoverPoints::single(0, positions[0]))
            .unwrap();
        highlighter
            .focus(&mut marker, &HoverPoints::single(2, positions[2]))
            .unwrap();
        assert_eq!(marker.color[1], Color::Value(2.0));
        assert_eq!(marker.color[2], Color::Value(3.0));
        assert_eq!(marker.color[0], Color::from(DIMMED_COLOR));
    }

    #[test]
    fn empty_event_is_a_no_op() {
        let (mut highlighter, mut marker, _) = setup();
        let before = marker.clone();
        highlighter.focus(&mut marker, &HoverPoints::default()).unwrap();
        assert_eq!(marker, before);
        assert_eq!(highlighter.state(), HoverState::Neutral);
    }

    #[test]
    fn negative_zero_matches_positive_zero() {
        let (mut highlighter, mut marker, _) = setup();
        highlighter
            .focus(&mut marker, &HoverPoints::single(3, DVec2::new(0.0, 1.0)))
            .unwrap();
        assert_eq!(highlighter.state(), HoverState::Focused { node: 3 });
    }

    #[test]
    fn unknown_point_is_an_error() {
        let (mut highlighter, mut marker, _) = setup();
        let result = highlighter.focus(&mut marker, &HoverPoints::single(0, DVec2::new(5.0, 5.0)));
        assert!(matches!(result, Err(PlotError::UnknownHoverPoint { .. })));
    }
}
