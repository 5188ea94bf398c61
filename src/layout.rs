//! Node positioning.
//!
//! Every layout works on the undirected simple view of the graph and returns one
//! position per node, in node order. Apart from [`LayoutKind::Random`], results are
//! rescaled so that they are centered on the origin and fit in `[-1, 1]²`.

mod circular;
mod kamada;
mod planar;
mod random;
mod spectral;
mod spring;

pub use circular::{circular_layout, spiral_layout};
pub use kamada::KamadaKawai;
pub use planar::planar_layout;
pub use random::random_layout;
pub use spectral::spectral_layout;
pub use spring::SpringLayout;

use crate::graph::Graph;
use glam::DVec2;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(
        "unknown layout `{0}`, expected one of random, circular, kamada, planar, spring, spectral, spiral"
    )]
    UnknownLayout(String),
    #[error("graph is not planar")]
    NotPlanar,
}

/// Named layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Uniform positions in `[0, 1)²`.
    Random,
    /// Evenly spaced on a circle.
    Circular,
    /// Kamada–Kawai path-length energy minimization.
    Kamada,
    /// Straight-line drawing without crossings; fails on non-planar graphs.
    Planar,
    /// Fruchterman–Reingold force simulation.
    Spring,
    /// Eigenvectors of the graph Laplacian.
    Spectral,
    /// Archimedean spiral.
    Spiral,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 7] = [
        LayoutKind::Random,
        LayoutKind::Circular,
        LayoutKind::Kamada,
        LayoutKind::Planar,
        LayoutKind::Spring,
        LayoutKind::Spectral,
        LayoutKind::Spiral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Random => "random",
            LayoutKind::Circular => "circular",
            LayoutKind::Kamada => "kamada",
            LayoutKind::Planar => "planar",
            LayoutKind::Spring => "spring",
            LayoutKind::Spectral => "spectral",
            LayoutKind::Spiral => "spiral",
        }
    }

    /// Whether two runs on the same graph give the same positions regardless of seed.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, LayoutKind::Random | LayoutKind::Spring)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::UnknownLayout(s.to_string()))
    }
}

/// Runs `kind` on `graph` and returns positions in node order. The graph is untouched.
pub fn compute_layout(
    graph: &Graph,
    kind: LayoutKind,
    seed: Option<u64>,
) -> Result<Vec<DVec2>, LayoutError> {
    let adjacency = graph.simple_adjacency();
    debug!(
        "computing {kind} layout for {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    let positions = match kind {
        LayoutKind::Random => random_layout(adjacency.len(), &mut rng(seed)),
        LayoutKind::Circular => circular_layout(adjacency.len()),
        LayoutKind::Spiral => spiral_layout(adjacency.len()),
        LayoutKind::Kamada => KamadaKawai::default().layout(&adjacency),
        LayoutKind::Spectral => spectral_layout(&adjacency),
        LayoutKind::Planar => planar_layout(&adjacency)?,
        LayoutKind::Spring => SpringLayout::default().seed(seed).layout(&adjacency),
    };
    Ok(positions)
}

/// Decides where every node goes and writes the result back onto the graph.
///
/// An explicit `kind` always recomputes. Without one, positions already present on
/// every node are reused as they are; otherwise a random layout is drawn.
pub fn resolve_positions(
    graph: &mut Graph,
    kind: Option<LayoutKind>,
    seed: Option<u64>,
) -> Result<Vec<DVec2>, LayoutError> {
    let positions = match kind {
        Some(kind) => compute_layout(graph, kind, seed)?,
        None => match graph.positions() {
            Some(existing) => {
                debug!("reusing stored positions of {} nodes", existing.len());
                return Ok(existing);
            }
            None => compute_layout(graph, LayoutKind::Random, seed)?,
        },
    };
    graph.set_positions(&positions);
    Ok(positions)
}

/// Centers `positions` on the origin and scales them so the largest coordinate
/// magnitude equals `scale`.
pub(crate) fn rescale(positions: &mut [DVec2], scale: f64) {
    if positions.is_empty() {
        return;
    }
    let mean = positions.iter().copied().sum::<DVec2>() / positions.len() as f64;
    let mut extent: f64 = 0.0;
    for p in positions.iter_mut() {
        *p -= mean;
        extent = extent.max(p.abs().max_element());
    }
    if extent > 0.0 {
        let factor = scale / extent;
        for p in positions.iter_mut() {
            *p *= factor;
        }
    }
}

pub(crate) fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Unweighted shortest path lengths from `source`, `None` where unreachable.
pub(crate) fn bfs_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; adjacency.len()];
    let mut queue = std::collections::VecDeque::new();
    distances[source] = Some(0);
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        let next = distances[v].map_or(0, |d| d + 1);
        for &w in &adjacency[v] {
            if distances[w].is_none() {
                distances[w] = Some(next);
                queue.push_back(w);
            }
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    fn path(n: usize) -> Graph {
        Graph::from_edges(
            GraphKind::Graph,
            (1..n).map(|i| ((i - 1).to_string(), i.to_string())),
        )
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!("kamada".parse::<LayoutKind>().unwrap(), LayoutKind::Kamada);
        assert_eq!("Spring".parse::<LayoutKind>().unwrap(), LayoutKind::Spring);
        assert!(matches!(
            "force".parse::<LayoutKind>(),
            Err(LayoutError::UnknownLayout(name)) if name == "force"
        ));
    }

    #[test]
    fn rescale_centers_and_fits() {
        let mut positions = vec![DVec2::new(2.0, 2.0), DVec2::new(4.0, 3.0), DVec2::new(6.0, 4.0)];
        rescale(&mut positions, 1.0);
        assert_eq!(positions[1], DVec2::ZERO);
        assert_eq!(positions[0], DVec2::new(-1.0, -0.5));
        assert_eq!(positions[2], DVec2::new(1.0, 0.5));
    }

    #[test]
    fn every_layout_places_every_node() {
        let graph = path(6);
        for kind in LayoutKind::ALL {
            let positions = compute_layout(&graph, kind, Some(7)).unwrap();
            assert_eq!(positions.len(), 6, "{kind}");
            assert!(positions.iter().all(|p| p.is_finite()), "{kind}");
        }
    }

    #[test]
    fn layouts_handle_empty_and_single_node_graphs() {
        let empty = Graph::undirected();
        let mut single = Graph::undirected();
        single.add_node("only");
        for kind in LayoutKind::ALL {
            assert!(compute_layout(&empty, kind, Some(1)).unwrap().is_empty());
            let positions = compute_layout(&single, kind, Some(1)).unwrap();
            assert_eq!(positions.len(), 1);
            if kind != LayoutKind::Random {
                assert_eq!(positions[0], DVec2::ZERO, "{kind}");
            }
        }
    }

    #[test]
    fn deterministic_layouts_repeat() {
        let graph = path(5);
        for kind in LayoutKind::ALL.into_iter().filter(|k| k.is_deterministic()) {
            assert_eq!(
                compute_layout(&graph, kind, None).unwrap(),
                compute_layout(&graph, kind, None).unwrap(),
                "{kind}"
            );
        }
    }

    #[test]
    fn seeded_layouts_repeat() {
        let graph = path(5);
        for kind in [LayoutKind::Random, LayoutKind::Spring] {
            assert_eq!(
                compute_layout(&graph, kind, Some(42)).unwrap(),
                compute_layout(&graph, kind, Some(42)).unwrap()
            );
        }
    }

    #[test]
    fn explicit_layout_writes_positions_back() {
        let mut graph = path(4);
        let positions = resolve_positions(&mut graph, Some(LayoutKind::Circular), None).unwrap();
        assert_eq!(graph.positions(), Some(positions));
    }

    #[test]
    fn stored_positions_are_reused() {
        let mut graph = path(3);
        resolve_positions(&mut graph, Some(LayoutKind::Spiral), None).unwrap();
        graph.node_mut("0").unwrap().pos = Some(DVec2::new(9.0, 9.0));
        let positions = resolve_positions(&mut graph, None, None).unwrap();
        assert_eq!(positions[0], DVec2::new(9.0, 9.0));
    }

    #[test]
    fn missing_positions_fall_back_to_random() {
        let mut graph = path(3);
        let positions = resolve_positions(&mut graph, None, Some(3)).unwrap();
        assert!(positions
            .iter()
            .all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)));
        assert!(graph.positions().is_some());
    }

    #[test]
    fn bfs_marks_unreachable_nodes() {
        let adjacency = vec![vec![1], vec![0], vec![]];
        assert_eq!(bfs_distances(&adjacency, 0), vec![Some(0), Some(1), None]);
    }
}
