use super::{bfs_distances, circular_layout, rescale};
use glam::DVec2;
use log::debug;

/// Kamada–Kawai layout: places nodes so that drawn distances match shortest path
/// lengths, moving one node at a time with Newton–Raphson steps.
#[derive(Debug, Clone)]
pub struct KamadaKawai {
    tolerance: f64,
    max_moves: usize,
    max_newton_steps: usize,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_moves: 2000,
            max_newton_steps: 50,
        }
    }
}

/// Energy gradient and Hessian of a single node.
#[derive(Debug, Clone, Copy)]
struct Partials {
    gradient: DVec2,
    xx: f64,
    xy: f64,
    yy: f64,
}

impl KamadaKawai {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop once no node's energy gradient is larger than this.
    ///
    /// Default: `1e-3`
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Upper bound on how many times a node is picked and moved.
    ///
    /// Default: `2000`
    pub fn max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn layout(&self, adjacency: &[Vec<usize>]) -> Vec<DVec2> {
        let n = adjacency.len();
        if n <= 1 {
            return vec![DVec2::ZERO; n];
        }

        let distances = path_lengths(adjacency);
        let longest = distances.iter().flatten().copied().fold(1.0, f64::max);
        let mut positions: Vec<DVec2> = circular_layout(n)
            .into_iter()
            .map(|p| p * (longest / 2.0))
            .collect();

        let mut moves = 0;
        while moves < self.max_moves {
            let Some((m, partials)) = (0..n)
                .map(|m| (m, partials_of(&positions, &distances[m], m)))
                .max_by(|a, b| a.1.gradient.length().total_cmp(&b.1.gradient.length()))
            else {
                break;
            };
            if partials.gradient.length() < self.tolerance {
                break;
            }

            let mut current = partials;
            for _ in 0..self.max_newton_steps {
                let Some(step) = newton_step(current) else {
                    break;
                };
                positions[m] += step;
                current = partials_of(&positions, &distances[m], m);
                if current.gradient.length() < self.tolerance {
                    break;
                }
            }
            moves += 1;
        }
        debug!("kamada-kawai finished after {moves} node moves");

        rescale(&mut positions, 1.0);
        positions
    }
}

/// All-pairs path lengths. Pairs in different components get one more than the
/// longest finite path.
fn path_lengths(adjacency: &[Vec<usize>]) -> Vec<Vec<f64>> {
    let hops: Vec<Vec<Option<usize>>> = (0..adjacency.len())
        .map(|source| bfs_distances(adjacency, source))
        .collect();
    let longest = hops.iter().flatten().flatten().copied().max().unwrap_or(0);
    let disconnected = (longest + 1) as f64;
    hops.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|d| d.map_or(disconnected, |d| d as f64))
                .collect()
        })
        .collect()
}

fn partials_of(positions: &[DVec2], distances: &[f64], m: usize) -> Partials {
    let mut result = Partials {
        gradient: DVec2::ZERO,
        xx: 0.0,
        xy: 0.0,
        yy: 0.0,
    };
    for (i, (&p, &d)) in positions.iter().zip(distances).enumerate() {
        if i == m {
            continue;
        }
        let strength = 1.0 / (d * d);
        let delta = positions[m] - p;
        let length = delta.length().max(1e-9);
        let cube = length * length * length;

        result.gradient += strength * (delta - d * delta / length);
        result.xx += strength * (1.0 - d * delta.y * delta.y / cube);
        result.yy += strength * (1.0 - d * delta.x * delta.x / cube);
        result.xy += strength * (d * delta.x * delta.y / cube);
    }
    result
}

/// Solves the 2×2 Newton system for the next move of a node.
fn newton_step(p: Partials) -> Option<DVec2> {
    let det = p.xx * p.yy - p.xy * p.xy;
    if det.abs() < 1e-12 {
        return None;
    }
    let g = p.gradient;
    Some(DVec2::new(
        (-g.x * p.yy + g.y * p.xy) / det,
        (-g.y * p.xx + g.x * p.xy) / det,
    ))
}
