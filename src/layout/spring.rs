use super::{random_layout, rescale, rng};
use glam::DVec2;
use log::debug;

/// Fruchterman–Reingold force-directed layout.
///
/// Adjacent nodes attract, every pair repels, and a linearly cooling temperature caps
/// how far a node may move per iteration.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    optimal_distance: Option<f64>,
    iterations: usize,
    threshold: f64,
    seed: Option<u64>,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            optimal_distance: None,
            iterations: 50,
            threshold: 1e-4,
            seed: None,
        }
    }
}

impl SpringLayout {
    /// Get a instance of `SpringLayout` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Preferred distance between nodes.
    ///
    /// Default: `1 / sqrt(node count)`
    pub fn optimal_distance(mut self, distance: f64) -> Self {
        self.optimal_distance = Some(distance);
        self
    }

    /// Maximum number of simulation steps.
    ///
    /// Default: `50`
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Stop early once the mean node movement of a step falls below this.
    ///
    /// Default: `1e-4`
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Seed for the random starting positions. `None` draws from entropy.
    ///
    /// Default: `None`
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Lays out the undirected simple graph given as adjacency lists.
    pub fn layout(&self, adjacency: &[Vec<usize>]) -> Vec<DVec2> {
        match adjacency.len() {
            0 => return Vec::new(),
            1 => return vec![DVec2::ZERO],
            _ => {}
        }
        let initial = random_layout(adjacency.len(), &mut rng(self.seed));
        self.simulate(adjacency, initial)
    }

    fn simulate(&self, adjacency: &[Vec<usize>], mut positions: Vec<DVec2>) -> Vec<DVec2> {
        let n = positions.len();
        let k = self
            .optimal_distance
            .unwrap_or_else(|| (1.0 / n as f64).sqrt());

        let mut adjacent = vec![false; n * n];
        for (u, neighbors) in adjacency.iter().enumerate() {
            for &v in neighbors {
                adjacent[u * n + v] = true;
            }
        }

        let mut temperature = 0.1 * extent(&positions);
        let cooling = temperature / (self.iterations + 1) as f64;
        let mut displacement = vec![DVec2::ZERO; n];

        for iteration in 0..self.iterations {
            for (i, d) in displacement.iter_mut().enumerate() {
                *d = DVec2::ZERO;
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let delta = positions[i] - positions[j];
                    let distance = delta.length().max(0.01);
                    let mut force = repel_force(distance, k);
                    if adjacent[i * n + j] {
                        force -= attract_force(distance, k);
                    }
                    *d += delta * force;
                }
            }

            let mut moved = 0.0;
            for (position, d) in positions.iter_mut().zip(&displacement) {
                let length = match d.length() {
                    l if l < 0.01 => 0.1,
                    l => l,
                };
                let step = *d * (temperature / length);
                *position += step;
                moved += step.length_squared();
            }
            temperature -= cooling;

            if moved.sqrt() / (n as f64) < self.threshold {
                debug!("spring layout settled after {} iterations", iteration + 1);
                break;
            }
        }

        rescale(&mut positions, 1.0);
        positions
    }
}

/// Repulsion between any two nodes, scaled to multiply the delta vector.
fn repel_force(distance: f64, k: f64) -> f64 {
    k * k / (distance * distance)
}

/// Attraction along an edge, scaled to multiply the delta vector.
fn attract_force(distance: f64, k: f64) -> f64 {
    distance / k
}

fn extent(positions: &[DVec2]) -> f64 {
    let min = positions.iter().copied().fold(DVec2::INFINITY, DVec2::min);
    let max = positions.iter().copied().fold(DVec2::NEG_INFINITY, DVec2::max);
    (max - min).max_element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_pair_ends_closer_than_unconnected_nodes() {
        // 0 - 1, 2 isolated
        let adjacency = vec![vec![1], vec![0], vec![]];
        let positions = SpringLayout::new().seed(Some(11)).iterations(200).layout(&adjacency);
        let linked = positions[0].distance(positions[1]);
        let loose = positions[0].distance(positions[2]).min(positions[1].distance(positions[2]));
        assert!(linked < loose, "{linked} >= {loose}");
    }

    #[test]
    fn output_is_rescaled() {
        let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1, 3], vec![2]];
        let positions = SpringLayout::new().seed(Some(5)).layout(&adjacency);
        let max = positions
            .iter()
            .map(|p| p.abs().max_element())
            .fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }
}
