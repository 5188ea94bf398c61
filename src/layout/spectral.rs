use super::rescale;
use glam::DVec2;
use nalgebra::{DMatrix, SymmetricEigen};

/// Places node `i` at the `i`-th entries of the Laplacian eigenvectors belonging to
/// the second and third smallest eigenvalues.
pub fn spectral_layout(adjacency: &[Vec<usize>]) -> Vec<DVec2> {
    let n = adjacency.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![DVec2::ZERO],
        2 => return vec![DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0)],
        _ => {}
    }

    let mut laplacian = DMatrix::<f64>::zeros(n, n);
    for (u, neighbors) in adjacency.iter().enumerate() {
        for &v in neighbors {
            laplacian[(u, v)] -= 1.0;
            laplacian[(u, u)] += 1.0;
        }
    }

    let eigen = SymmetricEigen::new(laplacian);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let (first, second) = (order[1], order[2]);

    let mut positions: Vec<DVec2> = (0..n)
        .map(|i| DVec2::new(eigen.eigenvectors[(i, first)], eigen.eigenvectors[(i, second)]))
        .collect();
    rescale(&mut positions, 1.0);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_lands_on_a_ring() {
        let n = 6;
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                let mut neighbors = vec![(i + n - 1) % n, (i + 1) % n];
                neighbors.sort_unstable();
                neighbors
            })
            .collect();
        let positions = spectral_layout(&adjacency);
        let radii: Vec<f64> = positions.iter().map(|p| p.length()).collect();
        let (min, max) = radii
            .iter()
            .fold((f64::MAX, 0.0_f64), |(lo, hi), r| (lo.min(*r), hi.max(*r)));
        assert!(max - min < 0.2, "radii {radii:?}");
    }

    #[test]
    fn two_nodes_sit_apart() {
        let positions = spectral_layout(&[vec![1], vec![0]]);
        assert_ne!(positions[0], positions[1]);
    }
}
