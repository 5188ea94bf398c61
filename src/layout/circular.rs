use super::rescale;
use glam::DVec2;
use std::f64::consts::TAU;

/// Angle between consecutive spiral nodes, in radians.
const SPIRAL_RESOLUTION: f64 = 0.35;

/// Nodes evenly spaced on the unit circle, starting at angle zero.
pub fn circular_layout(node_count: usize) -> Vec<DVec2> {
    if node_count == 1 {
        return vec![DVec2::ZERO];
    }
    let mut positions: Vec<DVec2> = (0..node_count)
        .map(|i| DVec2::from_angle(TAU * i as f64 / node_count as f64))
        .collect();
    rescale(&mut positions, 1.0);
    positions
}

/// Nodes along an Archimedean spiral: node `i` sits at radius `i`.
pub fn spiral_layout(node_count: usize) -> Vec<DVec2> {
    if node_count == 1 {
        return vec![DVec2::ZERO];
    }
    let mut positions: Vec<DVec2> = (0..node_count)
        .map(|i| {
            let i = i as f64;
            DVec2::from_angle(SPIRAL_RESOLUTION * i) * i
        })
        .collect();
    rescale(&mut positions, 1.0);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_centered_and_fits() {
        let positions = circular_layout(8);
        for p in &positions {
            assert!((p.length() - 1.0).abs() < 1e-9);
        }
        let center = positions.iter().copied().sum::<DVec2>() / 8.0;
        assert!(center.length() < 1e-9);
    }

    #[test]
    fn spiral_moves_outwards() {
        let positions = spiral_layout(10);
        let radii: Vec<f64> = positions.iter().map(|p| p.length()).collect();
        assert!(radii.iter().all(|r| *r <= 1.0 + 1e-9));
        assert!(radii[9] > radii[5]);
    }
}
