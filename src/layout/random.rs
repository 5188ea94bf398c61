use glam::DVec2;
use rand::Rng;

/// Uniform positions in `[0, 1)²`.
pub fn random_layout(node_count: usize, rng: &mut impl Rng) -> Vec<DVec2> {
    (0..node_count)
        .map(|_| DVec2::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}
