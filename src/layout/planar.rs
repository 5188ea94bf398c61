//! Planar layout.
//!
//! Planarity is decided exactly: the graph is split into biconnected blocks and each
//! block is embedded face by face with the Demoucron–Malgrange–Pertuiset algorithm.
//! The drawing pins the longest face of the largest block to a circle and puts the
//! other vertices of that block at the barycenter of their neighbors (Tutte). Every
//! further block hangs off its cut vertex inside the widest free angle there, and
//! trees are fanned out radially.

use super::{rescale, LayoutError};
use glam::DVec2;
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// A face boundary, as a cyclic vertex sequence.
type Face = Vec<usize>;

/// Straight-line planar drawing of the undirected simple graph given as adjacency lists.
///
/// Fails with [`LayoutError::NotPlanar`] when no crossing-free embedding exists.
pub fn planar_layout(adjacency: &[Vec<usize>]) -> Result<Vec<DVec2>, LayoutError> {
    let n = adjacency.len();
    let edge_count = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
    if n >= 3 && edge_count > 3 * n - 6 {
        debug!("{edge_count} edges exceed the planar bound for {n} nodes");
        return Err(LayoutError::NotPlanar);
    }

    let blocks = biconnected_components(adjacency);
    let mut faces = Vec::with_capacity(blocks.len());
    for block in &blocks {
        faces.push(embed_block(block).ok_or(LayoutError::NotPlanar)?);
    }
    debug!("embedded {} biconnected blocks", blocks.len());

    Ok(Drawing::new(adjacency).draw(&blocks, &faces))
}

/// Edge sets of the biconnected components, bridges included as single-edge blocks.
fn biconnected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<(usize, usize)>> {
    let n = adjacency.len();
    let mut discovered = vec![usize::MAX; n];
    let mut low = vec![0; n];
    let mut time = 0;
    let mut edge_stack: Vec<(usize, usize)> = Vec::new();
    let mut blocks = Vec::new();

    for root in 0..n {
        if discovered[root] != usize::MAX {
            continue;
        }
        discovered[root] = time;
        low[root] = time;
        time += 1;
        // (vertex, parent, next neighbor to visit)
        let mut frames = vec![(root, usize::MAX, 0)];

        while let Some(frame) = frames.last_mut() {
            let (v, parent, next) = *frame;
            if next < adjacency[v].len() {
                frame.2 += 1;
                let w = adjacency[v][next];
                if discovered[w] == usize::MAX {
                    discovered[w] = time;
                    low[w] = time;
                    time += 1;
                    edge_stack.push((v, w));
                    frames.push((w, v, 0));
                } else if w != parent && discovered[w] < discovered[v] {
                    edge_stack.push((v, w));
                    low[v] = low[v].min(discovered[w]);
                }
                continue;
            }

            frames.pop();
            if parent == usize::MAX {
                continue;
            }
            low[parent] = low[parent].min(low[v]);
            if low[v] >= discovered[parent] {
                let mut block = Vec::new();
                while let Some(edge) = edge_stack.pop() {
                    block.push(edge);
                    if edge == (parent, v) {
                        break;
                    }
                }
                blocks.push(block);
            }
        }
    }
    blocks
}

/// Faces of a planar embedding of one block, or `None` if the block is not planar.
/// Blocks without a cycle have no faces.
fn embed_block(block: &[(usize, usize)]) -> Option<Vec<Face>> {
    if block.len() < 3 {
        return Some(Vec::new());
    }

    let mut vertices: Vec<usize> = block.iter().flat_map(|&(u, v)| [u, v]).collect();
    vertices.sort_unstable();
    vertices.dedup();
    let local: HashMap<usize, usize> = vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut adjacency = vec![Vec::new(); vertices.len()];
    for &(u, v) in block {
        let (u, v) = (local[&u], local[&v]);
        adjacency[u].push(v);
        adjacency[v].push(u);
    }

    let faces = Embedder::new(adjacency).run()?;
    Some(
        faces
            .into_iter()
            .map(|face| face.into_iter().map(|v| vertices[v]).collect())
            .collect(),
    )
}

/// A piece of the block not yet drawn: either a chord between two drawn vertices or a
/// connected group of undrawn vertices with the drawn vertices it touches.
struct Fragment {
    attachments: Vec<usize>,
    /// A path through the fragment between two attachments.
    path: Vec<usize>,
}

struct Embedder {
    adjacency: Vec<Vec<usize>>,
    drawn: Vec<bool>,
    drawn_edges: HashSet<(usize, usize)>,
    faces: Vec<Face>,
}

impl Embedder {
    fn new(adjacency: Vec<Vec<usize>>) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            drawn: vec![false; n],
            drawn_edges: HashSet::new(),
            faces: Vec::new(),
        }
    }

    fn run(mut self) -> Option<Vec<Face>> {
        let Some(cycle) = find_cycle(&self.adjacency) else {
            return Some(Vec::new());
        };
        self.draw_path(&cycle);
        self.draw_edge(cycle[cycle.len() - 1], cycle[0]);
        self.faces = vec![cycle.clone(), cycle];

        loop {
            let fragments = self.fragments();
            if fragments.is_empty() {
                return Some(self.faces);
            }

            let mut choice = None;
            for (index, fragment) in fragments.iter().enumerate() {
                let admissible: Vec<usize> = self
                    .faces
                    .iter()
                    .enumerate()
                    .filter(|(_, face)| fragment.attachments.iter().all(|a| face.contains(a)))
                    .map(|(i, _)| i)
                    .collect();
                match admissible.len() {
                    0 => return None,
                    1 => {
                        choice = Some((index, admissible[0]));
                        break;
                    }
                    _ => {
                        if choice.is_none() {
                            choice = Some((index, admissible[0]));
                        }
                    }
                }
            }

            let (fragment, face) = choice?;
            self.split_face(face, &fragments[fragment].path);
        }
    }

    fn draw_edge(&mut self, u: usize, v: usize) {
        self.drawn_edges.insert((u.min(v), u.max(v)));
    }

    fn draw_path(&mut self, path: &[usize]) {
        for &v in path {
            self.drawn[v] = true;
        }
        for pair in path.windows(2) {
            self.draw_edge(pair[0], pair[1]);
        }
    }

    /// Replaces `face` by the two faces created when `path` is drawn inside it.
    fn split_face(&mut self, face: usize, path: &[usize]) {
        let face = self.faces.swap_remove(face);
        let (a, b) = (path[0], path[path.len() - 1]);
        let inner = &path[1..path.len() - 1];

        let mut first = walk(&face, a, b);
        let mut second = walk(&face, b, a);
        first.extend(inner.iter().rev());
        second.extend(inner);

        self.faces.push(first);
        self.faces.push(second);
        self.draw_path(path);
    }

    fn fragments(&self) -> Vec<Fragment> {
        let n = self.adjacency.len();
        let mut fragments = Vec::new();

        for u in 0..n {
            if !self.drawn[u] {
                continue;
            }
            for &v in &self.adjacency[u] {
                if u < v && self.drawn[v] && !self.drawn_edges.contains(&(u, v)) {
                    fragments.push(Fragment {
                        attachments: vec![u, v],
                        path: vec![u, v],
                    });
                }
            }
        }

        let mut seen = vec![false; n];
        for start in 0..n {
            if self.drawn[start] || seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = Vec::new();
            let mut attachments = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for &w in &self.adjacency[v] {
                    if self.drawn[w] {
                        if !attachments.contains(&w) {
                            attachments.push(w);
                        }
                    } else if !seen[w] {
                        seen[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            if let Some(path) = self.path_through(&component, &attachments) {
                fragments.push(Fragment { attachments, path });
            }
        }
        fragments
    }

    /// Path from the first attachment, through undrawn vertices of `component`, to some
    /// other attachment.
    fn path_through(&self, component: &[usize], attachments: &[usize]) -> Option<Vec<usize>> {
        let &from = attachments.first()?;
        let &entry = component
            .iter()
            .find(|&&v| self.adjacency[v].contains(&from))?;

        let mut parent: HashMap<usize, usize> = HashMap::new();
        let mut queue = VecDeque::from([entry]);
        parent.insert(entry, entry);
        while let Some(v) = queue.pop_front() {
            if let Some(&to) = self.adjacency[v]
                .iter()
                .find(|&&w| self.drawn[w] && w != from)
            {
                let mut inner = vec![v];
                let mut current = v;
                while current != entry {
                    current = parent[&current];
                    inner.push(current);
                }
                inner.reverse();

                let mut path = Vec::with_capacity(inner.len() + 2);
                path.push(from);
                path.extend(inner);
                path.push(to);
                return Some(path);
            }
            for &w in &self.adjacency[v] {
                if !self.drawn[w] && !parent.contains_key(&w) {
                    parent.insert(w, v);
                    queue.push_back(w);
                }
            }
        }
        None
    }
}

/// The vertices of cyclic `face` from `from` to `to`, both included.
fn walk(face: &[usize], from: usize, to: usize) -> Vec<usize> {
    let start = face.iter().position(|&v| v == from).unwrap_or(0);
    let mut result = Vec::new();
    let mut i = start;
    loop {
        result.push(face[i]);
        if face[i] == to || result.len() == face.len() {
            return result;
        }
        i = (i + 1) % face.len();
    }
}

/// Any cycle of a connected graph, found through a non-tree edge of a BFS tree.
fn find_cycle(adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
    let n = adjacency.len();
    if n == 0 {
        return None;
    }
    let mut parent = vec![usize::MAX; n];
    let mut depth = vec![usize::MAX; n];
    depth[0] = 0;
    let mut queue = VecDeque::from([0]);
    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if depth[w] == usize::MAX {
                depth[w] = depth[v] + 1;
                parent[w] = v;
                queue.push_back(w);
            }
        }
    }

    for (u, neighbors) in adjacency.iter().enumerate() {
        for &w in neighbors {
            if u >= w || parent[w] == u || parent[u] == w {
                continue;
            }
            let (mut a, mut b) = (u, w);
            let mut left = vec![a];
            let mut right = vec![b];
            while depth[a] > depth[b] {
                a = parent[a];
                left.push(a);
            }
            while depth[b] > depth[a] {
                b = parent[b];
                right.push(b);
            }
            while a != b {
                a = parent[a];
                left.push(a);
                b = parent[b];
                right.push(b);
            }
            right.pop();
            right.reverse();
            left.extend(right);
            return Some(left);
        }
    }
    None
}

struct Drawing<'a> {
    adjacency: &'a [Vec<usize>],
    /// Membership in the 2-core: vertices on a cycle or on a path between cycles.
    core: Vec<bool>,
    positions: Vec<DVec2>,
    placed: Vec<bool>,
}

impl<'a> Drawing<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            core: two_core(adjacency),
            positions: vec![DVec2::ZERO; n],
            placed: vec![false; n],
        }
    }

    fn draw(mut self, blocks: &[Vec<(usize, usize)>], faces: &[Vec<Face>]) -> Vec<DVec2> {
        let components = connected_components(self.adjacency);
        for (index, component) in components.iter().enumerate() {
            self.draw_component(component, blocks, faces);

            // normalize into the unit disc, then shift to its slot in the row
            let center = component.iter().map(|&v| self.positions[v]).sum::<DVec2>()
                / component.len() as f64;
            let radius = component
                .iter()
                .map(|&v| self.positions[v].distance(center))
                .fold(0.0, f64::max);
            let offset = DVec2::new(2.5 * index as f64, 0.0);
            for &v in component {
                let local = if radius > 0.0 {
                    (self.positions[v] - center) / radius
                } else {
                    DVec2::ZERO
                };
                self.positions[v] = local + offset;
            }
        }

        rescale(&mut self.positions, 1.0);
        self.positions
    }

    fn draw_component(
        &mut self,
        component: &[usize],
        blocks: &[Vec<(usize, usize)>],
        faces: &[Vec<Face>],
    ) {
        let members: HashSet<usize> = component.iter().copied().collect();
        let in_component: Vec<usize> = (0..blocks.len())
            .filter(|&b| members.contains(&blocks[b][0].0))
            .collect();
        let root = in_component
            .iter()
            .copied()
            .filter(|&b| !faces[b].is_empty())
            .max_by_key(|&b| blocks[b].len());

        let Some(root) = root else {
            // a tree
            let root = component[0];
            self.placed[root] = true;
            self.fan_out(root, root, 1.0, 0.0, TAU);
            return;
        };

        let Some(outer) = faces[root].iter().max_by_key(|face| face.len()) else {
            return;
        };
        for (i, &v) in outer.iter().enumerate() {
            self.positions[v] = DVec2::from_angle(TAU * i as f64 / outer.len() as f64);
            self.placed[v] = true;
        }
        self.relax_block(&blocks[root]);

        // the remaining cycle blocks and the bridges between them, outwards from the root
        let mut pending: Vec<usize> = in_component
            .into_iter()
            .filter(|&b| {
                b != root
                    && (!faces[b].is_empty()
                        || blocks[b].iter().all(|&(u, v)| self.core[u] && self.core[v]))
            })
            .collect();
        while let Some(next) = pending
            .iter()
            .position(|&b| blocks[b].iter().any(|&(u, v)| self.placed[u] || self.placed[v]))
        {
            let block = pending.remove(next);
            self.place_block(&blocks[block], &faces[block]);
        }

        for &v in component {
            if self.core[v] {
                self.fan_hanging_trees(v);
            }
        }
    }

    /// Draws a block that shares exactly one vertex with the drawing so far. Its
    /// longest face through that vertex becomes an ellipse inside the widest free
    /// angle at the shared vertex.
    fn place_block(&mut self, edges: &[(usize, usize)], faces: &[Face]) {
        let Some(anchor) = edges
            .iter()
            .flat_map(|&(u, v)| [u, v])
            .find(|&v| self.placed[v])
        else {
            return;
        };
        let (start, gap) = self.widest_gap(anchor);
        let axis = DVec2::from_angle(start + gap / 2.0);
        let reach = self.reach(anchor);
        let origin = self.positions[anchor];

        let Some(face) = faces
            .iter()
            .filter(|face| face.contains(&anchor))
            .max_by_key(|face| face.len())
        else {
            // a bridge
            for &(u, v) in edges {
                for w in [u, v] {
                    if !self.placed[w] {
                        self.positions[w] = origin + axis * reach;
                        self.placed[w] = true;
                    }
                }
            }
            return;
        };

        let len = face.len();
        let first = face.iter().position(|&v| v == anchor).unwrap_or(0);
        let half_length = reach / 2.0;
        // flatten the ellipse until its first vertices stay inside the free angle
        let flattening = ((0.4 * gap).min(0.99 * FRAC_PI_2).tan() * (PI / len as f64).tan()).min(1.0);
        let half_width = half_length * flattening;
        let center = origin + axis * half_length;
        for i in 0..len {
            let v = face[(first + i) % len];
            let t = TAU * i as f64 / len as f64;
            self.positions[v] =
                center - axis * (half_length * t.cos()) + axis.perp() * (half_width * t.sin());
            self.placed[v] = true;
        }
        self.relax_block(edges);
    }

    /// Gauss–Seidel iteration placing each unplaced vertex of a block at the
    /// barycenter of its neighbors in the block. Marks them placed afterwards.
    fn relax_block(&mut self, edges: &[(usize, usize)]) {
        let mut neighbors: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &(u, v) in edges {
            neighbors.entry(u).or_default().push(v);
            neighbors.entry(v).or_default().push(u);
        }
        let free: Vec<usize> = neighbors
            .keys()
            .copied()
            .filter(|&v| !self.placed[v])
            .collect();
        if free.is_empty() {
            return;
        }

        let fixed: Vec<DVec2> = neighbors
            .keys()
            .filter(|&&v| self.placed[v])
            .map(|&v| self.positions[v])
            .collect();
        let centroid = fixed.iter().copied().sum::<DVec2>() / fixed.len().max(1) as f64;
        for &v in &free {
            self.positions[v] = centroid;
        }

        for _ in 0..1000 {
            let mut change: f64 = 0.0;
            for &v in &free {
                let around = &neighbors[&v];
                let next = around.iter().map(|&w| self.positions[w]).sum::<DVec2>()
                    / around.len() as f64;
                change = change.max(next.distance(self.positions[v]));
                self.positions[v] = next;
            }
            if change < 1e-9 {
                break;
            }
        }
        self.separate_coincident(&free, &neighbors, edges);
        for v in free {
            self.placed[v] = true;
        }
    }

    /// Spreads free vertices that the relaxation put on one point over a short segment
    /// through it, across the line of their first two neighbors.
    fn separate_coincident(
        &mut self,
        free: &[usize],
        neighbors: &BTreeMap<usize, Vec<usize>>,
        edges: &[(usize, usize)],
    ) {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for &v in free {
            let position = self.positions[v];
            match groups
                .iter_mut()
                .find(|group| self.positions[group[0]].distance(position) < 1e-9)
            {
                Some(group) => group.push(v),
                None => groups.push(vec![v]),
            }
        }

        for group in groups.into_iter().filter(|group| group.len() > 1) {
            let point = self.positions[group[0]];
            let direction = match neighbors[&group[0]].as_slice() {
                [p, q, ..] => (self.positions[*q] - self.positions[*p]).perp(),
                [p] => (self.positions[*p] - point).perp(),
                [] => DVec2::X,
            }
            .try_normalize()
            .unwrap_or(DVec2::X);
            let clearance = edges
                .iter()
                .filter(|(u, v)| !group.contains(u) && !group.contains(v))
                .map(|&(u, v)| segment_distance(point, self.positions[u], self.positions[v]))
                .fold(f64::MAX, f64::min);
            let spread = if clearance > 1e-9 && clearance < f64::MAX {
                0.5 * clearance
            } else {
                0.1
            };

            let k = group.len() as f64;
            for (i, &v) in group.iter().enumerate() {
                let offset = spread * (2.0 * i as f64 - (k - 1.0)) / k;
                self.positions[v] = point + direction * offset;
            }
            debug!("separated {} vertices drawn on one point", group.len());
        }
    }

    /// Fans the trees hanging off core vertex `v` into its widest free angle.
    fn fan_hanging_trees(&mut self, v: usize) {
        if self.adjacency[v].iter().all(|&w| self.placed[w]) {
            return;
        }
        let (start, gap) = self.widest_gap(v);
        let height = self.height(v, v).max(1) as f64;
        let step = 0.35 * self.reach(v) / height;
        self.fan_out(v, v, step, start + 0.1 * gap, 0.8 * gap);
    }

    /// Start angle and size of the largest angle at `v` between its placed neighbors.
    fn widest_gap(&self, v: usize) -> (f64, f64) {
        let origin = self.positions[v];
        let mut angles: Vec<f64> = self.adjacency[v]
            .iter()
            .filter(|&&w| self.placed[w])
            .map(|&w| {
                let d = self.positions[w] - origin;
                d.y.atan2(d.x)
            })
            .collect();
        angles.sort_by(f64::total_cmp);
        angles
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let next = angles.get(i + 1).copied().unwrap_or(angles[0] + TAU);
                (a, next - a)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0.0, TAU))
    }

    /// Distance from `v` to its nearest placed neighbor.
    fn reach(&self, v: usize) -> f64 {
        let nearest = self.adjacency[v]
            .iter()
            .filter(|&&w| self.placed[w])
            .map(|&w| self.positions[w].distance(self.positions[v]))
            .fold(f64::MAX, f64::min);
        if nearest < f64::MAX && nearest > 1e-6 {
            0.4 * nearest
        } else {
            0.1
        }
    }

    /// Places the unplaced subtree below `node` inside the wedge `[start, start + sweep)`
    /// around `root`, one ring of radius `step` per level.
    fn fan_out(&mut self, root: usize, node: usize, step: f64, start: f64, sweep: f64) {
        let mut stack = vec![(node, start, sweep)];
        while let Some((node, start, sweep)) = stack.pop() {
            let children: Vec<usize> = self.adjacency[node]
                .iter()
                .copied()
                .filter(|&c| !self.placed[c])
                .collect();
            let weights: Vec<usize> = children.iter().map(|&c| self.leaves(c, node)).collect();
            let total = weights.iter().sum::<usize>().max(1) as f64;

            let level = (self.positions[node].distance(self.positions[root]) / step).round();
            let ring = (level + 1.0) * step;
            let mut angle = start;
            for (&child, &weight) in children.iter().zip(&weights) {
                let share = sweep * weight as f64 / total;
                self.positions[child] =
                    self.positions[root] + DVec2::from_angle(angle + share / 2.0) * ring;
                self.placed[child] = true;
                stack.push((child, angle, share));
                angle += share;
            }
        }
    }

    /// Leaves of the unplaced subtree hanging below `node`.
    fn leaves(&self, node: usize, parent: usize) -> usize {
        self.adjacency[node]
            .iter()
            .filter(|&&c| c != parent && !self.placed[c])
            .map(|&c| self.leaves(c, node))
            .sum::<usize>()
            .max(1)
    }

    /// Depth of the unplaced subtree hanging below `node`.
    fn height(&self, node: usize, parent: usize) -> usize {
        self.adjacency[node]
            .iter()
            .filter(|&&c| c != parent && !self.placed[c])
            .map(|&c| 1 + self.height(c, node))
            .max()
            .unwrap_or(0)
    }
}

fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let t = if ab.length_squared() > 0.0 {
        ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

fn two_core(adjacency: &[Vec<usize>]) -> Vec<bool> {
    let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut removed: Vec<bool> = degree.iter().map(|&d| d < 2).collect();
    let mut queue: VecDeque<usize> = (0..adjacency.len()).filter(|&v| removed[v]).collect();
    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if removed[w] {
                continue;
            }
            degree[w] -= 1;
            if degree[w] < 2 {
                removed[w] = true;
                queue.push_back(w);
            }
        }
    }
    removed.into_iter().map(|r| !r).collect()
}

fn connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen = vec![false; adjacency.len()];
    let mut components = Vec::new();
    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            component.push(v);
            for &w in &adjacency[v] {
                if !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
        components.push(component);
    }
    components
}
