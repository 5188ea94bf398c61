//! The attributed graph handed to [`plot`](crate::plot).
//!
//! Nodes are identified by strings and, like their edges, carry an open map of
//! attributes. Storage is a [`petgraph::Graph`]; undirected kinds are stored with an
//! arbitrary edge orientation and every query that cares about direction consults
//! [`GraphKind`].

use crate::error::Result;
use glam::DVec2;
use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Attribute name to value, in insertion order.
pub type Attributes = IndexMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(value) => Some(*value as f64),
            AttrValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => f.write_str("null"),
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            // Integral floats keep their `.0`.
            AttrValue::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            AttrValue::Float(value) => write!(f, "{value}"),
            AttrValue::Str(value) => f.write_str(value),
            AttrValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(values: Vec<AttrValue>) -> Self {
        AttrValue::List(values)
    }
}

/// Directed/undirected and simple/multi discrimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphKind {
    #[default]
    Graph,
    DiGraph,
    MultiGraph,
    MultiDiGraph,
}

impl GraphKind {
    pub fn from_flags(directed: bool, multigraph: bool) -> Self {
        match (directed, multigraph) {
            (false, false) => GraphKind::Graph,
            (true, false) => GraphKind::DiGraph,
            (false, true) => GraphKind::MultiGraph,
            (true, true) => GraphKind::MultiDiGraph,
        }
    }

    pub fn is_directed(self) -> bool {
        matches!(self, GraphKind::DiGraph | GraphKind::MultiDiGraph)
    }

    /// Whether parallel edges between the same pair are kept apart.
    pub fn is_multigraph(self) -> bool {
        matches!(self, GraphKind::MultiGraph | GraphKind::MultiDiGraph)
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub attrs: Attributes,
    /// Position assigned by a layout, or supplied by the caller.
    pub pos: Option<DVec2>,
}

impl NodeData {
    fn new(id: String) -> Self {
        Self {
            id,
            attrs: Attributes::new(),
            pos: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

/// Edge payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeData {
    pub attrs: Attributes,
}

impl EdgeData {
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

/// Attributed graph with string node ids.
///
/// Node indices are dense and follow insertion order, so `index.index()` doubles as the
/// position of a node in every per-node vector built from this graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: petgraph::Graph<NodeData, EdgeData, Directed>,
    kind: GraphKind,
    ids: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            inner: petgraph::Graph::new(),
            kind,
            ids: HashMap::new(),
        }
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::Graph)
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::DiGraph)
    }

    pub fn multi() -> Self {
        Self::new(GraphKind::MultiGraph)
    }

    pub fn multi_directed() -> Self {
        Self::new(GraphKind::MultiDiGraph)
    }

    /// Builds a graph from a list of `(source, target)` pairs.
    pub fn from_edges<I, S>(kind: GraphKind, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new(kind);
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_directed(&self) -> bool {
        self.kind.is_directed()
    }

    pub fn is_multigraph(&self) -> bool {
        self.kind.is_multigraph()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Adds a node, or returns the existing one with the same id.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(index) = self.ids.get(&id) {
            return *index;
        }
        let index = self.inner.add_node(NodeData::new(id.clone()));
        self.ids.insert(id, index);
        index
    }

    /// Adds a node and merges `attrs` into its attributes.
    pub fn add_node_with<I, K, V>(&mut self, id: impl Into<String>, attrs: I) -> NodeIndex
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let index = self.add_node(id);
        let node = &mut self.inner[index];
        node.attrs
            .extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        index
    }

    /// Adds an edge, creating missing endpoints.
    ///
    /// Simple kinds never hold two edges between the same pair: adding one again
    /// returns the existing edge.
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> EdgeIndex {
        self.add_edge_with(source, target, std::iter::empty::<(String, AttrValue)>())
    }

    /// Adds an edge carrying `attrs`. For simple kinds the attributes are merged into an
    /// existing edge between the same pair.
    pub fn add_edge_with<I, K, V>(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        attrs: I,
    ) -> EdgeIndex
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let u = self.add_node(source);
        let v = self.add_node(target);
        let attrs = attrs.into_iter().map(|(k, v)| (k.into(), v.into()));

        if !self.is_multigraph() {
            if let Some(edge) = self.find_edge(u, v) {
                self.inner[edge].attrs.extend(attrs);
                return edge;
            }
        }
        self.inner.add_edge(
            u,
            v,
            EdgeData {
                attrs: attrs.collect(),
            },
        )
    }

    /// First edge between `u` and `v`, honoring direction for directed kinds.
    pub fn find_edge(&self, u: NodeIndex, v: NodeIndex) -> Option<EdgeIndex> {
        if self.is_directed() {
            self.inner.find_edge(u, v)
        } else {
            self.inner.find_edge_undirected(u, v).map(|(edge, _)| edge)
        }
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.node_index(id).map(|index| &self.inner[index])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeData> {
        let index = self.node_index(id)?;
        Some(&mut self.inner[index])
    }

    /// Payload of a node index obtained from this graph.
    pub fn node_data(&self, index: NodeIndex) -> &NodeData {
        &self.inner[index]
    }

    /// Sets one attribute on an existing node.
    pub fn set_node_attr(
        &mut self,
        id: &str,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| crate::PlotError::UnknownNode(id.to_string()))?;
        node.attrs.insert(name.into(), value.into());
        Ok(())
    }

    /// Nodes in iteration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NodeData)> + '_ {
        self.inner
            .node_indices()
            .map(move |index| (index, &self.inner[index]))
    }

    /// Edges in iteration order as `(source, target, payload)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &EdgeData)> + '_ {
        self.inner
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }

    /// Number of incident edges. Self-loops count twice.
    pub fn degree(&self, index: NodeIndex) -> usize {
        self.inner.edges_directed(index, Direction::Outgoing).count()
            + self.inner.edges_directed(index, Direction::Incoming).count()
    }

    /// Successors for directed kinds, all adjacent nodes otherwise. No duplicates.
    pub fn neighbors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut seen = HashSet::new();
        let candidates: Vec<NodeIndex> = if self.is_directed() {
            self.inner
                .neighbors_directed(index, Direction::Outgoing)
                .collect()
        } else {
            self.inner.neighbors_undirected(index).collect()
        };
        candidates
            .into_iter()
            .filter(|neighbor| seen.insert(*neighbor))
            .collect()
    }

    /// Undirected simple view used by the layouts: per node, the sorted list of distinct
    /// adjacent nodes, without self-loops.
    pub(crate) fn simple_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for (source, target, _) in self.edges() {
            let (u, v) = (source.index(), target.index());
            if u == v {
                continue;
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }
        adjacency
    }

    pub fn position(&self, id: &str) -> Option<DVec2> {
        self.node(id).and_then(|node| node.pos)
    }

    /// Positions of all nodes, in node order, if every node has one.
    pub fn positions(&self) -> Option<Vec<DVec2>> {
        self.inner.node_weights().map(|node| node.pos).collect()
    }

    /// Writes positions back onto the nodes, in node order.
    pub(crate) fn set_positions(&mut self, positions: &[DVec2]) {
        for (node, position) in self.inner.node_weights_mut().zip(positions) {
            node.pos = Some(*position);
        }
    }

    /// Loads a graph from node-link JSON:
    ///
    /// ```json
    /// {"directed": false, "multigraph": false,
    ///  "nodes": [{"id": "a", "group": 1}, {"id": "b", "pos": [0.5, 0.5]}],
    ///  "links": [{"source": "a", "target": "b", "weight": 3}]}
    /// ```
    ///
    /// A node `pos` made of two numbers becomes the node position.
    pub fn from_node_link_json(json: &str) -> Result<Self> {
        let data: NodeLinkData = serde_json::from_str(json)?;
        let mut graph = Graph::new(GraphKind::from_flags(data.directed, data.multigraph));

        for node in data.nodes {
            let mut attrs = node.attrs;
            let pos = match attrs.shift_remove("pos") {
                Some(value) => match position_from_attr(&value) {
                    Some(pos) => Some(pos),
                    None => {
                        attrs.insert("pos".to_string(), value);
                        None
                    }
                },
                None => None,
            };
            let index = graph.add_node_with(node.id.to_string(), attrs);
            graph.inner[index].pos = pos;
        }
        for link in data.links {
            graph.add_edge_with(link.source.to_string(), link.target.to_string(), link.attrs);
        }
        Ok(graph)
    }
}

fn position_from_attr(value: &AttrValue) -> Option<DVec2> {
    match value {
        AttrValue::List(items) if items.len() == 2 => {
            Some(DVec2::new(items[0].as_f64()?, items[1].as_f64()?))
        }
        _ => None,
    }
}

#[derive(Deserialize)]
struct NodeLinkData {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    #[serde(default)]
    nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Deserialize)]
struct NodeLinkNode {
    id: NodeLinkId,
    #[serde(flatten)]
    attrs: Attributes,
}

#[derive(Deserialize)]
struct NodeLinkEdge {
    source: NodeLinkId,
    target: NodeLinkId,
    #[serde(flatten)]
    attrs: Attributes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeLinkId {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLinkId::Int(id) => write!(f, "{id}"),
            NodeLinkId::Str(id) => f.write_str(id),
        }
    }
}
