//! Read-only traversals over the witness graph.
//!
//! All searches are iterative and start from the first live node; ties are
//! broken by the graph's incidence order. Results are indexed by
//! `NodeIndex::index()` up to the graph's node bound.

use crate::state::WitnessGraph;
use petgraph::stable_graph::{EdgeIndex, Edges, NodeIndex};
use petgraph::visit::{EdgeIndexable, EdgeRef, NodeIndexable};
use petgraph::Undirected;

/// The endpoint of `edge` that is not `node` (`node` itself for a loop).
pub fn far_endpoint<R: EdgeRef<NodeId = NodeIndex>>(edge: R, node: NodeIndex) -> NodeIndex {
    if edge.source() == node {
        edge.target()
    } else {
        edge.source()
    }
}

/// Boolean lookup over edge indices.
pub fn edge_mask(graph: &WitnessGraph, edges: impl IntoIterator<Item = EdgeIndex>) -> Vec<bool> {
    let mut mask = vec![false; graph.edge_bound()];
    for edge in edges {
        mask[edge.index()] = true;
    }
    mask
}

struct Frame<'a> {
    node: NodeIndex,
    parent: Option<NodeIndex>,
    low: usize,
    children: usize,
    edges: Edges<'a, (), Undirected>,
}

/// Articulation points of the graph with the `disabled` edges left out.
///
/// Only the component of the first node is searched. A back edge to the DFS
/// parent node is ignored, so a parallel edge does not protect a cut vertex.
pub fn find_articulation_points(
    graph: &WitnessGraph,
    disabled: impl Fn(EdgeIndex) -> bool,
) -> Vec<bool> {
    let mut articulation = vec![false; graph.node_bound()];
    let Some(root) = graph.node_indices().next() else {
        return articulation;
    };
    // 0 marks "not yet discovered".
    let mut discovery = vec![0usize; graph.node_bound()];
    let mut time = 1;
    discovery[root.index()] = time;
    let mut stack = vec![Frame {
        node: root,
        parent: None,
        low: time,
        children: 0,
        edges: graph.edges(root),
    }];

    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        match frame.edges.next() {
            Some(edge) if disabled(edge.id()) => {}
            Some(edge) => {
                let far = far_endpoint(edge, node);
                if discovery[far.index()] == 0 {
                    frame.children += 1;
                    time += 1;
                    discovery[far.index()] = time;
                    stack.push(Frame {
                        node: far,
                        parent: Some(node),
                        low: time,
                        children: 0,
                        edges: graph.edges(far),
                    });
                } else if Some(far) != frame.parent {
                    frame.low = frame.low.min(discovery[far.index()]);
                }
            }
            None => {
                let (low, children) = (frame.low, frame.children);
                stack.pop();
                match stack.last_mut() {
                    Some(parent) => {
                        parent.low = parent.low.min(low);
                        if parent.parent.is_some() && low >= discovery[parent.node.index()] {
                            articulation[parent.node.index()] = true;
                        }
                    }
                    None => {
                        if children > 1 {
                            articulation[node.index()] = true;
                        }
                    }
                }
            }
        }
    }
    articulation
}

/// Parent pointers of a tree rooted at the first node.
#[derive(Debug, Clone)]
pub struct TreeParents {
    root: Option<NodeIndex>,
    parent: Vec<Option<(NodeIndex, EdgeIndex)>>,
    reached: usize,
}

/// A tree path split at the lowest common ancestor of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    /// First endpoint up to (excluding) the ancestor.
    pub up: Vec<NodeIndex>,
    pub lca: NodeIndex,
    /// Second endpoint up to (excluding) the ancestor.
    pub down: Vec<NodeIndex>,
}

impl TreePath {
    /// Path nodes: first side, ancestor, second side.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.up
            .iter()
            .copied()
            .chain(std::iter::once(self.lca))
            .chain(self.down.iter().copied())
    }
}

/// Root the subgraph formed by the `tree` edges at the first node.
pub fn find_tree_parents(graph: &WitnessGraph, tree: impl Fn(EdgeIndex) -> bool) -> TreeParents {
    let mut parent = vec![None; graph.node_bound()];
    let root = graph.node_indices().next();
    let mut reached = 0;
    if let Some(root) = root {
        let mut visited = vec![false; graph.node_bound()];
        visited[root.index()] = true;
        reached = 1;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for edge in graph.edges(node) {
                if !tree(edge.id()) {
                    continue;
                }
                let far = far_endpoint(edge, node);
                if !visited[far.index()] {
                    visited[far.index()] = true;
                    parent[far.index()] = Some((node, edge.id()));
                    reached += 1;
                    stack.push(far);
                }
            }
        }
    }
    TreeParents {
        root,
        parent,
        reached,
    }
}

impl TreeParents {
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Nodes connected to the root, the root included.
    pub fn reached(&self) -> usize {
        self.reached
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parent[node.index()].map(|(p, _)| p)
    }

    pub fn parent_edge(&self, node: NodeIndex) -> Option<EdgeIndex> {
        self.parent[node.index()].map(|(_, e)| e)
    }

    fn chain(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(p) = self.parent(current) {
            chain.push(p);
            current = p;
        }
        chain
    }

    /// The tree path between `u` and `v`, or `None` if they are not in the
    /// same tree.
    pub fn path(&self, u: NodeIndex, v: NodeIndex) -> Option<TreePath> {
        let mut up = self.chain(u);
        let mut down = self.chain(v);
        if up.last() != down.last() {
            return None;
        }
        let mut lca = None;
        while let (Some(a), Some(b)) = (up.last(), down.last()) {
            if a != b {
                break;
            }
            lca = Some(*a);
            up.pop();
            down.pop();
        }
        Some(TreePath {
            up,
            lca: lca?,
            down,
        })
    }

    /// Tree edges along `path`.
    pub fn path_edges(&self, path: &TreePath) -> Vec<EdgeIndex> {
        path.up
            .iter()
            .chain(&path.down)
            .filter_map(|&node| self.parent_edge(node))
            .collect()
    }
}

/// Connected components after deleting one node and some edges.
#[derive(Debug, Clone)]
pub struct Components {
    labels: Vec<Option<usize>>,
    count: usize,
}

impl Components {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Component of `node`; `None` for the removed node.
    pub fn label(&self, node: NodeIndex) -> Option<usize> {
        self.labels[node.index()]
    }
}

/// Label the components of the graph without `removed` and without the
/// `disabled` edges, numbering them in node-index order.
pub fn find_components(
    graph: &WitnessGraph,
    removed: NodeIndex,
    disabled: impl Fn(EdgeIndex) -> bool,
) -> Components {
    let mut labels = vec![None; graph.node_bound()];
    let mut count = 0;
    let mut stack = Vec::new();
    for source in graph.node_indices() {
        if source == removed || labels[source.index()].is_some() {
            continue;
        }
        labels[source.index()] = Some(count);
        stack.push(source);
        while let Some(node) = stack.pop() {
            for edge in graph.edges(node) {
                if disabled(edge.id()) {
                    continue;
                }
                let far = far_endpoint(edge, node);
                if far != removed && labels[far.index()].is_none() {
                    labels[far.index()] = Some(count);
                    stack.push(far);
                }
            }
        }
        count += 1;
    }
    Components { labels, count }
}

/// Two-colouring of the graph, `None` if it has an odd cycle.
///
/// The first node of every component gets `false`. A loop is an odd cycle.
pub fn find_bipartition(graph: &WitnessGraph) -> Option<Vec<bool>> {
    let mut side = vec![false; graph.node_bound()];
    let mut visited = vec![false; graph.node_bound()];
    let mut stack = Vec::new();
    for source in graph.node_indices() {
        if visited[source.index()] {
            continue;
        }
        visited[source.index()] = true;
        stack.push(source);
        while let Some(node) = stack.pop() {
            for edge in graph.edges(node) {
                let far = far_endpoint(edge, node);
                if visited[far.index()] {
                    if side[far.index()] == side[node.index()] {
                        return None;
                    }
                } else {
                    visited[far.index()] = true;
                    side[far.index()] = !side[node.index()];
                    stack.push(far);
                }
            }
        }
    }
    Some(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle 0-1-2 with a tail 2-3.
    fn lollipop() -> (WitnessGraph, Vec<NodeIndex>, Vec<EdgeIndex>) {
        let mut graph = WitnessGraph::default();
        let n: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
        let e = vec![
            graph.add_edge(n[0], n[1], ()),
            graph.add_edge(n[1], n[2], ()),
            graph.add_edge(n[2], n[0], ()),
            graph.add_edge(n[2], n[3], ()),
        ];
        (graph, n, e)
    }

    #[test]
    fn articulation_points_respect_disabled_edges() {
        let (graph, _, e) = lollipop();
        assert_eq!(
            find_articulation_points(&graph, |_| false),
            vec![false, false, true, false]
        );
        let closing = e[2];
        assert_eq!(
            find_articulation_points(&graph, |edge| edge == closing),
            vec![false, true, true, false]
        );
    }

    #[test]
    fn root_with_two_children_is_articulation() {
        let mut graph = WitnessGraph::default();
        let n: Vec<_> = (0..3).map(|_| graph.add_node(())).collect();
        graph.add_edge(n[0], n[1], ());
        graph.add_edge(n[0], n[2], ());
        assert_eq!(
            find_articulation_points(&graph, |_| false),
            vec![true, false, false]
        );
    }

    #[test]
    fn parallel_edge_to_parent_is_not_a_back_edge() {
        let mut graph = WitnessGraph::default();
        let n: Vec<_> = (0..3).map(|_| graph.add_node(())).collect();
        graph.add_edge(n[0], n[1], ());
        graph.add_edge(n[1], n[0], ());
        graph.add_edge(n[1], n[2], ());
        assert_eq!(
            find_articulation_points(&graph, |_| false),
            vec![false, true, false]
        );
    }

    #[test]
    fn tree_paths_split_at_common_ancestor() {
        let (graph, n, e) = lollipop();
        let tree = edge_mask(&graph, [e[0], e[1], e[3]]);
        let parents = find_tree_parents(&graph, |edge| tree[edge.index()]);
        assert_eq!(parents.root(), Some(n[0]));
        assert_eq!(parents.reached(), 4);
        assert_eq!(parents.parent(n[3]), Some(n[2]));
        assert_eq!(parents.parent_edge(n[2]), Some(e[1]));

        let path = parents.path(n[3], n[1]).unwrap();
        assert_eq!(path.up, vec![n[3], n[2]]);
        assert_eq!(path.lca, n[1]);
        assert!(path.down.is_empty());
        assert_eq!(parents.path_edges(&path), vec![e[3], e[1]]);

        let path = parents.path(n[0], n[3]).unwrap();
        assert_eq!(path.nodes().collect::<Vec<_>>(), vec![n[0], n[3], n[2], n[1]]);
    }

    #[test]
    fn components_skip_removed_node() {
        let (graph, n, _) = lollipop();
        let components = find_components(&graph, n[2], |_| false);
        assert_eq!(components.count(), 2);
        assert_eq!(components.label(n[0]), Some(0));
        assert_eq!(components.label(n[1]), Some(0));
        assert_eq!(components.label(n[2]), None);
        assert_eq!(components.label(n[3]), Some(1));
    }

    #[test]
    fn bipartition_detects_odd_cycles_and_loops() {
        let (graph, _, _) = lollipop();
        assert_eq!(find_bipartition(&graph), None);

        let mut square = WitnessGraph::default();
        let n: Vec<_> = (0..4).map(|_| square.add_node(())).collect();
        for i in 0..4 {
            square.add_edge(n[i], n[(i + 1) % 4], ());
        }
        assert_eq!(find_bipartition(&square), Some(vec![false, true, false, true]));

        let mut looped = WitnessGraph::default();
        let a = looped.add_node(());
        looped.add_edge(a, a, ());
        assert_eq!(find_bipartition(&looped), None);
    }
}
