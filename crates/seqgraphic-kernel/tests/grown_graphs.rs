//! Graphs grown from a wheel by node splits and chords.
//!
//! Every split keeps a tree edge and at least two old edges on both halves,
//! and every chord joins two non-adjacent nodes, so each intermediate graph
//! stays simple and 3-connected. Its representation matrix must then be
//! accepted step by step along the growth order.

use proptest::prelude::*;
use seqgraphic_kernel::{
    GraphicSequence, MinorSequence, SequenceOptions, SequenceOutcome, SparseMatrix,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Column(usize),
}

#[derive(Debug, Default, Clone, Copy)]
struct SplitStats {
    splits: usize,
    off_hub: usize,
    /// Splits moving two or more edges, a column edge among them.
    wide: usize,
}

/// Deterministic choices from a seed (splitmix64).
struct Picks(u64);

impl Picks {
    fn below(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z % bound as u64) as usize
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            items.swap(i, self.below(i + 1));
        }
    }
}

#[derive(Debug)]
struct Grown {
    num_nodes: usize,
    edges: Vec<(usize, usize, Line)>,
    num_rows: usize,
    num_columns: usize,
    rows: Vec<usize>,
    columns: Vec<usize>,
    stats: SplitStats,
}

impl Grown {
    /// Hub 0 with spokes as rows and rim edges as columns.
    fn wheel(size: usize) -> Self {
        let mut edges = Vec::new();
        for i in 0..size {
            edges.push((0, i + 1, Line::Row(i)));
            edges.push((i + 1, (i + 1) % size + 1, Line::Column(i)));
        }
        Self {
            num_nodes: size + 1,
            edges,
            num_rows: size,
            num_columns: size,
            rows: vec![size],
            columns: vec![size],
            stats: SplitStats::default(),
        }
    }

    fn grow(size: usize, seed: u64, steps: usize) -> Self {
        let mut grown = Self::wheel(size);
        let mut picks = Picks(seed);
        for _ in 0..steps {
            let grew = if picks.below(3) == 0 {
                grown.add_chord(&mut picks) || grown.split_node(&mut picks)
            } else {
                grown.split_node(&mut picks) || grown.add_chord(&mut picks)
            };
            if !grew {
                break;
            }
        }
        grown
    }

    fn adjacent(&self, a: usize, b: usize) -> bool {
        self.edges
            .iter()
            .any(|&(u, v, _)| (u, v) == (a, b) || (u, v) == (b, a))
    }

    fn push_boundary(&mut self) {
        self.rows.push(self.num_rows);
        self.columns.push(self.num_columns);
    }

    fn add_chord(&mut self, picks: &mut Picks) -> bool {
        let pairs: Vec<(usize, usize)> = (0..self.num_nodes)
            .flat_map(|a| (a + 1..self.num_nodes).map(move |b| (a, b)))
            .filter(|&(a, b)| !self.adjacent(a, b))
            .collect();
        if pairs.is_empty() {
            return false;
        }
        let (a, b) = pairs[picks.below(pairs.len())];
        self.edges.push((a, b, Line::Column(self.num_columns)));
        self.num_columns += 1;
        self.push_boundary();
        true
    }

    fn incident(&self, node: usize) -> Vec<usize> {
        (0..self.edges.len())
            .filter(|&i| self.edges[i].0 == node || self.edges[i].1 == node)
            .collect()
    }

    fn is_row(&self, edge: usize) -> bool {
        matches!(self.edges[edge].2, Line::Row(_))
    }

    fn split_node(&mut self, picks: &mut Picks) -> bool {
        let candidates: Vec<usize> = (0..self.num_nodes)
            .filter(|&node| {
                let incident = self.incident(node);
                incident.len() >= 4 && incident.iter().filter(|&&e| self.is_row(e)).count() >= 2
            })
            .collect();
        if candidates.is_empty() {
            return false;
        }
        let node = candidates[picks.below(candidates.len())];

        let mut incident = self.incident(node);
        picks.shuffle(&mut incident);
        let (rows, others): (Vec<usize>, Vec<usize>) =
            incident.into_iter().partition(|&e| self.is_row(e));
        // rows[0] stays with `node`, rows[1] moves to the sister.
        let move_row = rows[1];
        let mut rest: Vec<usize> = rows[2..].iter().copied().chain(others).collect();
        picks.shuffle(&mut rest);
        let extra = 1 + picks.below(rest.len() - 1);
        let moved: Vec<usize> = std::iter::once(move_row)
            .chain(rest.into_iter().take(extra))
            .collect();

        let sister = self.num_nodes;
        self.num_nodes += 1;
        for &edge in &moved {
            let (u, v, line) = self.edges[edge];
            self.edges[edge] = if u == node {
                (sister, v, line)
            } else {
                (u, sister, line)
            };
        }
        self.edges.push((node, sister, Line::Row(self.num_rows)));
        self.num_rows += 1;
        self.push_boundary();

        self.stats.splits += 1;
        if node != 0 {
            self.stats.off_hub += 1;
        }
        if moved.len() >= 2 && moved.iter().any(|&e| !self.is_row(e)) {
            self.stats.wide += 1;
        }
        true
    }

    /// Row `r` has a nonzero in column `c` when tree edge `r` lies on the
    /// fundamental cycle of column edge `c`.
    fn matrix(&self) -> Vec<Vec<i8>> {
        let mut tree = vec![Vec::new(); self.num_nodes];
        for &(u, v, line) in &self.edges {
            if let Line::Row(r) = line {
                tree[u].push((v, r));
                tree[v].push((u, r));
            }
        }
        let mut parent: Vec<Option<(usize, usize)>> = vec![None; self.num_nodes];
        let mut depth = vec![0usize; self.num_nodes];
        let mut seen = vec![false; self.num_nodes];
        seen[0] = true;
        let mut stack = vec![0];
        while let Some(node) = stack.pop() {
            for &(next, row) in &tree[node] {
                if !seen[next] {
                    seen[next] = true;
                    parent[next] = Some((node, row));
                    depth[next] = depth[node] + 1;
                    stack.push(next);
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "row edges must span the graph");

        let mut dense = vec![vec![0i8; self.num_columns]; self.num_rows];
        for &(u, v, line) in &self.edges {
            let Line::Column(c) = line else { continue };
            let (mut a, mut b) = (u, v);
            while a != b {
                let deeper = if depth[a] >= depth[b] { &mut a } else { &mut b };
                let (up, row) = parent[*deeper].expect("non-root node has a parent");
                dense[row][c] = 1;
                *deeper = up;
            }
        }
        dense
    }

    fn run(&self) -> SequenceOutcome {
        let matrix = SparseMatrix::from_dense(&self.matrix()).expect("grown matrix is ternary");
        let sequence =
            MinorSequence::new(self.rows.clone(), self.columns.clone()).expect("valid sequence");
        GraphicSequence::new(matrix)
            .with_options(SequenceOptions {
                certify_steps: true,
            })
            .run(&sequence)
            .unwrap_or_else(|e| panic!("run failed for {self:?}: {e}"))
    }
}

fn assert_accepted(grown: &Grown) {
    let outcome = grown.run();
    assert!(
        outcome.failure.is_none(),
        "rejected {:?} for {grown:?}",
        outcome.failure
    );
    assert_eq!(outcome.last_graphic_minor, grown.rows.len() - 1);
    let witness = outcome.witness.expect("graphic run has a witness");
    assert_eq!(witness.graph().node_count(), grown.num_nodes);
    assert_eq!(
        witness.graph().edge_count(),
        grown.num_rows + grown.num_columns
    );
}

#[test]
fn wheels_alone_are_accepted() {
    for size in 3..8 {
        assert_accepted(&Grown::wheel(size));
    }
}

#[test]
fn fixed_growths_split_away_from_the_hub() {
    let mut stats = SplitStats::default();
    for seed in 0..256 {
        let grown = Grown::grow(5, seed, 16);
        assert_accepted(&grown);
        stats.splits += grown.stats.splits;
        stats.off_hub += grown.stats.off_hub;
        stats.wide += grown.stats.wide;
    }
    assert!(stats.splits > 0);
    assert!(stats.off_hub > 0, "{stats:?}");
    assert!(stats.wide > 0, "{stats:?}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn grown_graphs_are_accepted_at_every_step(
        size in 3usize..7,
        seed in any::<u64>(),
        steps in 1usize..14,
    ) {
        let grown = Grown::grow(size, seed, steps);
        let outcome = grown.run();
        prop_assert!(outcome.failure.is_none(), "rejected {:?} for {:?}", outcome.failure, grown);
        prop_assert_eq!(outcome.last_graphic_minor, grown.rows.len() - 1);
        prop_assert!(outcome.witness.is_some());
    }
}
