use std::collections::{BTreeMap, HashSet};

use crate::{Distance, Edge, Error, Instance, PointId, Result};

/// MST edge with its length. Ordering is `(distance, a, b)` with `a < b`,
/// which is the Kruskal processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeightedEdge {
    pub distance: Distance,
    pub a: PointId,
    pub b: PointId,
}

impl WeightedEdge {
    pub fn edge(self) -> Edge {
        Edge::new(self.a, self.b)
    }
}

/// Every pair of instance points, sorted ascending by `(distance, min, max)`.
fn sorted_candidates(instance: &Instance) -> Vec<WeightedEdge> {
    let points: Vec<_> = instance.iter().collect();
    let n = points.len();
    let mut candidates = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        let (a, pa) = points[i];
        for &(b, pb) in &points[(i + 1)..] {
            let edge = Edge::new(a, b).normalized();
            candidates.push(WeightedEdge {
                distance: pa.dist(pb),
                a: edge.a,
                b: edge.b,
            });
        }
    }
    candidates.sort_unstable();
    candidates
}

/// Kruskal's algorithm over the complete graph of the instance. Components are
/// kept as plain point sets and merged by scanning; candidate generation is
/// quadratic anyway.
#[tour_opt_derive::timer("mst")]
pub fn mst(instance: &Instance) -> Result<Vec<WeightedEdge>> {
    let n = instance.len();
    let target = n.saturating_sub(1);
    let mut sets: Vec<HashSet<PointId>> = Vec::new();
    let mut tree = Vec::with_capacity(target);

    for candidate in sorted_candidates(instance) {
        if tree.len() == target {
            break;
        }
        let (a, b) = (candidate.a, candidate.b);

        let mut found = Vec::with_capacity(2);
        let mut cyclic = false;
        for (idx, set) in sets.iter().enumerate() {
            let has_a = set.contains(&a);
            let has_b = set.contains(&b);
            if has_a && has_b {
                cyclic = true;
                break;
            }
            if has_a || has_b {
                found.push(idx);
            }
        }
        if cyclic {
            continue;
        }

        match found.as_slice() {
            [] => sets.push(HashSet::from([a, b])),
            [idx] => {
                sets[*idx].insert(a);
                sets[*idx].insert(b);
            }
            [first, second] => {
                let merged = sets.swap_remove(*second);
                sets[*first].extend(merged);
            }
            _ => {
                return Err(Error::other(format!(
                    "mst: edge {a}-{b} touches {} components",
                    found.len()
                )));
            }
        }
        tree.push(candidate);
    }

    if n >= 2 {
        let covered: HashSet<PointId> = tree.iter().flat_map(|e| [e.a, e.b]).collect();
        if covered.len() != n || tree.len() != target {
            return Err(Error::SpanningFailure {
                covered: covered.len(),
                expected: n,
            });
        }
    }

    log::debug!(
        "mst: complete n={n} edges={} cost={}",
        tree.len(),
        total_cost(&tree)
    );
    Ok(tree)
}

pub fn total_cost(edges: &[WeightedEdge]) -> Distance {
    edges.iter().map(|e| e.distance).sum()
}

/// Groups points by their degree in `edges`.
pub fn degree_histogram(edges: &[Edge]) -> BTreeMap<usize, Vec<PointId>> {
    let mut degrees: BTreeMap<PointId, usize> = BTreeMap::new();
    for edge in edges {
        for point in edge.endpoints() {
            *degrees.entry(point).or_default() += 1;
        }
    }
    let mut histogram: BTreeMap<usize, Vec<PointId>> = BTreeMap::new();
    for (point, degree) in degrees {
        histogram.entry(degree).or_default().push(point);
    }
    histogram
}
