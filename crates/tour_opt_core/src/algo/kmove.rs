//! Decomposition of the difference between two tours into independent
//! edge-swap bundles ("k-moves"), gain scoring, and cycle reconstruction
//! after applying a subset of them.
//!
//! Both tours must cover the same points. A k-move is one connected component
//! of `deleted ∪ added`; within a component every point loses as many edges as
//! it gains, so each move keeps degrees balanced on its own. Whether it also
//! keeps the tour a single cycle is only known after reconstruction, which is
//! why [`apply_kmove`] can return `None`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{Distance, Edge, Error, Instance, PointId, Result, Tour, geometry};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KMove {
    pub deleted: Vec<Edge>,
    pub added: Vec<Edge>,
}

impl KMove {
    /// Number of exchanged edges (deleted and added counts are equal).
    pub fn k(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.added.is_empty()
    }

    /// Distinct points touched by the move, ascending.
    pub fn points(&self) -> BTreeSet<PointId> {
        self.deleted
            .iter()
            .chain(&self.added)
            .flat_map(|edge| edge.endpoints())
            .collect()
    }
}

/// Normalized edges of `old_tour` missing from `new_tour`, and vice versa,
/// each sorted ascending.
pub fn tour_difference(old_tour: &[PointId], new_tour: &[PointId]) -> Result<(Vec<Edge>, Vec<Edge>)> {
    ensure_same_points(old_tour, new_tour)?;

    let old_edges = geometry::normalized_edge_set(old_tour);
    let new_edges = geometry::normalized_edge_set(new_tour);
    let deleted: Vec<Edge> = old_edges.difference(&new_edges).copied().collect();
    let added: Vec<Edge> = new_edges.difference(&old_edges).copied().collect();

    if deleted.len() != added.len() {
        return Err(Error::UnequalDifference {
            deleted: deleted.len(),
            added: added.len(),
        });
    }
    Ok((deleted, added))
}

fn ensure_same_points(old_tour: &[PointId], new_tour: &[PointId]) -> Result<()> {
    let old_points: HashSet<PointId> = old_tour.iter().copied().collect();
    let new_points: HashSet<PointId> = new_tour.iter().copied().collect();
    if old_points.len() != old_tour.len() || new_points.len() != new_tour.len() {
        return Err(Error::malformed_tour("tour visits a point twice"));
    }
    if old_points != new_points {
        return Err(Error::malformed_tour(format!(
            "tours cover different points ({} vs {})",
            old_tour.len(),
            new_tour.len()
        )));
    }
    Ok(())
}

/// Splits a combined `deleted ∪ added` edge collection into its connected
/// components. Every touched point must have degree 2 or 4 in the collection.
/// Components are ordered by their smallest point; edges within a component
/// are sorted.
pub fn disjoint_edge_sets(edges: &[Edge]) -> Result<Vec<Vec<Edge>>> {
    let mut incident: BTreeMap<PointId, Vec<usize>> = BTreeMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        for point in edge.endpoints() {
            incident.entry(point).or_default().push(idx);
        }
    }
    for (&point, edge_idxs) in &incident {
        let degree = edge_idxs.len();
        if degree != 2 && degree != 4 {
            return Err(Error::DegreeViolation {
                point,
                degree,
                context: "tour difference",
            });
        }
    }

    let mut visited_points: HashSet<PointId> = HashSet::with_capacity(incident.len());
    let mut used_edges = vec![false; edges.len()];
    let mut components = Vec::new();

    for &root in incident.keys() {
        if !visited_points.insert(root) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![root];
        while let Some(point) = stack.pop() {
            for &idx in &incident[&point] {
                if used_edges[idx] {
                    continue;
                }
                used_edges[idx] = true;
                let edge = edges[idx];
                component.push(edge);
                if let Some(next) = edge.other(point)
                    && visited_points.insert(next)
                {
                    stack.push(next);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    Ok(components)
}

/// Independent k-moves that together turn `old_tour` into `new_tour`.
pub fn k_moves_between(old_tour: &[PointId], new_tour: &[PointId]) -> Result<Vec<KMove>> {
    let (deleted, added) = tour_difference(old_tour, new_tour)?;
    let deleted_set: HashSet<Edge> = deleted.iter().copied().collect();

    let mut combined = deleted;
    combined.extend_from_slice(&added);

    let mut kmoves = Vec::new();
    for component in disjoint_edge_sets(&combined)? {
        let (deleted, added): (Vec<Edge>, Vec<Edge>) = component
            .into_iter()
            .partition(|edge| deleted_set.contains(edge));
        if deleted.len() != added.len() {
            return Err(Error::UnequalDifference {
                deleted: deleted.len(),
                added: added.len(),
            });
        }
        kmoves.push(KMove { deleted, added });
    }

    log::trace!(
        "kmove.decompose: n={} kmoves={} sizes={:?}",
        old_tour.len(),
        kmoves.len(),
        kmoves.iter().map(KMove::k).collect::<Vec<_>>()
    );
    Ok(kmoves)
}

/// Length removed minus length added; positive means the move shortens the
/// tour it was derived from.
pub fn kmove_gain(instance: &Instance, kmove: &KMove) -> Result<Distance> {
    let mut gain = 0;
    for edge in &kmove.deleted {
        gain += geometry::edge_length(instance, *edge)?;
    }
    for edge in &kmove.added {
        gain -= geometry::edge_length(instance, *edge)?;
    }
    Ok(gain)
}

/// Applies one k-move to `tour` on its own. `None` means the result splits
/// into more than one cycle.
pub fn apply_kmove(tour: &[PointId], kmove: &KMove) -> Result<Option<Tour>> {
    apply_kmoves(tour, std::slice::from_ref(kmove))
}

/// Applies several k-moves jointly against the edges of `tour` and rebuilds
/// the visiting order. `None` means the combined edge set is not a single
/// Hamiltonian cycle.
pub fn apply_kmoves(tour: &[PointId], kmoves: &[KMove]) -> Result<Option<Tour>> {
    let n = tour.len();
    if kmoves.iter().all(KMove::is_empty) {
        return Ok(Some(tour.to_vec()));
    }
    if n < 3 {
        return Err(Error::malformed_tour(format!(
            "cannot exchange edges of a {n}-point tour"
        )));
    }

    let mut edges = geometry::normalized_edge_set(tour);
    let mut touched: BTreeSet<PointId> = BTreeSet::new();
    for kmove in kmoves {
        for edge in &kmove.deleted {
            if !edges.remove(&edge.normalized()) {
                return Err(Error::malformed_tour(format!(
                    "deleted edge {edge} is not in the tour"
                )));
            }
            touched.extend(edge.endpoints());
        }
    }
    for kmove in kmoves {
        for edge in &kmove.added {
            if !edges.insert(edge.normalized()) {
                return Err(Error::malformed_tour(format!(
                    "added edge {edge} is already in the tour"
                )));
            }
            touched.extend(edge.endpoints());
        }
    }

    let mut adjacency: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
    for edge in &edges {
        adjacency.entry(edge.a).or_default().push(edge.b);
        adjacency.entry(edge.b).or_default().push(edge.a);
    }
    for &point in &touched {
        let degree = adjacency.get(&point).map_or(0, Vec::len);
        if degree != 2 {
            return Err(Error::DegreeViolation {
                point,
                degree,
                context: "k-move application",
            });
        }
    }

    Ok(walk_cycle(tour, &adjacency))
}

/// Follows the degree-2 adjacency from `tour[0]`, preferring the original
/// direction. `None` if the walk closes before visiting every point.
fn walk_cycle(tour: &[PointId], adjacency: &BTreeMap<PointId, Vec<PointId>>) -> Option<Tour> {
    let n = tour.len();
    let start = tour[0];
    let neighbors = adjacency.get(&start)?;
    let first = if neighbors.contains(&tour[1]) {
        tour[1]
    } else {
        neighbors[0]
    };

    let mut walked = Vec::with_capacity(n);
    walked.push(start);
    let mut prev = start;
    let mut current = first;
    while current != start {
        if walked.len() == n {
            return None;
        }
        walked.push(current);
        let next = adjacency
            .get(&current)?
            .iter()
            .copied()
            .find(|&p| p != prev)?;
        prev = current;
        current = next;
    }

    (walked.len() == n).then_some(walked)
}
