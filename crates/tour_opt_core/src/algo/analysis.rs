//! 2-opt usefulness of edges.
//!
//! Edge `(a, b)` is useless when some third point `c` has no partner `d` for
//! which keeping `(a, b)` and `(c, d)` is strictly shorter than one of the two
//! reconnections `(a, c) + (b, d)` or `(a, d) + (b, c)`. On three points every
//! edge is useless, since `c` has no partner at all.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{Distance, Edge, Instance, Point, PointId, Result, WeightedEdge, geometry, mst};

/// All point pairs of an instance split by [`is_useless_edge`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeUsefulness {
    pub useful: Vec<Edge>,
    pub useless: Vec<Edge>,
}

impl EdgeUsefulness {
    /// Per rounded length: `(useful, useless)` edge counts.
    pub fn by_length(&self, instance: &Instance) -> Result<BTreeMap<Distance, (usize, usize)>> {
        let mut histogram: BTreeMap<Distance, (usize, usize)> = BTreeMap::new();
        for edge in &self.useful {
            histogram.entry(geometry::edge_length(instance, *edge)?).or_default().0 += 1;
        }
        for edge in &self.useless {
            histogram.entry(geometry::edge_length(instance, *edge)?).or_default().1 += 1;
        }
        Ok(histogram)
    }
}

pub fn total_edge_count(instance: &Instance) -> usize {
    let n = instance.len();
    n * n.saturating_sub(1) / 2
}

pub fn is_useless_edge(instance: &Instance, edge: Edge) -> Result<bool> {
    let points: Vec<(PointId, Point)> = instance.iter().collect();
    Ok(useless_among(
        &points,
        instance.get(edge.a)?,
        instance.get(edge.b)?,
        edge,
    ))
}

fn useless_among(points: &[(PointId, Point)], a: Point, b: Point, edge: Edge) -> bool {
    let ab = a.dist(b);
    for &(c_id, c) in points {
        if edge.touches(c_id) {
            continue;
        }
        let (ac, bc) = (a.dist(c), b.dist(c));
        let keeps_ab = points.iter().any(|&(d_id, d)| {
            if edge.touches(d_id) || d_id == c_id {
                return false;
            }
            let kept = ab + c.dist(d);
            kept < ac + b.dist(d) || kept < a.dist(d) + bc
        });
        if !keeps_ab {
            return true;
        }
    }
    false
}

/// Classifies every point pair. Quartic in the number of points.
#[tour_opt_derive::timer("analysis.classify_edges")]
pub fn classify_edges(instance: &Instance) -> Result<EdgeUsefulness> {
    let points: Vec<(PointId, Point)> = instance.iter().collect();
    let pairs: Vec<(usize, usize)> = (0..points.len())
        .flat_map(|i| ((i + 1)..points.len()).map(move |j| (i, j)))
        .collect();

    let flags = pairs
        .par_iter()
        .map(|&(i, j)| {
            let edge = Edge::new(points[i].0, points[j].0);
            useless_among(&points, points[i].1, points[j].1, edge)
        })
        .collect::<Vec<bool>>();

    let mut usefulness = EdgeUsefulness::default();
    for (&(i, j), useless) in pairs.iter().zip(flags) {
        let edge = Edge::new(points[i].0, points[j].0);
        if useless {
            usefulness.useless.push(edge);
        } else {
            usefulness.useful.push(edge);
        }
    }
    log::debug!(
        "analysis.classify_edges: total={} useful={} useless={}",
        pairs.len(),
        usefulness.useful.len(),
        usefulness.useless.len()
    );
    Ok(usefulness)
}

/// Mean rounded length of `edges`, or of every point pair when `edges` is
/// empty. Zero when there is nothing to average.
pub fn average_edge_length(instance: &Instance, edges: &[Edge]) -> Result<f64> {
    if !edges.is_empty() {
        let mut sum: Distance = 0;
        for edge in edges {
            sum += geometry::edge_length(instance, *edge)?;
        }
        return Ok(sum as f64 / edges.len() as f64);
    }

    let count = total_edge_count(instance);
    if count == 0 {
        return Ok(0.0);
    }
    let points: Vec<Point> = instance.iter().map(|(_, point)| point).collect();
    let sum: Distance = points
        .iter()
        .enumerate()
        .flat_map(|(i, a)| points[(i + 1)..].iter().map(move |b| a.dist(*b)))
        .sum();
    Ok(sum as f64 / count as f64)
}

/// MST edges that no improving 2-opt move can keep.
#[tour_opt_derive::timer("analysis.useless_mst_edges")]
pub fn useless_mst_edges(instance: &Instance) -> Result<Vec<WeightedEdge>> {
    let points: Vec<(PointId, Point)> = instance.iter().collect();
    let mut useless = Vec::new();
    for candidate in mst(instance)? {
        let edge = candidate.edge();
        if useless_among(&points, instance.get(edge.a)?, instance.get(edge.b)?, edge) {
            log::debug!("analysis: useless mst edge={edge} length={}", candidate.distance);
            useless.push(candidate);
        }
    }
    Ok(useless)
}
