use std::collections::BTreeSet;

use crate::{
    Distance, Edge, Instance, PointId, Result, Tour, degree_histogram, hill_climb, min_cost_insertion,
    mst, normalized_edge_set, tour_length,
};

#[derive(Clone, Debug)]
pub struct ScaffoldOutcome {
    pub tour: Tour,
    /// Length of the tour passed in.
    pub initial_length: Distance,
    /// Length of the hill-climbed tour through the midpoints.
    pub augmented_length: Distance,
    pub length: Distance,
    pub midpoints: usize,
}

/// MST edges of `instance` that `tour` does not use, normalized.
pub fn missing_mst_edges(instance: &Instance, tour: &[PointId]) -> Result<Vec<Edge>> {
    let tour_edges = normalized_edge_set(tour);
    let tree: Vec<Edge> = mst(instance)?.into_iter().map(|e| e.edge()).collect();

    let histogram = degree_histogram(&tree);
    let branch_points: usize = histogram
        .range(3..)
        .map(|(_, points)| points.len())
        .sum();
    log::debug!("scaffold: mst edges={} branch_points={branch_points}", tree.len());

    Ok(tree
        .into_iter()
        .filter(|edge| !tour_edges.contains(edge))
        .collect())
}

/// Pulls `tour` out of its local optimum by routing it through the midpoints
/// of the MST edges it lacks, re-optimizing, then removing those midpoints
/// and re-optimizing over the original points. The result may be longer than
/// `tour`; callers compare the lengths.
#[tour_opt_derive::timer("scaffold")]
pub fn run(instance: &Instance, tour: &[PointId]) -> Result<ScaffoldOutcome> {
    instance.validate_tour(tour)?;
    let initial_length = tour_length(instance, tour)?;

    let new_edges = missing_mst_edges(instance, tour)?;
    let (augmented, midpoint_ids) = instance.with_midpoints(&new_edges)?;
    log::debug!(
        "scaffold: midpoints={} augmented_n={}",
        midpoint_ids.len(),
        augmented.len()
    );
    if log::log_enabled!(log::Level::Trace) {
        for (&id, edge) in midpoint_ids.iter().zip(&new_edges) {
            log::trace!("scaffold: midpoint id={id} edge={edge} at={}", augmented.get(id)?);
        }
    }

    let visited: BTreeSet<PointId> = tour.iter().copied().collect();
    let mut scaffolded = tour.to_vec();
    for id in augmented.ids().filter(|id| !visited.contains(id)) {
        scaffolded = min_cost_insertion(&augmented, &scaffolded, id)?;
    }
    let scaffolded = hill_climb(&augmented, Some(&scaffolded))?;
    let augmented_length = tour_length(&augmented, &scaffolded)?;

    let midpoints: BTreeSet<PointId> = midpoint_ids.iter().copied().collect();
    let reduced: Tour = scaffolded
        .into_iter()
        .filter(|id| !midpoints.contains(id))
        .collect();
    let tour = hill_climb(instance, Some(&reduced))?;
    let length = tour_length(instance, &tour)?;

    log::info!(
        "scaffold: complete midpoints={} initial={initial_length} augmented={augmented_length} length={length}",
        midpoints.len()
    );
    Ok(ScaffoldOutcome {
        tour,
        initial_length,
        augmented_length,
        length,
        midpoints: midpoints.len(),
    })
}
