//! Cohort recombination: a pool of distinct local optima where each member is
//! improved by the gainful k-moves it differs by from the others.

use std::collections::HashSet;

use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;

use crate::{
    Distance, Error, Instance, KMove, PointId, Result, Tour, apply_kmove, apply_kmoves,
    hill_climb, k_moves_between, kmove_gain, normalized_edge_set, tour_length,
};

use super::random_tour;

#[derive(Clone, Copy, Debug)]
pub struct CohortConfig {
    pub cohort_size: usize,
    pub rounds: usize,
    pub seed: u64,
}

type Member = (Distance, Tour);

/// Same cycle, regardless of start point or direction.
pub fn is_dupe(tour: &[PointId], other: &[PointId]) -> bool {
    tour.len() == other.len() && normalized_edge_set(tour) == normalized_edge_set(other)
}

/// Improves `best` with the positive-gain k-moves that separate it from
/// `new_tour`. All of them are applied jointly first; if that fragments the
/// cycle, single moves are tried by descending gain. Returns a tour only if
/// it is strictly shorter than `best`.
pub fn integrate_tour(instance: &Instance, best: &[PointId], new_tour: &[PointId]) -> Result<Option<Tour>> {
    let mut gainful: Vec<(Distance, KMove)> = Vec::new();
    for kmove in k_moves_between(best, new_tour)? {
        let gain = kmove_gain(instance, &kmove)?;
        if gain > 0 {
            gainful.push((gain, kmove));
        }
    }
    if gainful.is_empty() {
        return Ok(None);
    }

    let best_length = tour_length(instance, best)?;
    let moves: Vec<KMove> = gainful.iter().map(|(_, kmove)| kmove.clone()).collect();
    if let Some(joint) = apply_kmoves(best, &moves)?
        && tour_length(instance, &joint)? < best_length
    {
        log::trace!("cohort.integrate: joint moves={}", moves.len());
        return Ok(Some(joint));
    }

    gainful.sort_by(|a, b| b.0.cmp(&a.0));
    for (gain, kmove) in &gainful {
        if let Some(single) = apply_kmove(best, kmove)? {
            log::trace!("cohort.integrate: single k={} gain={gain}", kmove.k());
            return Ok(Some(single));
        }
    }
    Ok(None)
}

fn contains_dupe(members: &[Member], tour: &[PointId]) -> bool {
    members.iter().any(|(_, other)| is_dupe(other, tour))
}

/// Stable sort by length, then drop later copies of the same cycle.
fn sort_and_dedup(members: &mut Vec<Member>) {
    members.sort_by_key(|(length, _)| *length);
    let mut seen = HashSet::new();
    members.retain(|(_, tour)| seen.insert(normalized_edge_set(tour)));
}

fn member(instance: &Instance, tour: Tour) -> Result<Member> {
    Ok((tour_length(instance, &tour)?, tour))
}

/// Hill-climbs a fresh random tour and integrates it into every member.
fn try_new_tour(instance: &Instance, members: &mut Vec<Member>, rng: &mut SmallRng) -> Result<()> {
    let start = random_tour(instance, rng);
    let fresh = hill_climb(instance, Some(&start))?;

    let improved = members
        .par_iter()
        .map(|(_, best)| integrate_tour(instance, best, &fresh))
        .collect::<Result<Vec<_>>>()?;
    for tour in improved.into_iter().flatten() {
        if !contains_dupe(members, &tour) {
            members.push(member(instance, tour)?);
        }
    }
    members.push(member(instance, fresh)?);
    sort_and_dedup(members);
    Ok(())
}

/// Integrates every ordered pair `(i, j)`, `i < j`, of the current members.
fn clique_combine(instance: &Instance, members: &mut Vec<Member>, cohort_size: usize) -> Result<()> {
    let n = members.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let combined = pairs
        .par_iter()
        .map(|&(i, j)| integrate_tour(instance, &members[i].1, &members[j].1))
        .collect::<Result<Vec<_>>>()?;
    for tour in combined.into_iter().flatten() {
        if !contains_dupe(members, &tour) {
            members.push(member(instance, tour)?);
        }
    }

    members.sort_by_key(|(length, _)| *length);
    members.truncate(cohort_size);
    sort_and_dedup(members);
    Ok(())
}

/// Grows and recombines the cohort for `cfg.rounds` rounds and returns its
/// shortest member.
#[tour_opt_derive::timer("cohort")]
pub fn run(instance: &Instance, cfg: &CohortConfig) -> Result<Tour> {
    if cfg.cohort_size == 0 {
        return Err(Error::invalid_input("cohort-size must be > 0"));
    }
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let mut members: Vec<Member> = Vec::with_capacity(cfg.cohort_size + 1);

    for round in 0..cfg.rounds.max(1) {
        try_new_tour(instance, &mut members, &mut rng)?;
        clique_combine(instance, &mut members, cfg.cohort_size)?;
        if let Some((best, _)) = members.first() {
            log::debug!("cohort: round={round} members={} best={best}", members.len());
        }
    }

    let (length, tour) = members
        .into_iter()
        .next()
        .ok_or_else(|| Error::other("cohort is empty"))?;
    log::info!("cohort: complete rounds={} length={length}", cfg.rounds);
    Ok(tour)
}
