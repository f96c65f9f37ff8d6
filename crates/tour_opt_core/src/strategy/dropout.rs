//! Point dropout: remove a random subset of points, re-optimize, re-insert
//! them, and keep whatever part of the change shortens the tour. When the
//! rebuilt tour is not shorter as a whole, its difference from the original
//! is split into k-moves and the gainful ones are tried on their own or in
//! leave-one-out combinations.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    Distance, Error, Instance, KMove, PointId, Result, Tour, apply_kmove, apply_kmoves,
    hill_climb, k_moves_between, kmove_gain, min_cost_insertion, tour_length,
};

#[derive(Clone, Copy, Debug)]
pub struct DropoutConfig {
    /// A point is dropped when a draw from `0..=max_draw` is below this.
    pub threshold: u32,
    pub max_draw: u32,
    pub iterations: usize,
    pub seed: u64,
}

impl DropoutConfig {
    fn validate(&self) -> Result<()> {
        if self.threshold >= self.max_draw {
            return Err(Error::invalid_input(format!(
                "dropout threshold {} must be below max draw {}",
                self.threshold, self.max_draw
            )));
        }
        Ok(())
    }
}

/// Which acceptance rule produced a step's tour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DropoutPath {
    /// The rebuilt tour was shorter outright.
    Direct,
    /// One gainful k-move applied alone.
    SingleMove,
    /// Every k-move but one, applied jointly.
    Composite,
    /// Nothing shorter was found; the original tour is kept.
    Rejected,
}

#[derive(Clone, Debug)]
pub struct DropoutOutcome {
    pub tour: Tour,
    pub length: Distance,
    pub path: DropoutPath,
    /// k-moves between the original and rebuilt tour; zero on the direct path.
    pub kmoves: usize,
}

/// Splits `tour` into kept and dropped points, both in tour order. Fewer than
/// three kept points leaves nothing worth re-optimizing, so the split is undone.
pub fn drop_points(tour: &[PointId], cfg: &DropoutConfig, rng: &mut SmallRng) -> (Tour, Vec<PointId>) {
    let (dropped, kept): (Vec<PointId>, Tour) = tour
        .iter()
        .partition(|_| rng.random_range(0..=cfg.max_draw) < cfg.threshold);
    if kept.len() < 3 {
        return (tour.to_vec(), Vec::new());
    }
    (kept, dropped)
}

/// One dropout round over `tour`. The returned tour is never longer than
/// `tour`, and `outcome.length` is its length.
pub fn step(
    instance: &Instance,
    tour: &[PointId],
    cfg: &DropoutConfig,
    rng: &mut SmallRng,
) -> Result<DropoutOutcome> {
    cfg.validate()?;
    let original_length = tour_length(instance, tour)?;

    let (kept, dropped) = drop_points(tour, cfg, rng);
    let mut rebuilt = hill_climb(instance, Some(&kept))?;
    for &point in &dropped {
        rebuilt = min_cost_insertion(instance, &rebuilt, point)?;
    }
    let rebuilt = hill_climb(instance, Some(&rebuilt))?;
    let rebuilt_length = tour_length(instance, &rebuilt)?;
    log::debug!(
        "dropout.step: dropped={} original={original_length} rebuilt={rebuilt_length}",
        dropped.len()
    );

    if rebuilt_length < original_length {
        return Ok(DropoutOutcome {
            tour: rebuilt,
            length: rebuilt_length,
            path: DropoutPath::Direct,
            kmoves: 0,
        });
    }

    let kmoves = k_moves_between(tour, &rebuilt)?;
    let gains = kmoves
        .iter()
        .map(|kmove| kmove_gain(instance, kmove))
        .collect::<Result<Vec<Distance>>>()?;
    for (kmove, gain) in kmoves.iter().zip(&gains) {
        log::trace!("dropout.step: kmove k={} gain={gain}", kmove.k());
    }

    let accepted = match single_gainful_move(tour, &kmoves, &gains)? {
        Some((candidate, gain)) => Some((candidate, gain, DropoutPath::SingleMove)),
        None => composite_move(tour, &kmoves, &gains, original_length - rebuilt_length)?
            .map(|(candidate, gain)| (candidate, gain, DropoutPath::Composite)),
    };

    let Some((candidate, gain, path)) = accepted else {
        return Ok(DropoutOutcome {
            tour: tour.to_vec(),
            length: original_length,
            path: DropoutPath::Rejected,
            kmoves: kmoves.len(),
        });
    };

    let length = tour_length(instance, &candidate)?;
    if gain + length != original_length {
        return Err(Error::other(format!(
            "k-move gain {gain} does not account for {original_length} -> {length}"
        )));
    }
    log::debug!(
        "dropout.step: accepted path={path:?} gain={gain} kmoves={}",
        kmoves.len()
    );
    Ok(DropoutOutcome {
        tour: candidate,
        length,
        path,
        kmoves: kmoves.len(),
    })
}

/// First positive-gain move that keeps the tour a single cycle on its own.
fn single_gainful_move(
    tour: &[PointId],
    kmoves: &[KMove],
    gains: &[Distance],
) -> Result<Option<(Tour, Distance)>> {
    for (kmove, &gain) in kmoves.iter().zip(gains) {
        if gain <= 0 {
            continue;
        }
        if let Some(candidate) = apply_kmove(tour, kmove)? {
            return Ok(Some((candidate, gain)));
        }
    }
    Ok(None)
}

/// All moves except one losing move, applied jointly. `overall_gain` is the
/// summed gain of every move.
fn composite_move(
    tour: &[PointId],
    kmoves: &[KMove],
    gains: &[Distance],
    overall_gain: Distance,
) -> Result<Option<(Tour, Distance)>> {
    for (skip, &gain) in gains.iter().enumerate() {
        let remaining_gain = overall_gain - gain;
        if remaining_gain <= 0 {
            continue;
        }
        let rest: Vec<KMove> = kmoves
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != skip)
            .map(|(_, kmove)| kmove.clone())
            .collect();
        if let Some(candidate) = apply_kmoves(tour, &rest)? {
            return Ok(Some((candidate, remaining_gain)));
        }
    }
    Ok(None)
}

/// Iterates [`step`] from `initial` (or a seeded random local optimum).
#[tour_opt_derive::timer("dropout")]
pub fn run(instance: &Instance, initial: Option<&[PointId]>, cfg: &DropoutConfig) -> Result<Tour> {
    cfg.validate()?;
    let mut tour = super::local_optimum(instance, initial, cfg.seed)?;
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let start = tour_length(instance, &tour)?;

    let mut accepted = [0usize; 3];
    for iteration in 0..cfg.iterations {
        let outcome = step(instance, &tour, cfg, &mut rng)?;
        match outcome.path {
            DropoutPath::Direct => accepted[0] += 1,
            DropoutPath::SingleMove => accepted[1] += 1,
            DropoutPath::Composite => accepted[2] += 1,
            DropoutPath::Rejected => {}
        }
        log::debug!(
            "dropout: iteration={iteration} path={:?} length={}",
            outcome.path,
            outcome.length
        );
        tour = outcome.tour;
    }

    log::info!(
        "dropout: complete iterations={} start={start} length={} direct={} single={} composite={}",
        cfg.iterations,
        tour_length(instance, &tour)?,
        accepted[0],
        accepted[1],
        accepted[2]
    );
    Ok(tour)
}
