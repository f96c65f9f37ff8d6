//! Driver strategies layered on the engine. Each is a pure function of the
//! instance, an optional starting tour and its own config; none performs I/O.

pub mod buildup;
pub mod cohort;
pub mod dropout;
pub mod restart;
pub mod scaffold;

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    Error, Instance, Options, PointId, Result, StrategyKind, Tour, hill_climb, rotate_cycle,
    tour_length,
};

pub use cohort::CohortConfig;
pub use dropout::DropoutConfig;
pub use restart::RestartConfig;

/// Shuffled permutation of the instance ids.
pub fn random_tour(instance: &Instance, rng: &mut SmallRng) -> Tour {
    let mut tour: Tour = instance.ids().collect();
    tour.shuffle(rng);
    tour
}

/// Runs the strategy selected in `options`. Strategies that refine an existing
/// tour start from `initial` when given, otherwise from a hill-climbed
/// random tour.
pub fn run(instance: &Instance, initial: Option<&[PointId]>, options: &Options) -> Result<Tour> {
    if instance.is_empty() {
        return Err(Error::invalid_input("instance has no points"));
    }
    if let Some(tour) = initial {
        instance.validate_tour(tour)?;
    }

    log::info!(
        "strategy: start kind={} n={} seed={}",
        options.strategy,
        instance.len(),
        options.seed
    );

    let tour = match options.strategy {
        StrategyKind::TwoOpt => match initial {
            Some(tour) => hill_climb(instance, Some(tour))?,
            None => restart::run(instance, &options.restart_config())?,
        },
        StrategyKind::Dropout => dropout::run(instance, initial, &options.dropout_config())?,
        StrategyKind::Cohort => cohort::run(instance, &options.cohort_config())?,
        StrategyKind::Scaffold => {
            let start = local_optimum(instance, initial, options.seed)?;
            scaffold::run(instance, &start)?.tour
        }
        StrategyKind::Buildup => {
            let mut rng = SmallRng::seed_from_u64(options.seed);
            buildup::run(instance, &mut rng)?
        }
    };
    // Written tours start at the smallest id so runs are easy to diff.
    let tour = match instance.ids().next() {
        Some(first) => rotate_cycle(&tour, first),
        None => tour,
    };

    log::info!(
        "strategy: complete kind={} length={}",
        options.strategy,
        tour_length(instance, &tour)?
    );
    Ok(tour)
}

/// `initial` hill-climbed, or a hill-climbed random tour drawn from `seed`.
pub(crate) fn local_optimum(instance: &Instance, initial: Option<&[PointId]>, seed: u64) -> Result<Tour> {
    match initial {
        Some(tour) => hill_climb(instance, Some(tour)),
        None => {
            let mut rng = SmallRng::seed_from_u64(seed);
            let tour = random_tour(instance, &mut rng);
            hill_climb(instance, Some(&tour))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::{random_tour, run};
    use crate::geo::instance::{grid, scaled_square};
    use crate::{Instance, Options, StrategyKind, tour_length};

    #[test]
    fn random_tour_is_a_seeded_permutation() {
        let instance = grid(4);
        let mut rng = SmallRng::seed_from_u64(9);
        let tour = random_tour(&instance, &mut rng);
        instance.validate_tour(&tour).expect("permutation");

        let mut again = SmallRng::seed_from_u64(9);
        assert_eq!(random_tour(&instance, &mut again), tour);
    }

    #[test]
    fn run_every_strategy_returns_a_valid_tour() {
        let instance = grid(4);
        for &strategy in StrategyKind::ALL {
            let options = Options {
                strategy,
                restarts: 2,
                iterations: 3,
                cohort_size: 3,
                rounds: 2,
                ..Options::default()
            };
            let tour = run(&instance, None, &options).expect("strategy run");
            instance.validate_tour(&tour).expect("valid tour");
        }
    }

    #[test]
    fn run_two_opt_refines_initial_tour() {
        let instance = scaled_square(10.0);
        let tour = run(&instance, Some(&[1, 3, 2, 4]), &Options::default()).expect("run");
        assert_eq!(tour_length(&instance, &tour).expect("length"), 40);
    }

    #[test]
    fn run_output_starts_at_smallest_id() {
        let instance = grid(4);
        for &strategy in StrategyKind::ALL {
            let options = Options {
                strategy,
                seed: 29,
                restarts: 2,
                iterations: 2,
                cohort_size: 2,
                rounds: 1,
                ..Options::default()
            };
            let tour = run(&instance, None, &options).expect("strategy run");
            assert_eq!(tour.first(), Some(&1), "{strategy}");
        }
    }

    #[test]
    fn run_rejects_initial_tour_with_foreign_ids() {
        let instance = scaled_square(10.0);
        assert!(run(&instance, Some(&[1, 2, 3, 9]), &Options::default()).is_err());
    }

    #[test]
    fn run_rejects_empty_instance() {
        assert!(run(&Instance::new(), None, &Options::default()).is_err());
    }
}
