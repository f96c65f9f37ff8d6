use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;

use crate::{Distance, Error, Instance, Result, Tour, hill_climb, tour_length};

use super::random_tour;

#[derive(Clone, Copy, Debug)]
pub struct RestartConfig {
    pub restarts: usize,
    pub seed: u64,
}

/// Independent hill climbs from shuffled tours, one rng per restart seeded
/// with `seed + index`. Returns the shortest; ties go to the lowest index.
#[tour_opt_derive::timer("restart")]
pub fn run(instance: &Instance, cfg: &RestartConfig) -> Result<Tour> {
    if cfg.restarts == 0 {
        return Err(Error::invalid_input("restarts must be > 0"));
    }

    let results: Vec<(Distance, usize, Tour)> = (0..cfg.restarts)
        .into_par_iter()
        .map(|idx| -> Result<(Distance, usize, Tour)> {
            let mut rng = SmallRng::seed_from_u64(cfg.seed.wrapping_add(idx as u64));
            let start = random_tour(instance, &mut rng);
            let tour = hill_climb(instance, Some(&start))?;
            let length = tour_length(instance, &tour)?;
            log::debug!("restart: idx={idx} length={length}");
            Ok((length, idx, tour))
        })
        .collect::<Result<_>>()?;

    let (length, idx, tour) = results
        .into_iter()
        .min_by_key(|(length, idx, _)| (*length, *idx))
        .ok_or_else(|| Error::other("no restart produced a tour"))?;
    log::info!(
        "restart: best idx={idx} length={length} restarts={}",
        cfg.restarts
    );
    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::{RestartConfig, run};
    use crate::geo::instance::grid;
    use crate::{hill_climb, tour_length};

    #[test]
    fn run_is_reproducible_for_a_seed() {
        let instance = grid(5);
        let cfg = RestartConfig {
            restarts: 4,
            seed: 11,
        };
        let first = run(&instance, &cfg).expect("restart run");
        let second = run(&instance, &cfg).expect("restart run");
        assert_eq!(first, second);
        instance.validate_tour(&first).expect("valid tour");
    }

    #[test]
    fn run_result_is_a_local_optimum() {
        let instance = grid(4);
        let cfg = RestartConfig {
            restarts: 3,
            seed: 5,
        };
        let tour = run(&instance, &cfg).expect("restart run");
        let climbed = hill_climb(&instance, Some(&tour)).expect("hill climb");
        assert_eq!(
            tour_length(&instance, &climbed).expect("length"),
            tour_length(&instance, &tour).expect("length")
        );
    }

    #[test]
    fn more_restarts_never_lengthen_the_best_tour() {
        let instance = grid(5);
        let few = run(&instance, &RestartConfig { restarts: 1, seed: 3 }).expect("run");
        let many = run(&instance, &RestartConfig { restarts: 6, seed: 3 }).expect("run");
        assert!(
            tour_length(&instance, &many).expect("length")
                <= tour_length(&instance, &few).expect("length")
        );
    }

    #[test]
    fn run_rejects_zero_restarts() {
        let instance = grid(3);
        let err = run(&instance, &RestartConfig { restarts: 0, seed: 1 })
            .expect_err("zero restarts");
        assert!(err.to_string().contains("restarts must be > 0"));
    }
}
