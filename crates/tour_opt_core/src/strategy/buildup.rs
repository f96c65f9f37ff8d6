use rand::rngs::SmallRng;

use crate::{Instance, Result, Tour, hill_climb, min_cost_insertion};

use super::random_tour;

const SEED_TOUR_SIZE: usize = 4;

/// Incremental construction: start from the last few points of a shuffled
/// order, then alternate a hill climb with inserting the next point at its
/// cheapest position. Ends with a final hill climb over the full tour.
#[tour_opt_derive::timer("buildup")]
pub fn run(instance: &Instance, rng: &mut SmallRng) -> Result<Tour> {
    let mut remaining = random_tour(instance, rng);
    let split = remaining.len().saturating_sub(SEED_TOUR_SIZE);
    let mut tour = remaining.split_off(split);

    while let Some(point) = remaining.pop() {
        tour = hill_climb(instance, Some(&tour))?;
        tour = min_cost_insertion(instance, &tour, point)?;
        log::trace!("buildup: size={}", tour.len());
    }

    let tour = hill_climb(instance, Some(&tour))?;
    log::debug!("buildup: complete n={}", tour.len());
    Ok(tour)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::run;
    use crate::geo::instance::{grid, scaled_square};
    use crate::{hill_climb, tour_length};

    #[test]
    fn run_covers_every_point_once() {
        let instance = grid(5);
        let mut rng = SmallRng::seed_from_u64(2);
        let tour = run(&instance, &mut rng).expect("buildup");
        instance.validate_tour(&tour).expect("valid tour");
    }

    #[test]
    fn run_ends_at_a_local_optimum() {
        let instance = grid(4);
        let mut rng = SmallRng::seed_from_u64(6);
        let tour = run(&instance, &mut rng).expect("buildup");
        let climbed = hill_climb(&instance, Some(&tour)).expect("hill climb");
        assert_eq!(climbed, tour);
    }

    #[test]
    fn run_handles_instances_at_or_below_seed_size() {
        let instance = scaled_square(10.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let tour = run(&instance, &mut rng).expect("buildup");
        assert_eq!(tour_length(&instance, &tour).expect("length"), 40);
    }

    #[test]
    fn run_is_reproducible_for_a_seed() {
        let instance = grid(4);
        let first = run(&instance, &mut SmallRng::seed_from_u64(12)).expect("buildup");
        let second = run(&instance, &mut SmallRng::seed_from_u64(12)).expect("buildup");
        assert_eq!(first, second);
    }
}
