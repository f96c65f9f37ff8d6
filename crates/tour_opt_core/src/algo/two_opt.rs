use crate::{Instance, Point, PointId, Result, Tour, geometry};

/// First improving 2-opt pair `(i, j)` over resolved coordinates, scanning `i`
/// outer and `j` inner. Reversing `tour[i + 1..=j]` replaces edges `(a, b)`
/// and `(c, d)` with `(a, c)` and `(b, d)`.
fn first_improving_pair(coords: &[Point]) -> Option<(usize, usize)> {
    let n = coords.len();
    for i in 0..n {
        // For i == 0 the pair (0, n - 1) shares the wrap-around edge.
        let j_end = if i > 0 { n } else { n.saturating_sub(1) };
        let a = coords[i];
        let b = coords[(i + 1) % n];
        let ab = a.dist(b);
        for j in (i + 2)..j_end {
            let c = coords[j];
            let d = coords[(j + 1) % n];
            if a.dist(c) + b.dist(d) < ab + c.dist(d) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Returns the tour after the first strictly improving 2-opt move, or `None`
/// if `tour` is already 2-opt optimal.
pub fn improve(instance: &Instance, tour: &[PointId]) -> Result<Option<Tour>> {
    let coords = instance.resolve(tour)?;
    Ok(first_improving_pair(&coords).map(|(i, j)| {
        let mut improved = tour.to_vec();
        improved[(i + 1)..=j].reverse();
        improved
    }))
}

/// Applies [`improve`] until no improving move remains. Without a starting
/// tour the instance ids are visited in ascending order.
#[tour_opt_derive::timer("two_opt.hill_climb")]
pub fn hill_climb(instance: &Instance, tour: Option<&[PointId]>) -> Result<Tour> {
    let mut tour: Tour = match tour {
        Some(tour) => tour.to_vec(),
        None => instance.ids().collect(),
    };
    let mut coords = instance.resolve(&tour)?;
    let initial = geometry::tour_length(instance, &tour)?;

    let mut improvements = 0usize;
    while let Some((i, j)) = first_improving_pair(&coords) {
        tour[(i + 1)..=j].reverse();
        coords[(i + 1)..=j].reverse();
        improvements += 1;
    }

    let length = geometry::tour_length(instance, &tour)?;
    log::debug!(
        "two_opt.hill_climb: complete n={} improvements={improvements} initial={initial} length={length}",
        tour.len()
    );
    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::instance::{scaled_square, unit_square};

    fn scattered() -> Instance {
        [
            (1, Point::new(0.0, 0.0)),
            (2, Point::new(40.0, 5.0)),
            (3, Point::new(12.0, 33.0)),
            (4, Point::new(55.0, 41.0)),
            (5, Point::new(8.0, 70.0)),
            (6, Point::new(63.0, 2.0)),
            (7, Point::new(30.0, 52.0)),
            (8, Point::new(77.0, 66.0)),
            (9, Point::new(21.0, 14.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn improve_uncrosses_square() {
        let instance = scaled_square(10.0);
        let improved = improve(&instance, &[1, 3, 2, 4])
            .expect("resolve")
            .expect("crossed tour should improve");
        assert_eq!(improved, vec![1, 2, 3, 4]);
    }

    #[test]
    fn improve_takes_first_improving_pair() {
        // (0, 2) is the first improving pair in scan order.
        let instance: Instance = [
            (1, Point::new(0.0, 0.0)),
            (2, Point::new(10.0, 10.0)),
            (3, Point::new(0.0, 10.0)),
            (4, Point::new(10.0, 0.0)),
            (5, Point::new(20.0, 10.0)),
            (6, Point::new(20.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let tour = [1, 2, 3, 4, 5, 6];

        let improved = improve(&instance, &tour)
            .expect("resolve")
            .expect("tour has crossings");
        assert_eq!(improved, vec![1, 3, 2, 4, 5, 6]);
    }

    #[test]
    fn improve_returns_none_at_local_optimum() {
        let instance = scaled_square(10.0);
        assert!(improve(&instance, &[1, 2, 3, 4]).expect("resolve").is_none());
    }

    #[test]
    fn improve_handles_tiny_tours() {
        let instance = unit_square();
        assert!(improve(&instance, &[]).expect("resolve").is_none());
        assert!(improve(&instance, &[1]).expect("resolve").is_none());
        assert!(improve(&instance, &[1, 2, 3]).expect("resolve").is_none());
    }

    #[test]
    fn improve_never_lengthens_tour() {
        let instance = scattered();
        let mut tour: Tour = vec![5, 2, 8, 1, 4, 9, 3, 6, 7];
        while let Some(next) = improve(&instance, &tour).expect("resolve") {
            let before = geometry::tour_length(&instance, &tour).expect("length");
            let after = geometry::tour_length(&instance, &next).expect("length");
            assert!(after < before);
            tour = next;
        }
    }

    #[test]
    fn hill_climb_reaches_perimeter_on_unit_square() {
        let instance = unit_square();
        let tour = hill_climb(&instance, Some(&[1, 3, 2, 4])).expect("climb");
        assert_eq!(geometry::tour_length(&instance, &tour).expect("length"), 4);
        instance.validate_tour(&tour).expect("permutation");
    }

    #[test]
    fn hill_climb_output_is_two_opt_optimal() {
        let instance = scattered();
        let tour = hill_climb(&instance, Some(&[5, 2, 8, 1, 4, 9, 3, 6, 7])).expect("climb");

        instance.validate_tour(&tour).expect("permutation");
        assert!(improve(&instance, &tour).expect("resolve").is_none());
    }

    #[test]
    fn hill_climb_defaults_to_ascending_ids() {
        let instance = scattered();
        let from_default = hill_climb(&instance, None).expect("climb");
        let explicit: Vec<PointId> = instance.ids().collect();
        let from_explicit = hill_climb(&instance, Some(&explicit)).expect("climb");
        assert_eq!(from_default, from_explicit);
    }

    #[test]
    fn hill_climb_rejects_unknown_points() {
        let instance = unit_square();
        assert!(hill_climb(&instance, Some(&[1, 2, 7])).is_err());
    }
}
