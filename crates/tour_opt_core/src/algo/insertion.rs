use crate::{Distance, Error, Instance, PointId, Result, Tour};

/// Splices `new_point` into the tour edge whose split cost
/// `d(p, a) + d(p, b) - d(a, b)` is smallest. Ties go to the first edge in
/// traversal order, starting with the wrap-around edge `(last, first)`.
pub fn min_cost_insertion(instance: &Instance, tour: &[PointId], new_point: PointId) -> Result<Tour> {
    let n = tour.len();
    if n == 0 {
        return Err(Error::malformed_tour("cannot insert into a tour without edges"));
    }
    if tour.contains(&new_point) {
        return Err(Error::malformed_tour(format!(
            "point {new_point} is already in the tour"
        )));
    }

    let p = instance.get(new_point)?;
    let coords = instance.resolve(tour)?;

    // Edge k joins tour[k - 1] and tour[k]; k = 0 is the wrap-around edge.
    let mut best: Option<(usize, Distance)> = None;
    for k in 0..n {
        let a = coords[(k + n - 1) % n];
        let b = coords[k];
        let cost = p.dist(a) + p.dist(b) - a.dist(b);
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((k, cost));
        }
    }

    let mut inserted = Vec::with_capacity(n + 1);
    match best {
        Some((0, _)) | None => {
            inserted.extend_from_slice(tour);
            inserted.push(new_point);
        }
        Some((k, _)) => {
            inserted.extend_from_slice(&tour[..k]);
            inserted.push(new_point);
            inserted.extend_from_slice(&tour[k..]);
        }
    }
    Ok(inserted)
}
