use std::collections::BTreeSet;

use crate::{Distance, Edge, Instance, PointId, Result, Tour};

/// Rounded Euclidean distance between two points of `instance`.
pub fn distance(instance: &Instance, a: PointId, b: PointId) -> Result<Distance> {
    Ok(instance.get(a)?.dist(instance.get(b)?))
}

pub fn edge_length(instance: &Instance, edge: Edge) -> Result<Distance> {
    distance(instance, edge.a, edge.b)
}

/// Length of the closed tour, wrap-around edge included. Zero for tours of
/// fewer than two points.
pub fn tour_length(instance: &Instance, tour: &[PointId]) -> Result<Distance> {
    let n = tour.len();
    if n < 2 {
        for &id in tour {
            instance.get(id)?;
        }
        return Ok(0);
    }
    let coords = instance.resolve(tour)?;
    let mut sum = 0;
    for i in 0..n {
        sum += coords[i].dist(coords[(i + 1) % n]);
    }
    Ok(sum)
}

/// The `n` edges of a cyclic tour as `(previous, current)`, starting with the
/// wrap-around edge `(last, first)`.
pub fn edges_of_tour(tour: &[PointId]) -> Vec<Edge> {
    let Some(&last) = tour.last() else {
        return Vec::new();
    };
    let mut prev = last;
    tour.iter()
        .map(|&id| {
            let edge = Edge::new(prev, id);
            prev = id;
            edge
        })
        .collect()
}

pub fn normalized_edge_set(tour: &[PointId]) -> BTreeSet<Edge> {
    edges_of_tour(tour)
        .into_iter()
        .map(Edge::normalized)
        .collect()
}

/// Same cycle, visited from `start`. A tour without `start` is returned as is.
pub fn rotate_cycle(tour: &[PointId], start: PointId) -> Tour {
    let mut rotated = tour.to_vec();
    if let Some(pos) = tour.iter().position(|&id| id == start) {
        rotated.rotate_left(pos);
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::instance::{scaled_square, unit_square};
    use crate::{Error, Point};

    #[test]
    fn distance_uses_rounded_euclidean_metric() {
        let instance: Instance = [(1, Point::new(0.0, 0.0)), (2, Point::new(4.0, 3.0))]
            .into_iter()
            .collect();
        assert_eq!(distance(&instance, 1, 2).expect("known ids"), 5);
    }

    #[test]
    fn distance_fails_for_unknown_point() {
        let instance = unit_square();
        assert!(matches!(
            distance(&instance, 1, 42),
            Err(Error::UnknownPoint(42))
        ));
    }

    #[test]
    fn tour_length_closes_cycle() {
        let instance = scaled_square(10.0);
        assert_eq!(tour_length(&instance, &[1, 2, 3, 4]).expect("length"), 40);
        assert_eq!(tour_length(&instance, &[1, 3, 2, 4]).expect("length"), 48);
    }

    #[test]
    fn tour_length_is_zero_for_tiny_tours() {
        let instance = unit_square();
        assert_eq!(tour_length(&instance, &[]).expect("length"), 0);
        assert_eq!(tour_length(&instance, &[3]).expect("length"), 0);
    }

    #[test]
    fn tour_length_matches_sum_over_edges() {
        let instance: Instance = [
            (5, Point::new(0.0, 0.0)),
            (8, Point::new(7.0, 1.0)),
            (9, Point::new(3.0, 9.5)),
            (12, Point::new(-4.0, 6.0)),
            (20, Point::new(-2.0, -3.0)),
        ]
        .into_iter()
        .collect();
        let tour = [9, 5, 20, 8, 12];

        let edges = edges_of_tour(&tour);
        let summed: Distance = edges
            .iter()
            .map(|edge| edge_length(&instance, *edge).expect("edge length"))
            .sum();

        assert_eq!(edges.len(), tour.len());
        assert_eq!(tour_length(&instance, &tour).expect("length"), summed);
    }

    #[test]
    fn edges_of_tour_starts_with_wrap_around() {
        assert_eq!(
            edges_of_tour(&[1, 2, 3]),
            vec![Edge::new(3, 1), Edge::new(1, 2), Edge::new(2, 3)]
        );
        assert!(edges_of_tour(&[]).is_empty());
    }

    #[test]
    fn normalized_edge_set_ignores_direction() {
        assert_eq!(
            normalized_edge_set(&[1, 2, 3, 4]),
            normalized_edge_set(&[3, 2, 1, 4])
        );
    }

    #[test]
    fn rotate_cycle_keeps_the_edge_set() {
        let tour = [7, 3, 9, 1, 5];
        let rotated = rotate_cycle(&tour, 1);
        assert_eq!(rotated, vec![1, 5, 7, 3, 9]);
        assert_eq!(normalized_edge_set(&rotated), normalized_edge_set(&tour));
        assert_eq!(rotate_cycle(&tour, 42), tour.to_vec());
    }
}
