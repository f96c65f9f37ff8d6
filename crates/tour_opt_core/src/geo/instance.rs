use std::collections::{BTreeMap, HashSet};

use crate::{Error, Point, PointId, Result};

/// Problem instance: point id to coordinates. Iteration is ascending by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Instance {
    points: BTreeMap<PointId, Point>,
}

impl Instance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the coordinates previously stored under `id`, if any.
    pub fn insert(&mut self, id: PointId, point: Point) -> Option<Point> {
        self.points.insert(id, point)
    }

    pub fn get(&self, id: PointId) -> Result<Point> {
        self.points.get(&id).copied().ok_or(Error::UnknownPoint(id))
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, Point)> + '_ {
        self.points.iter().map(|(id, point)| (*id, *point))
    }

    pub fn max_id(&self) -> Option<PointId> {
        self.points.last_key_value().map(|(id, _)| *id)
    }

    /// Resolves every id of `tour` to its coordinates, in tour order.
    pub fn resolve(&self, tour: &[PointId]) -> Result<Vec<Point>> {
        tour.iter().map(|id| self.get(*id)).collect()
    }

    /// Checks that `tour` visits every point of the instance exactly once.
    pub fn validate_tour(&self, tour: &[PointId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(tour.len());
        for &id in tour {
            if !self.contains(id) {
                return Err(Error::UnknownPoint(id));
            }
            if !seen.insert(id) {
                return Err(Error::malformed_tour(format!("point {id} is visited twice")));
            }
        }
        if seen.len() != self.len() {
            return Err(Error::malformed_tour(format!(
                "tour visits {} of {} points",
                seen.len(),
                self.len()
            )));
        }
        Ok(())
    }
}

impl FromIterator<(PointId, Point)> for Instance {
    fn from_iter<I: IntoIterator<Item = (PointId, Point)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
pub(crate) fn unit_square() -> Instance {
    [
        (1, Point::new(0.0, 0.0)),
        (2, Point::new(0.0, 1.0)),
        (3, Point::new(1.0, 1.0)),
        (4, Point::new(1.0, 0.0)),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
pub(crate) fn scaled_square(side: f64) -> Instance {
    [
        (1, Point::new(0.0, 0.0)),
        (2, Point::new(0.0, side)),
        (3, Point::new(side, side)),
        (4, Point::new(side, 0.0)),
    ]
    .into_iter()
    .collect()
}

/// `side x side` lattice with spacing 10, ids row-major from 1.
#[cfg(test)]
pub(crate) fn grid(side: u32) -> Instance {
    (0..side * side)
        .map(|i| {
            let x = f64::from(i % side) * 10.0;
            let y = f64::from(i / side) * 10.0;
            (i + 1, Point::new(x, y))
        })
        .collect()
}
