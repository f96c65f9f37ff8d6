use crate::{Edge, Error, Instance, PointId, Result};

/// Adds a point halfway along `edge` under id `max + 1` and returns that id.
pub fn add_midpoint(instance: &mut Instance, edge: Edge) -> Result<PointId> {
    let a = instance.get(edge.a)?;
    let b = instance.get(edge.b)?;
    let new_id = match instance.max_id() {
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::other(format!("no point id left after {max}")))?,
        None => return Err(Error::UnknownPoint(edge.a)),
    };
    instance.insert(new_id, a.midpoint(b));
    Ok(new_id)
}

/// Applies [`add_midpoint`] per edge; ids are returned in edge order.
pub fn add_midpoints(instance: &mut Instance, edges: &[Edge]) -> Result<Vec<PointId>> {
    edges
        .iter()
        .map(|edge| add_midpoint(instance, *edge))
        .collect()
}

impl Instance {
    /// Copy of this instance augmented with edge midpoints, plus the new ids.
    /// `self` is left untouched.
    pub fn with_midpoints(&self, edges: &[Edge]) -> Result<(Instance, Vec<PointId>)> {
        let mut augmented = self.clone();
        let ids = add_midpoints(&mut augmented, edges)?;
        Ok((augmented, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use crate::geo::instance::scaled_square;

    #[test]
    fn add_midpoint_allocates_id_above_max() {
        let mut instance: Instance = [(3, Point::new(0.0, 0.0)), (11, Point::new(4.0, 2.0))]
            .into_iter()
            .collect();

        let id = add_midpoint(&mut instance, Edge::new(3, 11)).expect("midpoint");

        assert_eq!(id, 12);
        assert_eq!(instance.get(12).expect("new point"), Point::new(2.0, 1.0));
        assert_eq!(instance.len(), 3);
    }

    #[test]
    fn add_midpoints_returns_ids_in_edge_order() {
        let mut instance = scaled_square(10.0);
        let ids = add_midpoints(&mut instance, &[Edge::new(1, 2), Edge::new(3, 4)])
            .expect("midpoints");

        assert_eq!(ids, vec![5, 6]);
        assert_eq!(instance.get(5).expect("point"), Point::new(0.0, 5.0));
        assert_eq!(instance.get(6).expect("point"), Point::new(10.0, 5.0));
    }

    #[test]
    fn add_midpoint_rejects_unknown_endpoint() {
        let mut instance = scaled_square(10.0);
        let err = add_midpoint(&mut instance, Edge::new(1, 9)).expect_err("unknown endpoint");
        assert!(matches!(err, Error::UnknownPoint(9)));
        assert_eq!(instance.len(), 4);
    }

    #[test]
    fn with_midpoints_leaves_original_untouched() {
        let instance = scaled_square(10.0);
        let (augmented, ids) = instance
            .with_midpoints(&[Edge::new(2, 3)])
            .expect("midpoints");

        assert_eq!(instance.len(), 4);
        assert_eq!(augmented.len(), 5);
        assert_eq!(ids, vec![5]);
        assert_eq!(augmented.get(5).expect("point"), Point::new(5.0, 10.0));
    }
}
