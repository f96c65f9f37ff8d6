use crate::{Distance, Instance, PointId, Result};

/// Visiting order over instance points; the closing edge back to the first
/// point is implicit.
pub type Tour = Vec<PointId>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub n: usize,
    pub total: Distance,
    pub longest: Distance,
    pub average: f64,
}

impl TourMetrics {
    pub fn measure(instance: &Instance, tour: &[PointId]) -> Result<Self> {
        let n = tour.len();
        if n < 2 {
            log::info!("metrics: n={n} so there's nothing to report");
            return Ok(Self {
                n,
                ..Self::default()
            });
        }

        let coords = instance.resolve(tour)?;
        let distances: Vec<Distance> = (0..n)
            .map(|i| coords[i].dist(coords[(i + 1) % n]))
            .collect();
        let total: Distance = distances.iter().sum();
        let longest = distances.iter().copied().max().unwrap_or(0);
        let average = total as f64 / n as f64;

        log::info!("metrics: n={n} total={total} longest={longest} avg={average:.1}");

        Ok(Self {
            n,
            total,
            longest,
            average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TourMetrics;
    use crate::Point;
    use crate::geo::instance::scaled_square;

    #[test]
    fn measure_reports_total_longest_and_average() {
        let mut instance = scaled_square(10.0);
        instance.insert(5, Point::new(30.0, 0.0));

        let metrics = TourMetrics::measure(&instance, &[1, 2, 3, 5, 4]).expect("metrics");

        assert_eq!(metrics.n, 5);
        assert_eq!(metrics.total, 10 + 10 + 22 + 20 + 10);
        assert_eq!(metrics.longest, 22);
        assert!((metrics.average - 14.4).abs() < 1e-9);
    }

    #[test]
    fn measure_is_empty_for_tiny_tours() {
        let instance = scaled_square(10.0);
        let metrics = TourMetrics::measure(&instance, &[2]).expect("metrics");
        assert_eq!(metrics.n, 1);
        assert_eq!(metrics.total, 0);
    }
}
