//! Tour optimization for the Euclidean TSP: rounded-distance geometry, 2-opt
//! local search, Kruskal MST, min-cost insertion, and decomposition of tour
//! differences into independently applicable k-moves.
//! Driver strategies (restart, dropout, cohort, scaffold, buildup), 2-opt
//! edge usefulness analysis and a TSPLIB reader/writer are built on the same
//! primitives.

mod algo;
mod error;
mod geo;
mod io;
pub mod logging;
mod point;
pub mod strategy;
mod tour;

pub(crate) use geo::geometry;
pub(crate) use io::options;

pub use algo::analysis::{
    EdgeUsefulness, average_edge_length, classify_edges, is_useless_edge, total_edge_count,
    useless_mst_edges,
};
pub use algo::insertion::min_cost_insertion;
pub use algo::kmove::{
    KMove, apply_kmove, apply_kmoves, disjoint_edge_sets, k_moves_between, kmove_gain,
    tour_difference,
};
pub use algo::mst::{WeightedEdge, degree_histogram, mst, total_cost};
pub use algo::two_opt::{hill_climb, improve};
pub use error::{Error, Result};
pub use geo::edge::Edge;
pub use geo::geometry::{
    distance, edge_length, edges_of_tour, normalized_edge_set, rotate_cycle, tour_length,
};
pub use geo::instance::Instance;
pub use geo::midpoint::{add_midpoint, add_midpoints};
pub use io::options::{LogFormat, LogLevel, Options, StrategyKind};
pub use io::tsplib::{
    read_instance, read_instance_file, read_tour, read_tour_file, write_instance,
    write_instance_file, write_tour, write_tour_file,
};
pub use point::{Distance, Point, PointId};
pub use tour::{Tour, TourMetrics};
