use std::io::{self, BufReader};
use std::time::Instant;

use log::info;

use tour_opt_core::{
    Options, Result, TourMetrics, average_edge_length, logging, read_instance, read_instance_file,
    read_tour_file, strategy, total_edge_count, useless_mst_edges, write_instance_file, write_tour,
    write_tour_file,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = Options::from_args()?;
    logging::init_logger(&options)?;
    info!("options: {options}");

    let instance = match options.input_path() {
        Some(path) => read_instance_file(path)?,
        None => read_instance(BufReader::new(io::stdin().lock()))?,
    };
    let initial = options.initial_tour_path().map(read_tour_file).transpose()?;
    info!(
        "input: n={} initial_tour={}",
        instance.len(),
        initial.is_some()
    );

    if let Some(path) = options.instance_output_path() {
        write_instance_file(path, &instance)?;
        info!("instance written: path={}", path.display());
    }

    if options.report_useless_edges {
        let useless = useless_mst_edges(&instance)?;
        info!(
            "edges: total={} avg_length={:.1} useless_mst={}",
            total_edge_count(&instance),
            average_edge_length(&instance, &[])?,
            useless.len()
        );
        for edge in &useless {
            info!("useless mst edge: {}-{} length={}", edge.a, edge.b, edge.distance);
        }
    }

    let tour = strategy::run(&instance, initial.as_deref(), &options)?;

    match options.output_path() {
        Some(path) => write_tour_file(path, &tour)?,
        None => write_tour(io::stdout().lock(), &tour)?,
    }

    TourMetrics::measure(&instance, &tour)?;
    info!(
        "output: n={} time={:.2}s",
        tour.len(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
