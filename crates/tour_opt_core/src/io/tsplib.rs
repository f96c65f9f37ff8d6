//! Minimal TSPLIB text support: `NODE_COORD_SECTION` instances and
//! `TOUR_SECTION` tours.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Error, Instance, Point, PointId, Result, Tour};

const NODE_COORD_SECTION: &str = "NODE_COORD_SECTION";
const TOUR_SECTION: &str = "TOUR_SECTION";
const EOF_MARKER: &str = "EOF";
const TOUR_TERMINATOR: &str = "-1";

/// Reads `id x y` lines following `NODE_COORD_SECTION` until `EOF`, a blank
/// line, or end of input.
pub fn read_instance<R: BufRead>(reader: R) -> Result<Instance> {
    let mut instance = Instance::new();
    let mut in_section = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if !in_section {
            in_section = line.contains(NODE_COORD_SECTION);
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(EOF_MARKER) {
            break;
        }

        let (id, point) = parse_coord_line(trimmed, line_no)?;
        if instance.insert(id, point).is_some() {
            return Err(Error::invalid_input(format!(
                "line {line_no}: duplicate point id {id}"
            )));
        }
    }

    if !in_section {
        return Err(Error::invalid_input(format!(
            "missing {NODE_COORD_SECTION}"
        )));
    }
    log::debug!("tsplib.read_instance: points={}", instance.len());
    Ok(instance)
}

fn parse_coord_line(line: &str, line_no: usize) -> Result<(PointId, Point)> {
    let mut fields = line.split_whitespace();
    let (Some(id), Some(x), Some(y)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Error::invalid_input(format!(
            "line {line_no}: expected `id x y`, got `{line}`"
        )));
    };

    let id = id
        .parse::<PointId>()
        .map_err(|e| Error::invalid_input(format!("line {line_no}: bad id `{id}` ({e})")))?;
    let x = parse_coord(x, line_no)?;
    let y = parse_coord(y, line_no)?;
    let point = Point::new(x, y);
    if !point.is_valid() {
        return Err(Error::invalid_input(format!(
            "line {line_no}: non-finite coordinates for point {id}"
        )));
    }
    Ok((id, point))
}

fn parse_coord(raw: &str, line_no: usize) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|e| Error::invalid_input(format!("line {line_no}: bad coordinate `{raw}` ({e})")))
}

/// Reads ids following `TOUR_SECTION` until `-1`, `EOF`, a blank line, or end
/// of input. Several ids on one line are accepted.
pub fn read_tour<R: BufRead>(reader: R) -> Result<Tour> {
    let mut tour = Tour::new();
    let mut in_section = false;

    'lines: for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if !in_section {
            in_section = line.contains(TOUR_SECTION);
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(EOF_MARKER) {
            break;
        }
        for token in trimmed.split_whitespace() {
            if token == TOUR_TERMINATOR {
                break 'lines;
            }
            let id = token.parse::<PointId>().map_err(|e| {
                Error::invalid_input(format!("line {}: bad tour id `{token}` ({e})", idx + 1))
            })?;
            tour.push(id);
        }
    }

    if !in_section {
        return Err(Error::invalid_input(format!("missing {TOUR_SECTION}")));
    }
    Ok(tour)
}

pub fn write_tour<W: Write>(mut writer: W, tour: &[PointId]) -> Result<()> {
    writeln!(writer, "{TOUR_SECTION}")?;
    for id in tour {
        writeln!(writer, "{id}")?;
    }
    writeln!(writer, "{TOUR_TERMINATOR}")?;
    writeln!(writer, "{EOF_MARKER}")?;
    writer.flush()?;
    Ok(())
}

/// Writes a `EUC_2D` instance named `name`, coordinates in shortest
/// round-trip form.
pub fn write_instance<W: Write>(mut writer: W, instance: &Instance, name: &str) -> Result<()> {
    writeln!(writer, "NAME : {name}")?;
    writeln!(writer, "TYPE : TSP")?;
    writeln!(writer, "DIMENSION : {}", instance.len())?;
    writeln!(writer, "EDGE_WEIGHT_TYPE : EUC_2D")?;
    writeln!(writer, "{NODE_COORD_SECTION}")?;
    for (id, point) in instance.iter() {
        writeln!(writer, "{id} {point}")?;
    }
    writeln!(writer, "{EOF_MARKER}")?;
    writer.flush()?;
    Ok(())
}

pub fn read_instance_file(path: &Path) -> Result<Instance> {
    read_instance(BufReader::new(open(path)?))
}

pub fn read_tour_file(path: &Path) -> Result<Tour> {
    read_tour(BufReader::new(open(path)?))
}

pub fn write_tour_file(path: &Path, tour: &[PointId]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::other(format!("failed to create tour file {}: {e}", path.display()))
    })?;
    write_tour(BufWriter::new(file), tour)
}

pub fn write_instance_file(path: &Path, instance: &Instance) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::other(format!("failed to create instance file {}: {e}", path.display()))
    })?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("instance");
    write_instance(BufWriter::new(file), instance, name)
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::invalid_input(format!("failed to open {}: {e}", path.display())))
}
