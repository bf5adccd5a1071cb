mod common;
mod energy;
mod occupancy;
pub mod schema;
mod temperature;
mod water;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::errors::ParserError;
use crate::model::{SensorKind, TransformSummary};
use crate::reference::RoomReference;

use energy::EnergyRows;
use occupancy::OccupancyRows;
use temperature::TemperatureRows;
use water::WaterRows;

pub(crate) use common::{decimal_point, field, first_floor, hour_key, min_width, HeaderIndex, SeenKeys};

/// One sensor kind's row rewrite, bound to the column layout of a source header.
pub(crate) trait RowTransformer: Sized {
    const NAME: &'static str;
    const KIND: SensorKind;

    fn bind(header: &HeaderIndex) -> Result<Self, ParserError>;

    /// Rows too short to hold every resolved column are dropped.
    fn min_width(&self) -> usize;

    /// Output fields for one source row, or `None` to drop it.
    fn rewrite(&mut self, record: &StringRecord, rooms: &RoomReference) -> Option<Vec<String>>;
}

/// Stream `input` into `output` using the transformer for `kind`.
pub fn transform<R: Read, W: Write>(
    kind: SensorKind,
    input: R,
    output: W,
    rooms: &RoomReference,
) -> Result<TransformSummary, ParserError> {
    match kind {
        SensorKind::Temperature => run::<TemperatureRows, _, _>(input, output, rooms),
        SensorKind::Water => run::<WaterRows, _, _>(input, output, rooms),
        SensorKind::Energy => run::<EnergyRows, _, _>(input, output, rooms),
        SensorKind::Occupancy => run::<OccupancyRows, _, _>(input, output, rooms),
    }
}

/// Rewrite `source` into `target`, truncating any existing target file.
pub fn transform_file(
    kind: SensorKind,
    source: &Path,
    target: &Path,
    rooms: &RoomReference,
) -> Result<TransformSummary, ParserError> {
    let parser = kind.as_str();
    let input = File::open(source).map_err(|source_err| ParserError::Io {
        parser,
        path: source.display().to_string(),
        source: source_err,
    })?;
    let output = File::create(target).map_err(|source_err| ParserError::Io {
        parser,
        path: target.display().to_string(),
        source: source_err,
    })?;
    transform(kind, BufReader::new(input), BufWriter::new(output), rooms)
}

fn run<T: RowTransformer, R: Read, W: Write>(
    input: R,
    output: W,
    rooms: &RoomReference,
) -> Result<TransformSummary, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let header = reader
        .headers()
        .map_err(|err| ParserError::csv(T::NAME, err))?
        .clone();
    if header.is_empty() {
        return Err(ParserError::EmptyFile { parser: T::NAME });
    }

    let mut rows = T::bind(&HeaderIndex::new(header))?;
    let width = rows.min_width();

    let mut writer = WriterBuilder::new().from_writer(output);
    writer
        .write_record(schema::output_columns(T::KIND))
        .map_err(|err| ParserError::csv(T::NAME, err))?;

    let mut summary = TransformSummary {
        kind: T::KIND,
        rows_read: 0,
        rows_written: 0,
    };
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) => {
                summary.rows_read += 1;
                continue;
            }
            Err(err) => return Err(ParserError::csv(T::NAME, err)),
        }
        summary.rows_read += 1;

        if record.len() < width {
            continue;
        }
        let Some(fields) = rows.rewrite(&record, rooms) else {
            continue;
        };
        writer
            .write_record(&fields)
            .map_err(|err| ParserError::csv(T::NAME, err))?;
        summary.rows_written += 1;
    }

    writer
        .flush()
        .map_err(|err| ParserError::csv(T::NAME, err.into()))?;
    Ok(summary)
}
