use hashbrown::HashSet;
use itertools::izip;
use log::{
    debug,
    warn,
};
use polars::prelude::*;

use crate::data_structs::coords::{
    Contig,
    GenomicPosition,
};
use crate::data_structs::typedef::PosType;
use crate::error::{
    ConversionError,
    Result,
};
use crate::io::table::{
    coordinate_cols,
    TableBackend,
    CHR_COL,
    END_COL,
    START_COL,
};

/// Derives one width-1 position per table row, in row order.
///
/// Each `(chr, start, end)` interval is resized to its terminal base.
/// Rows are never merged: row `i` of every matrix built from the same table
/// corresponds to position `i`.
pub fn build_positions(table: &dyn TableBackend) -> Result<Vec<GenomicPosition>> {
    let names = coordinate_cols().map(String::from);
    let frame = table.slice_columns(&names)?;
    positions_from_frame(&frame)
}

/// Same as [`build_positions`] for an already sliced `chr`/`start`/`end`
/// frame.
pub fn positions_from_frame(frame: &DataFrame) -> Result<Vec<GenomicPosition>> {
    let chr = frame
        .column(CHR_COL)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let start = coordinate_column(frame, START_COL)?;
    let end = coordinate_column(frame, END_COL)?;

    let mut positions: Vec<GenomicPosition> = Vec::with_capacity(frame.height());
    for (row, (chr, start, end)) in
        izip!(chr.str()?.into_iter(), start.f64()?, end.f64()?).enumerate()
    {
        let chr = chr.ok_or_else(|| malformed(row, "missing chromosome"))?;
        let start = parse_position(row, START_COL, start)?;
        let end = parse_position(row, END_COL, end)?;
        let contig: Contig = Contig::try_new(chr.into(), start, end)
            .map_err(|e| malformed(row, &e.to_string()))?;
        positions.push(contig.terminal_base());
    }

    let n_unique = positions.iter().collect::<HashSet<_>>().len();
    if n_unique != positions.len() {
        warn!(
            "{} rows share a genomic position with an earlier row",
            positions.len() - n_unique
        );
    }
    debug!("Derived {} positions", positions.len());
    Ok(positions)
}

fn coordinate_column(
    frame: &DataFrame,
    name: &str,
) -> Result<Series> {
    Ok(frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?)
}

fn parse_position(
    row: usize,
    name: &str,
    value: Option<f64>,
) -> Result<PosType> {
    let value =
        value.ok_or_else(|| malformed(row, &format!("non-numeric {}", name)))?;
    if value.fract() != 0.0 || value < 0.0 || value > PosType::MAX as f64 {
        return Err(malformed(
            row,
            &format!("{} {} is not a valid position", name, value),
        ));
    }
    Ok(value as PosType)
}

fn malformed(
    row: usize,
    reason: &str,
) -> ConversionError {
    ConversionError::MalformedCoordinate {
        row,
        reason: reason.to_string(),
    }
}
