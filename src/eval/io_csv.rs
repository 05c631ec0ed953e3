// Primitives for reading CSV files.

use std::io::Read;

use crate::eval::{
    io_common::{insert_cell, InputRow},
    *,
};

pub fn read_csv_rows(path: &str, delimiter: u8) -> EvalResult<Vec<InputRow>> {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_rows(rdr)
}

/// Reads every record of a CSV source with a header row.
///
/// Short records are padded with empty cells. A record with more fields than
/// the header, or any other malformed content, fails the whole read. Empty
/// lines are skipped by the reader and do not count as rows.
pub fn read_rows<R: Read>(mut rdr: csv::Reader<R>) -> EvalResult<Vec<InputRow>> {
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1u64 })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    debug!("read_rows: headers: {:?}", headers);

    let mut res: Vec<InputRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is row 1
        let lineno = idx as u64 + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        ensure!(
            line.len() <= headers.len(),
            CsvTooManyFieldsSnafu {
                lineno,
                found: line.len(),
                expected: headers.len(),
            }
        );
        let mut cells = RawRow::new();
        for (pos, header) in headers.iter().enumerate() {
            let cell = match line.get(pos) {
                Some(field) if !field.is_empty() => CellValue::Text(field.to_string()),
                _ => CellValue::Empty,
            };
            insert_cell(&mut cells, header, cell);
        }
        debug!("read_rows: lineno: {:?} row: {:?}", lineno, cells);
        res.push(InputRow { row: lineno, cells });
    }
    Ok(res)
}
