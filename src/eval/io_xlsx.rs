// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, Timelike};

use crate::eval::{
    io_common::{insert_cell, is_blank_row, InputRow},
    *,
};

/// Reads the rows of a worksheet. The first row holds the headers.
///
/// Blank rows are read as rows of empty cells, except at the end of the
/// worksheet where they only pad the used range.
pub fn read_xlsx_rows(path: &str, worksheet_name: Option<&str>) -> EvalResult<Vec<InputRow>> {
    let wrange = get_range(path, worksheet_name)?;
    // 1-based worksheet row of the header
    let header_row = wrange.start().map(|(row, _)| row as u64 + 1).unwrap_or(1);

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let headers: Vec<Option<String>> = header.iter().map(header_name).collect();
    debug!("read_xlsx_rows: header: {:?}", headers);

    let mut res: Vec<InputRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let mut cells = RawRow::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if let Some(h) = header {
                insert_cell(&mut cells, h, read_cell(cell));
            }
        }
        let row_number = header_row + idx as u64 + 1;
        debug!("read_xlsx_rows: row: {:?} cells: {:?}", row_number, cells);
        res.push(InputRow {
            row: row_number,
            cells,
        });
    }
    trim_trailing_blank_rows(&mut res);
    Ok(res)
}

// Cells holding only a formula error widen the used range without a value.
fn trim_trailing_blank_rows(rows: &mut Vec<InputRow>) {
    while rows.last().map_or(false, |r| is_blank_row(&r.cells)) {
        rows.pop();
    }
}

// Headers are usually strings, but a numeric header is still a usable name.
fn header_name(cell: &DataType) -> Option<String> {
    match read_cell(cell) {
        CellValue::Empty => None,
        c => Some(c.to_text()),
    }
}

fn read_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        DataType::DateTime(serial) => CellValue::Text(excel_date(*serial)),
        // Formula errors such as #N/A
        DataType::Error(_) => CellValue::Empty,
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    }
}

/// Converts an Excel serial date (days since 1899-12-30) to ISO-8601.
fn excel_date(serial: f64) -> String {
    let millis = (serial * 86_400_000.0).round() as i64;
    let converted = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|d| d.checked_add_signed(Duration::milliseconds(millis)));
    match converted {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.date().format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> EvalResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using the only worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_workbook(path: &std::path::Path, sheets: &[&str]) {
        let mut workbook = Workbook::new();
        for name in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();
            worksheet.write_string(0, 0, "NOME").unwrap();
            worksheet.write_string(0, 1, "Water Start").unwrap();
            worksheet.write_string(0, 2, "PRANCHA ESQ/DIR").unwrap();
            worksheet.write_string(1, 0, "Ana").unwrap();
            worksheet.write_number(1, 1, 72.5).unwrap();
            worksheet.write_string(1, 2, "n/a").unwrap();
            worksheet.write_string(3, 0, "Rui").unwrap();
            worksheet.write_number(3, 2, 40.0).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn reads_single_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.xlsx");
        write_workbook(&path, &["Avaliações"]);

        let rows = read_xlsx_rows(&path.display().to_string(), None).unwrap();
        // The blank row between Ana and Rui is kept
        assert_eq!(rows.len(), 3);
        let numbers: Vec<u64> = rows.iter().map(|r| r.row).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        let drafts: Vec<EvaluationDraft> = rows.iter().map(|r| reconcile_row(&r.cells)).collect();
        assert_eq!(drafts[0].name, "Ana");
        assert_eq!(drafts[0].scores.get(Criterion::WaterStart), Some(72.5));
        assert_eq!(drafts[0].scores.get(Criterion::BoardLeftRight), None);
        assert_eq!(drafts[1].name, "");
        assert_eq!(drafts[1].project, DEFAULT_PROJECT);
        assert_eq!(drafts[2].name, "Rui");
        assert_eq!(drafts[2].scores.get(Criterion::BoardLeftRight), Some(40.0));
    }

    #[test]
    fn several_worksheets_need_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.xlsx");
        write_workbook(&path, &["2023", "2024"]);
        let p = path.display().to_string();

        assert!(matches!(
            read_xlsx_rows(&p, None),
            Err(EvalError::AmbiguousWorksheet { .. })
        ));
        assert!(matches!(
            read_xlsx_rows(&p, Some("2022")),
            Err(EvalError::MissingWorksheet { .. })
        ));
        assert_eq!(read_xlsx_rows(&p, Some("2024")).unwrap().len(), 3);
    }

    #[test]
    fn only_trailing_blank_rows_are_dropped() {
        let row = |number: u64, name: Option<&str>| {
            let mut cells = RawRow::new();
            let cell = match name {
                Some(n) => CellValue::Text(n.to_string()),
                None => CellValue::Empty,
            };
            cells.insert("nome".to_string(), cell);
            InputRow {
                row: number,
                cells,
            }
        };
        let mut rows = vec![
            row(2, Some("Ana")),
            row(3, None),
            row(4, Some("Rui")),
            row(5, None),
            row(6, None),
        ];
        trim_trailing_blank_rows(&mut rows);
        let numbers: Vec<u64> = rows.iter().map(|r| r.row).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(excel_date(45292.0), "2024-01-01");
        assert_eq!(excel_date(45292.5), "2024-01-01T12:00:00");
    }
}
