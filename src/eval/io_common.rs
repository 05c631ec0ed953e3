use std::path::Path;

use crate::eval::*;

/// The file formats that can be imported.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    /// Uses the explicit input type if provided, otherwise looks at the file extension.
    /// Unknown extensions are read as CSV.
    pub fn resolve(path: &str, explicit: Option<&str>) -> EvalResult<InputType> {
        match explicit.map(|s| s.to_lowercase()) {
            Some(s) if s == "csv" => Ok(InputType::Csv),
            Some(s) if s == "xlsx" || s == "excel" => Ok(InputType::Xlsx),
            Some(s) => UnknownInputTypeSnafu { input_type: s }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") | Some("xlsm") => Ok(InputType::Xlsx),
                    _ => Ok(InputType::Csv),
                }
            }
        }
    }
}

/// A row of an input file, with its position in the file.
#[derive(PartialEq, Debug, Clone)]
pub struct InputRow {
    /// 1-based row number, the header being row 1. CSV files count records,
    /// worksheets use the row of the sheet.
    pub row: u64,
    pub cells: RawRow,
}

/// Adds a cell to a row. When a header appears twice, the first column is kept.
pub fn insert_cell(row: &mut RawRow, header: &str, cell: CellValue) {
    row.entry(header.to_string()).or_insert(cell);
}

pub fn is_blank_row(row: &RawRow) -> bool {
    row.values().all(|c| *c == CellValue::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_type_from_extension() {
        assert_eq!(InputType::resolve("a/b/team.csv", None).unwrap(), InputType::Csv);
        assert_eq!(InputType::resolve("team.XLSX", None).unwrap(), InputType::Xlsx);
        assert_eq!(InputType::resolve("team.txt", None).unwrap(), InputType::Csv);
        assert_eq!(InputType::resolve("team.csv", Some("xlsx")).unwrap(), InputType::Xlsx);
        assert!(InputType::resolve("team.csv", Some("ods")).is_err());
    }

    #[test]
    fn duplicate_headers_keep_first_column() {
        let mut row = RawRow::new();
        insert_cell(&mut row, "nome", CellValue::Text("Ana".to_string()));
        insert_cell(&mut row, "nome", CellValue::Text("Rui".to_string()));
        assert_eq!(row.get("nome"), Some(&CellValue::Text("Ana".to_string())));
        assert!(!is_blank_row(&row));
        assert!(is_blank_row(&RawRow::new()));
    }
}
