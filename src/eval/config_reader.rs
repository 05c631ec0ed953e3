use crate::eval::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE_PATH: &str = "evaluations.db";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "avaliacoes_kite_for_life.csv";

/// Optional settings, read from a JSON file. Every key may be omitted.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(rename = "databasePath")]
    pub database_path: Option<String>,
    #[serde(rename = "exportFileName")]
    pub export_file_name: Option<String>,
    #[serde(rename = "csvDelimiter")]
    pub csv_delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl EvalConfig {
    pub fn database_path(&self) -> String {
        self.database_path
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    pub fn export_file_name(&self) -> String {
        self.export_file_name
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPORT_FILE_NAME.to_string())
    }

    pub fn csv_delimiter(&self) -> EvalResult<u8> {
        match self.csv_delimiter.as_deref() {
            None => Ok(b','),
            Some(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            Some(s) => InvalidDelimiterSnafu { delimiter: s }.fail(),
        }
    }
}

pub fn read_config(path: &str) -> EvalResult<EvalConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: EvalConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a summary previously written in JSON format.
pub fn read_summary(path: &str) -> EvalResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.database_path(), "evaluations.db");
        assert_eq!(config.export_file_name(), "avaliacoes_kite_for_life.csv");
        assert_eq!(config.csv_delimiter().unwrap(), b',');
    }

    #[test]
    fn partial_file() {
        let config: EvalConfig =
            serde_json::from_str(r#"{"databasePath": "/tmp/kite.db", "csvDelimiter": ";"}"#).unwrap();
        assert_eq!(config.database_path(), "/tmp/kite.db");
        assert_eq!(config.csv_delimiter().unwrap(), b';');
        assert_eq!(config.excel_worksheet_name, None);
    }

    #[test]
    fn bad_delimiter() {
        let config = EvalConfig {
            csv_delimiter: Some("::".to_string()),
            ..EvalConfig::default()
        };
        assert!(matches!(
            config.csv_delimiter(),
            Err(EvalError::InvalidDelimiter { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_config("/nonexistent/kiteval.json"),
            Err(EvalError::OpeningJson { .. })
        ));
    }
}
