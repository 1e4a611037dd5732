use crate::error::{EngineError, Result};
use csv::{ReaderBuilder, StringRecord};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};

pub struct CandleCsvParser;

impl CandleCsvParser {
    // CSV Header: timestamp,open,high,low,close,volume
    // Example Row: 1717200000000,67450.5,67502.0,67390.1,67480.2,152.37
    // Columns are matched by header name (case-insensitive), so extra columns are ignored.
    pub fn load_candles_from_csv(file_path: &str) -> Result<Vec<Candle>> {
        let file = File::open(file_path)?;
        let candles = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %file_path, count = candles.len(), "Parsed candle CSV");
        Ok(candles)
    }

    /// Parses candles from any reader. Newest-first input is returned oldest-first.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut candles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let timestamp_str = Self::required_field(&record, &headers, "timestamp", line)?;
            let timestamp_ms = timestamp_str.parse::<i64>().map_err(|e| {
                EngineError::CsvDataFormatError(format!(
                    "Error parsing 'timestamp' at line {}: '{}': {}",
                    line, timestamp_str, e
                ))
            })?;

            let open = Self::number_field(&record, &headers, "open", line)?;
            let high = Self::number_field(&record, &headers, "high", line)?;
            let low = Self::number_field(&record, &headers, "low", line)?;
            let close = Self::number_field(&record, &headers, "close", line)?;
            let volume = Self::number_field(&record, &headers, "volume", line)?;

            let candle = Candle::from_millis(timestamp_ms, open, high, low, close, volume).ok_or_else(|| {
                EngineError::CsvDataFormatError(format!("Timestamp out of range at line {}: {}", line, timestamp_ms))
            })?;
            candles.push(candle);
        }

        if candles.len() > 1 && candles[0].timestamp > candles[candles.len() - 1].timestamp {
            candles.reverse();
        }
        Ok(candles)
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' field in CSV record at line {}", name, line)))
    }

    fn number_field(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::required_field(record, headers, name, line)?;
        raw.parse::<f64>().map_err(|e| {
            EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: '{}': {}", name, line, raw, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_candles_from_csv_valid_data() {
        let csv_content = "\
timestamp,open,high,low,close,volume
1717200000000,67450.5,67502.0,67390.1,67480.2,152.37
1717200900000,67480.2,67555.0,67470.0,67530.0,98.1";
        let tmp_file = create_test_csv(csv_content);
        let candles = CandleCsvParser::load_candles_from_csv(tmp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp_millis(), 1717200000000);
        assert_eq!(candles[0].open, 67450.5);
        assert_eq!(candles[0].high, 67502.0);
        assert_eq!(candles[0].low, 67390.1);
        assert_eq!(candles[0].close, 67480.2);
        assert_eq!(candles[0].volume, 152.37);
        assert_eq!(candles[1].close, 67530.0);
    }

    #[test]
    fn test_newest_first_is_reversed() {
        let csv_content = "\
timestamp,open,high,low,close,volume
1717200900000,2,2,2,2,1
1717200000000,1,1,1,1,1";
        let candles = CandleCsvParser::from_reader(csv_content.as_bytes()).unwrap();
        assert_eq!(candles[0].close, 1.0);
        assert_eq!(candles[1].close, 2.0);
    }

    #[test]
    fn test_columns_matched_by_name() {
        let csv_content = "\
Volume,Close,Low,High,Open,Timestamp,symbol
5,10.5,10,11,10.2,1717200000000,BTCUSDT";
        let candles = CandleCsvParser::from_reader(csv_content.as_bytes()).unwrap();
        assert_eq!(candles[0].close, 10.5);
        assert_eq!(candles[0].volume, 5.0);
    }

    #[test]
    fn test_load_candles_from_csv_empty_file() {
        let tmp_file = create_test_csv("timestamp,open,high,low,close,volume");
        let candles = CandleCsvParser::load_candles_from_csv(tmp_file.path().to_str().unwrap()).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_load_candles_from_csv_missing_field() {
        let csv_content = "\
timestamp,open,high,low,close
1717200000000,1,2,0.5,1.5";
        let result = CandleCsvParser::from_reader(csv_content.as_bytes());
        assert!(result.unwrap_err().to_string().contains("Missing 'volume' field"));
    }

    #[test]
    fn test_load_candles_from_csv_invalid_data_format() {
        let csv_content = "\
timestamp,open,high,low,close,volume
1717200000000,invalid,2,0.5,1.5,10";
        let err = CandleCsvParser::from_reader(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Error parsing 'open' at line 2"));
    }

    #[test]
    fn test_ragged_row_is_csv_system_error() {
        let csv_content = "\
timestamp,open,high,low,close,volume
1717200000000,1,2";
        let err = CandleCsvParser::from_reader(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::CsvSystemError { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CandleCsvParser::load_candles_from_csv("non_existent_file.csv").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
