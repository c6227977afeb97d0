//! CSV candle files: one `<SYMBOL>.csv` per symbol in a directory.
//!
//! Header: `timestamp,open,high,low,close,volume`. The timestamp column holds
//! either integer Unix milliseconds or an RFC 3339 date-time.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use regimelab_core::{Candle, CandleSeries, CandleSource, SourceError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Unix millis from either integer millis or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| format!("timestamp {raw:?} is neither millis nor RFC 3339: {e}"))
}

/// Parse candles from any CSV reader. `symbol` is only used in errors.
pub fn read_candles<R: std::io::Read>(symbol: &str, reader: R) -> Result<CandleSeries, SourceError> {
    let malformed = |message: String| SourceError::Malformed {
        symbol: symbol.to_string(),
        message,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut candles = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| malformed(format!("row {}: {e}", line + 1)))?;
        let timestamp =
            parse_timestamp(&row.timestamp).map_err(|e| malformed(format!("row {}: {e}", line + 1)))?;
        candles.push(Candle::new(
            timestamp, row.open, row.high, row.low, row.close, row.volume,
        ));
    }

    CandleSeries::new(candles).map_err(|e| malformed(e.to_string()))
}

/// Write a series in the same format `read_candles` accepts (millis timestamps).
pub fn write_candles<W: Write>(series: &CandleSeries, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for c in series.candles() {
        wtr.write_record([
            c.timestamp.to_string(),
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
            c.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    dir: PathBuf,
}

impl CsvCandleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Every symbol with a `.csv` file in the directory, sorted.
    pub fn list_symbols(&self) -> Result<Vec<String>, SourceError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| SourceError::Io {
            symbol: "*".into(),
            message: format!("{}: {e}", self.dir.display()),
        })?;
        let mut symbols: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        symbols.sort();
        Ok(symbols)
    }
}

impl CandleSource for CsvCandleSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str) -> Result<CandleSeries, SourceError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let file = std::fs::File::open(&path).map_err(|e| SourceError::Io {
            symbol: symbol.to_string(),
            message: format!("{}: {e}", path.display()),
        })?;
        let series = read_candles(symbol, std::io::BufReader::new(file))?;
        tracing::debug!(symbol, candles = series.len(), path = %path.display(), "loaded candles");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "timestamp,open,high,low,close,volume\n";

    #[test]
    fn parses_millis_and_rfc3339() {
        assert_eq!(parse_timestamp("1700000000000").unwrap(), 1_700_000_000_000);
        assert_eq!(
            parse_timestamp("2024-01-01T00:00:00Z").unwrap(),
            1_704_067_200_000
        );
        assert_eq!(
            parse_timestamp("2024-01-01T01:00:00+01:00").unwrap(),
            1_704_067_200_000
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn reads_mixed_timestamp_formats() {
        let data = format!(
            "{HEADER}2024-01-01T00:00:00Z,100,101,99,100.5,10\n1704070800000,100.5,102,100,101,12\n"
        );
        let series = read_candles("BTC", data.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.candles()[0].timestamp, 1_704_067_200_000);
        assert_eq!(series.last().close, 101.0);
    }

    #[test]
    fn rejects_unordered_rows() {
        let data = format!("{HEADER}2000,1,2,0.5,1,1\n1000,1,2,0.5,1,1\n");
        let err = read_candles("BTC", data.as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
        assert!(err.to_string().contains("strictly increase"));
    }

    #[test]
    fn rejects_bad_numbers_with_row() {
        let data = format!("{HEADER}1000,1,2,0.5,abc,1\n");
        let err = read_candles("ETH", data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn rejects_empty_file() {
        assert!(read_candles("ETH", HEADER.as_bytes()).is_err());
    }

    #[test]
    fn write_then_read_preserves_candles() {
        let data = format!("{HEADER}1000,10,11,9,10.5,3\n2000,10.5,12,10,11.25,4\n");
        let series = read_candles("X", data.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_candles(&series, &mut buf).unwrap();
        assert_eq!(read_candles("X", buf.as_slice()).unwrap(), series);
    }

    #[test]
    fn directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ETH.csv"), format!("{HEADER}1000,1,2,0.5,1,1\n")).unwrap();
        std::fs::write(dir.path().join("BTC.csv"), format!("{HEADER}1000,1,2,0.5,1,1\n")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let source = CsvCandleSource::new(dir.path());
        assert_eq!(source.list_symbols().unwrap(), vec!["BTC", "ETH"]);
        assert_eq!(source.fetch("BTC").unwrap().len(), 1);
        assert!(matches!(
            source.fetch("DOGE").unwrap_err(),
            SourceError::SymbolNotFound { .. }
        ));
    }
}
