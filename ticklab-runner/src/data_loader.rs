//! Tick loading for the sweep.
//!
//! CSV layout follows the usual capture format: one row per tick with the
//! bid and ask in the last two columns (a leading index/timestamp column is
//! tolerated and ignored). A header row is skipped when its price columns
//! fail to parse. The loader guarantees non-empty, numeric output or
//! returns a typed error; downstream code never sees a half-parsed series.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use ticklab_core::domain::{PriceSample, PriceSeries};

/// Errors from the tick loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path}:{line}: expected at least 2 columns, found {found}")]
    Shape {
        path: String,
        line: u64,
        found: usize,
    },

    #[error("{path}:{line}: cannot parse '{value}' as a price")]
    Parse {
        path: String,
        line: u64,
        value: String,
    },

    #[error("'{path}' contains no ticks")]
    Empty { path: String },
}

/// A loaded series plus its provenance fingerprint.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    /// BLAKE3 over all bid/ask values, in order.
    pub dataset_hash: String,
}

/// Loads a bid/ask tick series from a CSV file.
pub fn load_ticks(path: &Path) -> Result<LoadedSeries, LoadError> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;

    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row as u64 + 1);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(LoadError::Shape {
                path: display,
                line,
                found: record.len(),
            });
        }

        // Bid and ask are the last two columns; anything before them is an
        // index or timestamp we don't need.
        let bid_field = &record[record.len() - 2];
        let ask_field = &record[record.len() - 1];

        match (bid_field.parse::<f64>(), ask_field.parse::<f64>()) {
            (Ok(bid), Ok(ask)) => samples.push(PriceSample::new(bid, ask)),
            _ if row == 0 => continue, // header row
            (Err(_), _) => {
                return Err(LoadError::Parse {
                    path: display,
                    line,
                    value: bid_field.to_string(),
                });
            }
            (_, Err(_)) => {
                return Err(LoadError::Parse {
                    path: display,
                    line,
                    value: ask_field.to_string(),
                });
            }
        }
    }

    if samples.is_empty() {
        return Err(LoadError::Empty { path: display });
    }

    let series = PriceSeries::new(samples);
    let dataset_hash = compute_dataset_hash(&series);
    Ok(LoadedSeries {
        series,
        dataset_hash,
    })
}

/// Deterministic BLAKE3 hash over the series content.
pub fn compute_dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for sample in series.iter() {
        hasher.update(&sample.bid.to_le_bytes());
        hasher.update(&sample.ask.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Generates a deterministic synthetic tick series for demos and tests.
///
/// A seeded random walk for the mid-price, with occasional high-spread
/// bursts so the strategy's regime logic has something to react to. The
/// same label always produces the same series.
pub fn synthetic_series(label: &str, len: usize) -> PriceSeries {
    let seed: [u8; 32] = *blake3::hash(label.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut samples = Vec::with_capacity(len);
    let mut mid = 100.0_f64;
    let mut burst_left = 0usize;

    for _ in 0..len {
        mid = (mid * (1.0 + rng.gen_range(-0.001..0.001))).max(1.0);

        if burst_left > 0 {
            burst_left -= 1;
        } else if rng.gen_bool(0.01) {
            burst_left = rng.gen_range(3..12);
        }
        let spread = if burst_left > 0 {
            rng.gen_range(1.3..1.6)
        } else {
            rng.gen_range(0.5..1.2)
        };

        samples.push(PriceSample::new(mid - spread / 2.0, mid + spread / 2.0));
    }

    PriceSeries::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_indexed_rows_with_header() {
        let file = write_csv(",Bids,Asks\n0,99.5,100.5\n1,99.6,100.6\n");
        let loaded = load_ticks(file.path()).unwrap();
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.series.get(0).unwrap().bid, 99.5);
        assert_eq!(loaded.series.get(1).unwrap().ask, 100.6);
        assert!(!loaded.dataset_hash.is_empty());
    }

    #[test]
    fn loads_bare_two_column_rows() {
        let file = write_csv("99.5,100.5\n99.6,100.6\n");
        let loaded = load_ticks(file.path()).unwrap();
        assert_eq!(loaded.series.len(), 2);
    }

    #[test]
    fn skips_blank_lines() {
        let file = write_csv("0,99.5,100.5\n\n1,99.6,100.6\n");
        let loaded = load_ticks(file.path()).unwrap();
        assert_eq!(loaded.series.len(), 2);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_csv("");
        assert!(matches!(
            load_ticks(file.path()),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn header_only_file_is_an_error() {
        let file = write_csv(",Bids,Asks\n");
        assert!(matches!(
            load_ticks(file.path()),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn malformed_price_is_an_error_with_line() {
        let file = write_csv("0,99.5,100.5\n1,oops,100.6\n");
        match load_ticks(file.path()) {
            Err(LoadError::Parse { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "oops");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn short_row_is_an_error() {
        let file = write_csv("0,99.5,100.5\n42\n");
        assert!(matches!(
            load_ticks(file.path()),
            Err(LoadError::Shape { line: 2, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            load_ticks(Path::new("/nonexistent/ticks.csv")),
            Err(LoadError::Csv { .. })
        ));
    }

    #[test]
    fn dataset_hash_is_deterministic_and_content_sensitive() {
        let file = write_csv("0,99.5,100.5\n1,99.6,100.6\n");
        let a = load_ticks(file.path()).unwrap();
        let b = load_ticks(file.path()).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);

        let other = write_csv("0,99.5,100.5\n1,99.6,100.7\n");
        let c = load_ticks(other.path()).unwrap();
        assert_ne!(a.dataset_hash, c.dataset_hash);
    }

    #[test]
    fn synthetic_series_is_deterministic_per_label() {
        let a = synthetic_series("UEC", 500);
        let b = synthetic_series("UEC", 500);
        assert_eq!(a.len(), 500);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x, y);
        }

        let c = synthetic_series("ORE", 500);
        assert_ne!(a.get(0), c.get(0));
    }

    #[test]
    fn synthetic_series_is_sane_and_has_both_regimes() {
        let series = synthetic_series("UEC", 2000);
        assert!(series.iter().all(|s| s.is_sane()));
        assert!(series.iter().any(|s| s.spread() >= 1.3));
        assert!(series.iter().any(|s| s.spread() < 1.3));
    }
}
