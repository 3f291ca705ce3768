use chrono::{NaiveDate, NaiveDateTime};
use contracts::domain::a030_order_line::OrderLine;
use contracts::enums::region_code::RegionCode;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::shared::error::DashboardError;
use crate::shared::format::format_number;

/// Columns every dataset file must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "order_purchase_timestamp",
    "product_id",
    "product_category_name_english",
    "customer_state",
    "order_item_id",
    "price",
    "review_score",
];

/// Anything that can produce the full table of order lines
pub trait OrderLineSource {
    fn load(&self) -> Result<Vec<OrderLine>, DashboardError>;
}

/// Merged orders CSV with a fallback location
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    primary: PathBuf,
    fallback: PathBuf,
}

impl CsvDatasetSource {
    pub fn new(primary: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    /// Open the primary file, or the fallback if the primary is not a readable file
    fn open(&self) -> Result<(File, &Path), DashboardError> {
        match open_regular_file(&self.primary) {
            Ok(file) => Ok((file, self.primary.as_path())),
            Err(primary_err) => {
                tracing::warn!(
                    "Dataset not readable at {} ({}), trying {}",
                    self.primary.display(),
                    primary_err,
                    self.fallback.display()
                );
                match open_regular_file(&self.fallback) {
                    Ok(file) => Ok((file, self.fallback.as_path())),
                    Err(fallback_err) => {
                        tracing::error!(
                            "Fallback dataset not readable at {}: {}",
                            self.fallback.display(),
                            fallback_err
                        );
                        Err(DashboardError::DataUnavailable {
                            primary: self.primary.display().to_string(),
                            fallback: self.fallback.display().to_string(),
                        })
                    }
                }
            }
        }
    }
}

/// Opening a directory succeeds on Unix, so the file type is checked as well
fn open_regular_file(path: &Path) -> std::io::Result<File> {
    let file = File::open(path)?;
    if file.metadata()?.is_file() {
        Ok(file)
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ))
    }
}

impl OrderLineSource for CsvDatasetSource {
    fn load(&self) -> Result<Vec<OrderLine>, DashboardError> {
        let (file, path) = self.open()?;
        tracing::info!("Loading dataset from {}", path.display());

        let lines = read_order_lines(file)?;

        tracing::info!("Loaded {} order lines", format_number(lines.len()));
        Ok(lines)
    }
}

/// Raw CSV row, before validation
#[derive(Debug, Deserialize)]
struct RawOrderLine {
    order_purchase_timestamp: String,
    product_id: String,
    product_category_name_english: String,
    customer_state: String,
    order_item_id: String,
    price: String,
    review_score: String,
}

/// Parse every row of a merged orders CSV.
///
/// All-or-nothing: the first row that fails validation aborts the load.
pub fn read_order_lines<R: Read>(input: R) -> Result<Vec<OrderLine>, DashboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    // Strip UTF-8 BOM if present
    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{FEFF}').trim())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::MalformedRow {
            line: 1,
            reason: format!("missing required columns: {}", missing.join(", ")),
        });
    }
    reader.set_headers(headers.clone());

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            if e.is_io_error() {
                DashboardError::Csv(e)
            } else {
                DashboardError::MalformedRow {
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    reason: e.to_string(),
                }
            }
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw: RawOrderLine = record
            .deserialize(Some(&headers))
            .map_err(|e| DashboardError::MalformedRow {
                line,
                reason: e.to_string(),
            })?;

        let order_line =
            validate_row(raw).map_err(|reason| DashboardError::MalformedRow { line, reason })?;
        lines.push(order_line);
    }

    Ok(lines)
}

fn validate_row(raw: RawOrderLine) -> Result<OrderLine, String> {
    let order_purchase_timestamp = parse_timestamp(&raw.order_purchase_timestamp)?;

    if raw.product_id.is_empty() {
        return Err("product_id is empty".to_string());
    }
    if raw.customer_state.is_empty() {
        return Err("customer_state is empty".to_string());
    }

    let order_item_id = parse_integral("order_item_id", &raw.order_item_id)?;
    if order_item_id == 0 || order_item_id > u64::from(u32::MAX) {
        return Err(format!("order_item_id out of range: {}", raw.order_item_id));
    }

    let price: f64 = raw
        .price
        .parse()
        .map_err(|_| format!("price is not a number: '{}'", raw.price))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a non-negative number: '{}'", raw.price));
    }

    let review_score = if raw.review_score.is_empty() {
        None
    } else {
        let score = parse_integral("review_score", &raw.review_score)?;
        if score == 0 || score > u64::from(u8::MAX) {
            return Err(format!("review_score out of range: {}", raw.review_score));
        }
        Some(score as u8)
    };

    let category = if raw.product_category_name_english.is_empty() {
        None
    } else {
        Some(raw.product_category_name_english)
    };

    Ok(OrderLine {
        order_purchase_timestamp,
        product_id: raw.product_id,
        product_category_name_english: category,
        customer_state: RegionCode::from_code(&raw.customer_state),
        order_item_id: order_item_id as u32,
        price,
        review_score,
    })
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated form, and bare dates
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("order_purchase_timestamp is not a date-time: '{}'", value))
}

/// Integer cell, tolerating the `"2.0"` form written by dataframe exports
fn parse_integral(column: &str, value: &str) -> Result<u64, String> {
    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(f as u64)
        }
        _ => Err(format!("{} is not a non-negative integer: '{}'", column, value)),
    }
}

/// Distinct purchase years, ascending
pub fn available_years(lines: &[OrderLine]) -> Vec<i32> {
    lines
        .iter()
        .map(OrderLine::purchase_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct product categories, ascending. Missing categories are skipped.
pub fn distinct_categories(lines: &[OrderLine]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.category())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "order_id,order_purchase_timestamp,product_id,product_category_name_english,customer_state,order_item_id,price,review_score";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_reads_valid_rows_and_ignores_extra_columns() {
        let text = csv_text(&[
            "o1,2017-10-02 10:56:33,p1,housewares,SP,1,29.99,4",
            "o2,2018-07-24 20:41:37,p2,perfumery,ba,2,118.70,5.0",
        ]);
        let lines = read_order_lines(text.as_bytes()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, "p1");
        assert_eq!(lines[0].customer_state, RegionCode::Sp);
        assert_eq!(lines[0].purchase_year(), 2017);
        assert_eq!(lines[1].customer_state, RegionCode::Ba);
        assert_eq!(lines[1].order_item_id, 2);
        assert_eq!(lines[1].review_score, Some(5));
    }

    #[test]
    fn test_empty_category_and_review_are_missing_not_errors() {
        let text = csv_text(&["o1,2017-01-05,p1,,RJ,1,10.0,"]);
        let lines = read_order_lines(text.as_bytes()).unwrap();

        assert_eq!(lines[0].product_category_name_english, None);
        assert_eq!(lines[0].review_score, None);
    }

    #[test]
    fn test_bad_timestamp_fails_whole_load() {
        let text = csv_text(&[
            "o1,2017-10-02 10:56:33,p1,housewares,SP,1,29.99,4",
            "o2,not-a-date,p2,perfumery,BA,1,10.0,5",
        ]);
        let err = read_order_lines(text.as_bytes()).unwrap_err();

        match err {
            DashboardError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("order_purchase_timestamp"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_numeric_fields_are_malformed() {
        for row in [
            "o1,2017-10-02 10:56:33,p1,toys,SP,x,29.99,4",
            "o1,2017-10-02 10:56:33,p1,toys,SP,1.5,29.99,4",
            "o1,2017-10-02 10:56:33,p1,toys,SP,1,-3,4",
            "o1,2017-10-02 10:56:33,p1,toys,SP,1,abc,4",
            "o1,2017-10-02 10:56:33,p1,toys,SP,1,3.0,4.5",
        ] {
            let text = csv_text(&[row]);
            assert!(
                matches!(
                    read_order_lines(text.as_bytes()),
                    Err(DashboardError::MalformedRow { .. })
                ),
                "row should be rejected: {row}"
            );
        }
    }

    #[test]
    fn test_missing_column_is_reported_on_header() {
        let text = "order_purchase_timestamp,product_id,price\n2017-01-01,p1,1.0\n";
        let err = read_order_lines(text.as_bytes()).unwrap_err();

        match err {
            DashboardError::MalformedRow { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("customer_state"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let text = format!(
            "\u{FEFF}order_purchase_timestamp,product_id,product_category_name_english,customer_state,order_item_id,price,review_score\n{}\n",
            "2017-01-01 00:00:00,p1,toys,SP,1,1.0,5"
        );
        let lines = read_order_lines(text.as_bytes()).unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_falls_back_when_primary_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("merged_dataset.csv");
        let mut file = File::create(&fallback).unwrap();
        file.write_all(csv_text(&["o1,2018-03-01 08:00:00,p1,toys,MG,1,5.0,3"]).as_bytes())
            .unwrap();

        let source = CsvDatasetSource::new(dir.path().join("dashboard/merged_dataset.csv"), &fallback);
        let lines = source.load().unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].customer_state, RegionCode::Mg);
    }

    #[test]
    fn test_falls_back_when_primary_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("dashboard");
        std::fs::create_dir(&primary).unwrap();
        let fallback = dir.path().join("merged_dataset.csv");
        std::fs::write(
            &fallback,
            csv_text(&["o1,2017-04-01 08:00:00,p1,toys,PR,2,5.0,4"]),
        )
        .unwrap();

        let lines = CsvDatasetSource::new(&primary, &fallback).load().unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].customer_state, RegionCode::Pr);
    }

    #[test]
    fn test_directories_at_both_paths_are_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDatasetSource::new(dir.path(), dir.path());

        assert!(matches!(
            source.load(),
            Err(DashboardError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_both_paths_missing_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDatasetSource::new(dir.path().join("a.csv"), dir.path().join("b.csv"));

        assert!(matches!(
            source.load(),
            Err(DashboardError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_available_years_and_categories_are_sorted_and_distinct() {
        let text = csv_text(&[
            "o1,2018-01-01 00:00:00,p1,toys,SP,1,1.0,5",
            "o2,2016-01-01 00:00:00,p2,bed_bath_table,SP,1,1.0,5",
            "o3,2018-05-01 00:00:00,p3,toys,SP,1,1.0,5",
            "o4,2017-05-01 00:00:00,p4,,SP,1,1.0,5",
        ]);
        let lines = read_order_lines(text.as_bytes()).unwrap();

        assert_eq!(available_years(&lines), vec![2016, 2017, 2018]);
        assert_eq!(distinct_categories(&lines), vec!["bed_bath_table", "toys"]);
    }
}
