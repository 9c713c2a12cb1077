//! CSV export of observations
//!
//! Rows are `metricName,date,value,unit` with a header line, in the set's
//! stored order. Forecast points are exported like any other observation;
//! filter with [`ObservationSet::real`] first to leave them out.

use crate::domain::metrics::{CsvRecord, ObservationSet};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

use super::log_messages;

/// Serialize observations as CSV into any writer
pub fn write_csv<W: Write>(writer: W, set: &ObservationSet) -> Result<()> {
    // The header is written up front so empty sets still carry it
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CsvRecord::HEADER)?;
    for record in set.to_csv_records() {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serialize observations to an in-memory CSV string
pub fn to_csv_string(set: &ObservationSet) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, set)?;
    String::from_utf8(buffer).map_err(|e| Error::Internal(e.to_string()))
}

/// Write observations to a CSV file, creating or truncating it
#[instrument(skip(set), fields(rows = set.len()))]
pub fn write_csv_file(path: &Path, set: &ObservationSet) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, set)?;
    info!(path = %path.display(), "{}", log_messages::export::CSV_WRITTEN);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Observation;

    #[test]
    fn test_header_and_rows() {
        let set = ObservationSet::new(vec![
            Observation::try_from_raw("ai_tongue", "采纳率", "2024-01-01", 78.5, "%").unwrap(),
            Observation::try_from_raw("ai_tongue", "采纳次数", "2024-01-01", 1200.0, "次").unwrap(),
        ]);
        let csv = to_csv_string(&set).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "metricName,date,value,unit");
        assert_eq!(lines[1], "采纳率,2024-01-01,78.5,%");
        assert!(lines[2].starts_with("采纳次数,2024-01-01,1200"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_set_writes_header_only() {
        assert_eq!(
            to_csv_string(&ObservationSet::empty()).unwrap(),
            "metricName,date,value,unit\n"
        );
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let set = ObservationSet::new(vec![Observation::try_from_raw(
            "ai_diagnosis",
            "采纳情况,外治",
            "2024-01-01",
            3.0,
            "次",
        )
        .unwrap()]);
        let csv = to_csv_string(&set).unwrap();
        assert!(csv.contains("\"采纳情况,外治\""));
    }
}
