use crate::constants::{CORNER_FIELDS, FIELD_DELIMITER};
use crate::error::{CornerPlotError, Result};
use crate::palette::TimestampSet;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::io::Read;
use std::path::Path;

/// One detected tag corner: `timestamp id_a id_b id_c u v`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRecord {
    pub timestamp: f64,
    pub id_a: f64,
    pub id_b: f64,
    pub id_c: f64,
    pub u: f64,
    pub v: f64,
}

impl CornerRecord {
    /// `"id_a:id_b:id_c"` from the integer parts of the ids
    pub fn label(&self) -> String {
        format!(
            "{}:{}:{}",
            self.id_a as i64, self.id_b as i64, self.id_c as i64
        )
    }
}

/// Reads the corner rows whose timestamp is in `times`
///
/// # Errors
/// Returns error if the file cannot be opened or a selected row is malformed
pub fn read_corner_file<P: AsRef<Path>>(path: P, times: &TimestampSet) -> Result<Vec<CornerRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CornerPlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_corners_from_reader(file, times)
}

/// Space separated rows without header.
/// - A row is selected when its first field equals a requested timestamp string
/// - Rows that are not selected are skipped without validation
/// - Repeated separators do not produce empty fields
pub fn read_corners_from_reader<R: Read>(reader: R, times: &TimestampSet) -> Result<Vec<CornerRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(FIELD_DELIMITER)
        .quoting(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut rows = 0usize;

    for result in rdr.records() {
        let rec = result?;
        rows += 1;
        let line = rec.position().map_or(rows as u64, |p| p.line());

        let fields = non_empty_fields(&rec);
        match fields.first() {
            Some(first) if times.selects(first) => {}
            _ => continue,
        }

        records.push(parse_corner(&fields, line)?);
    }

    debug!("Selected {} of {} rows", records.len(), rows);
    Ok(records)
}

fn non_empty_fields(rec: &StringRecord) -> Vec<&str> {
    rec.iter().filter(|f| !f.is_empty()).collect()
}

fn parse_corner(fields: &[&str], line: u64) -> Result<CornerRecord> {
    if fields.len() < CORNER_FIELDS {
        return Err(CornerPlotError::TooFewFields {
            line,
            got: fields.len(),
        });
    }

    let mut values = [0.0; CORNER_FIELDS];
    for (column, (slot, field)) in values.iter_mut().zip(fields).enumerate() {
        *slot = parse_field(field, line, column)?;
    }
    let [timestamp, id_a, id_b, id_c, u, v] = values;

    for (column, id) in [(1, id_a), (2, id_b), (3, id_c)] {
        if !is_integral_range(id) {
            return Err(CornerPlotError::InvalidId {
                line,
                column,
                value: id,
            });
        }
    }

    Ok(CornerRecord {
        timestamp,
        id_a,
        id_b,
        id_c,
        u,
        v,
    })
}

// ids are shown by their integer part
fn is_integral_range(id: f64) -> bool {
    id.is_finite() && id.abs() < i64::MAX as f64
}

fn parse_field(value: &str, line: u64, column: usize) -> Result<f64> {
    value
        .parse()
        .map_err(|source| CornerPlotError::FieldParse {
            line,
            column,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
1.0 2 3 4 10.0 5.0
1.0 2 3 5 11.0 6.0
2.0 7 0 1 20.0 25.0
3.0 7 0 2 30.0 35.0
1.5 7 0 3 40.0 45.0
";

    fn times(t: &[&str]) -> TimestampSet {
        TimestampSet::new(t).unwrap()
    }

    #[test]
    fn test_selection_count() {
        let records = read_corners_from_reader(SAMPLE.as_bytes(), &times(&["1.0", "3.0"])).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.timestamp == 1.0 || r.timestamp == 3.0));
    }

    #[test]
    fn test_record_fields() {
        let records = read_corners_from_reader(SAMPLE.as_bytes(), &times(&["2.0"])).unwrap();
        assert_eq!(
            records,
            vec![CornerRecord {
                timestamp: 2.0,
                id_a: 7.0,
                id_b: 0.0,
                id_c: 1.0,
                u: 20.0,
                v: 25.0,
            }]
        );
        assert_eq!(records[0].label(), "7:0:1");
    }

    #[test]
    fn test_absent_timestamp_yields_nothing() {
        let records = read_corners_from_reader(SAMPLE.as_bytes(), &times(&["9.0"])).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_no_numeric_normalization() {
        let records = read_corners_from_reader(SAMPLE.as_bytes(), &times(&["1", "2.00"])).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        let data = "1.0 2 3 4 10.0 5.0\n1.0 2 3 4 10.0\n";
        let err = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap_err();
        assert!(matches!(err, CornerPlotError::TooFewFields { line: 2, got: 5 }));
    }

    #[test]
    fn test_short_unselected_row_is_ignored() {
        let data = "5.0 1\n1.0 2 3 4 10.0 5.0\n";
        let records = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_non_numeric_field() {
        let data = "1.0 2 x 4 10.0 5.0\n";
        let err = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap_err();
        match err {
            CornerPlotError::FieldParse {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, 2);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_id() {
        let data = "1.0 nan 3 4 10.0 5.0\n";
        let err = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap_err();
        assert!(matches!(
            err,
            CornerPlotError::InvalidId { line: 1, column: 1, value } if value.is_nan()
        ));

        let data = "1.0 2 inf 4 10.0 5.0\n";
        let err = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap_err();
        assert!(matches!(err, CornerPlotError::InvalidId { column: 2, .. }));
    }

    #[test]
    fn test_huge_id() {
        let data = "1.0 2 3 1e30 10.0 5.0\n";
        let err = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap_err();
        assert!(matches!(err, CornerPlotError::InvalidId { line: 1, column: 3, .. }));
    }

    #[test]
    fn test_infinite_coordinate_is_read() {
        let data = "1.0 2 3 4 inf 5.0\n";
        let records = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].u.is_infinite());
    }

    #[test]
    fn test_extra_fields_and_spacing() {
        let data = "1.0  2 3 4 10.0 5.0 99\r\n\n  \n";
        let records = read_corners_from_reader(data.as_bytes(), &times(&["1.0"])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].u, 10.0);
        assert_eq!(records[0].v, 5.0);
    }

    #[test]
    fn test_label_truncates_ids() {
        let rec = CornerRecord {
            timestamp: 0.0,
            id_a: 2.9,
            id_b: 3.0,
            id_c: -4.5,
            u: 0.0,
            v: 0.0,
        };
        assert_eq!(rec.label(), "2:3:-4");
    }

    #[test]
    fn test_read_corner_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = read_corner_file(file.path(), &times(&["1.5"])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label(), "7:0:3");
    }

    #[test]
    fn test_missing_file() {
        let err = read_corner_file("nonexistent_dir/tag_corners.txt", &times(&["1.0"])).unwrap_err();
        match err {
            CornerPlotError::Io { path, source } => {
                assert!(path.ends_with("tag_corners.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
