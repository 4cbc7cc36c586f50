use std::fs::File;
use std::path::{Path, PathBuf};

use super::model::{Column, Record, RecordTable};

/// Reasons the dataset could not be loaded. All of them are fatal at start-up.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open dataset {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read CSV header row")]
    Header(#[source] csv::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("malformed CSV row {row}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the attrition CSV at `path`.
pub fn load_table(path: &Path) -> Result<RecordTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_reader(file)
}

/// Load from any reader; used for in-memory data.
pub fn load_from_reader<R: std::io::Read>(rdr: R) -> Result<RecordTable, LoadError> {
    read_table(csv::Reader::from_reader(rdr))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Header row with column names, then one employee per row. Only the
/// columns in [`Column::ALL`] are read.
fn read_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RecordTable, LoadError> {
    let headers: csv::StringRecord = reader
        .headers()
        .map_err(LoadError::Header)?
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect();

    let missing: Vec<String> = Column::ALL
        .iter()
        .map(|c| c.name())
        .filter(|name| !headers.iter().any(|h| h == *name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        let record = result.map_err(|source| LoadError::Row {
            row: row_no + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(RecordTable::from_records(records))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Value;

    const HEADER: &str = "Age,Attrition,Department,DistanceFromHome,EducationField,EmployeeNumber,Gender,JobInvolvement,JobLevel,JobRole,JobSatisfaction,MonthlyIncome,WorkLifeBalance";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    fn sample_rows() -> Vec<&'static str> {
        vec![
            "41,Yes,Sales,1,Life Sciences,1,Female,3,2,Sales Executive,4,5993,1",
            "49,No,Research & Development,8,Life Sciences,2,Male,2,2,Research Scientist,2,5130,3",
            "37,Yes,Research & Development,2,Other,4,Male,2,1,Laboratory Technician,3,2090,3",
            "53,No,Sales,2,Life Sciences,5,Female,3,4,Manager,1,15427,3",
        ]
    }

    #[test]
    fn loads_rows_and_ignores_extra_columns() {
        let table = load_from_reader(csv_text(&sample_rows()).as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        let first = &table.records()[0];
        assert_eq!(first.age, 41);
        assert_eq!(first.job_role, "Sales Executive");
        assert_eq!(first.work_life_balance, 1);
        assert_eq!(
            table.option_list(Column::Department).iter().cloned().collect::<Vec<_>>(),
            vec![Value::from("Sales"), Value::from("Research & Development")]
        );
    }

    #[test]
    fn strips_byte_order_mark() {
        let text = format!("\u{feff}{}", csv_text(&sample_rows()));
        let table = load_from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.records()[1].age, 49);
    }

    #[test]
    fn reports_all_missing_columns() {
        let text = "Age,MonthlyIncome,JobRole\n30,1000,Manager\n";
        match load_from_reader(text.as_bytes()) {
            Err(LoadError::MissingColumns(missing)) => {
                assert!(missing.contains(&"WorkLifeBalance".to_string()));
                assert!(missing.contains(&"Gender".to_string()));
                assert!(!missing.contains(&"Age".to_string()));
                assert_eq!(missing.len(), 9);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn malformed_number_names_the_row() {
        let mut rows = sample_rows();
        rows.push("forty,No,Sales,2,Other,9,Male,3,1,Manager,1,100,2");
        match load_from_reader(csv_text(&rows).as_bytes()) {
            Err(LoadError::Row { row, .. }) => assert_eq!(row, 5),
            other => panic!("expected Row error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn loading_twice_gives_identical_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv_text(&sample_rows()).as_bytes()).unwrap();
        file.flush().unwrap();

        let a = load_table(file.path()).unwrap();
        let b = load_table(file.path()).unwrap();
        assert_eq!(a.len(), b.len());
        for col in Column::ALL {
            assert_eq!(a.option_list(col), b.option_list(col));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn header_only_file_gives_empty_table() {
        let table = load_from_reader(csv_text(&[]).as_bytes()).unwrap();
        assert!(table.is_empty());
    }
}
