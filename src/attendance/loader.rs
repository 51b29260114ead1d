use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;

/// Localized header names of the attendance export. Defaults match the
/// time-clock vendor's Thai export; each is overridable through config.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub name: String,
    pub department: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub exception: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "ชื่อ-สกุล".to_string(),
            department: "แผนก".to_string(),
            date: "วันที่".to_string(),
            check_in: "เข้างาน".to_string(),
            check_out: "ออกงาน".to_string(),
            exception: "ข้อยกเว้น".to_string(),
        }
    }
}

/// Input-data failures. All of them are non-fatal for a render: the caller
/// reports the problem and continues with an empty record set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("attendance file not found: {0}")]
    NotFound(String),
    #[error("failed to read attendance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse attendance file: {0}")]
    Csv(#[from] csv::Error),
    #[error("attendance file is missing the \"{0}\" column")]
    MissingColumn(String),
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Unparseable dates become `None` rather than failing the whole load.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return None;
    }
    // Excel exports sometimes carry a full datetime in the date column.
    if let Ok(dt) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(cell, f).ok())
}

/// `"-"`, blank, or garbage means no punch that day.
fn parse_time(cell: &str) -> Option<NaiveTime> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(cell, f).ok())
}

fn column_index(headers: &StringRecord, wanted: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == wanted)
}

/// Reads the delimited attendance export into records.
///
/// Only the name column is mandatory; rows keep going when the date or time
/// cells fail to parse (the cell becomes `None`). Spreadsheet formats are the
/// upstream exporter's problem; this loader takes the CSV it writes.
pub fn load_records(path: &Path, columns: &ColumnMap) -> Result<Vec<AttendanceRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let name_idx = column_index(&headers, &columns.name)
        .ok_or_else(|| LoadError::MissingColumn(columns.name.clone()))?;
    let department_idx = column_index(&headers, &columns.department);
    let date_idx = column_index(&headers, &columns.date);
    let check_in_idx = column_index(&headers, &columns.check_in);
    let check_out_idx = column_index(&headers, &columns.check_out);
    let exception_idx = column_index(&headers, &columns.exception);

    let cell = |row: &StringRecord, idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).unwrap_or("").trim().to_string()
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let employee_name = cell(&row, Some(name_idx));
        if employee_name.is_empty() {
            continue;
        }
        records.push(AttendanceRecord {
            employee_name,
            department: cell(&row, department_idx),
            date: date_idx.and_then(|i| row.get(i)).and_then(parse_date),
            check_in: check_in_idx.and_then(|i| row.get(i)).and_then(parse_time),
            check_out: check_out_idx.and_then(|i| row.get(i)).and_then(parse_time),
            exception_code: cell(&row, exception_idx),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hrboard-load-{}.csv", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_rows_with_thai_headers() {
        let path = write_temp(
            "ชื่อ-สกุล,แผนก,วันที่,เข้างาน,ออกงาน,ข้อยกเว้น\n\
             Somboon,ฝ่ายผลิต,2024-01-05,08:02:11,17:01:00,ลาป่วยครึ่งวัน\n\
             Somboon,ฝ่ายผลิต,2024-01-10,-,-,ขาด\n",
        );
        let records = load_records(&path, &ColumnMap::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(
            records[0].check_in,
            chrono::NaiveTime::from_hms_opt(8, 2, 11)
        );
        assert_eq!(records[1].check_in, None);
        assert_eq!(records[1].exception_code, "ขาด");
    }

    #[test]
    fn unparseable_date_becomes_none_and_row_is_kept() {
        let path = write_temp(
            "ชื่อ-สกุล,แผนก,วันที่,เข้างาน,ออกงาน,ข้อยกเว้น\n\
             Somboon,,not-a-date,08:00,17:00,สาย\n",
        );
        let records = load_records(&path, &ColumnMap::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].exception_code, "สาย");
    }

    #[test]
    fn missing_name_column_is_reported() {
        let path = write_temp("แผนก,วันที่\nฝ่ายผลิต,2024-01-05\n");
        let err = load_records(&path, &ColumnMap::default()).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, LoadError::MissingColumn(c) if c == "ชื่อ-สกุล"));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("hrboard-no-such-file.csv");
        let err = load_records(&path, &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
