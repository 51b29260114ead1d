use crate::model::attendance::{
    AttendanceRecord, ClassifiedRecord, EmployeeSummary, DEPARTMENT_UNSPECIFIED, HALF_DAY_MARKERS,
    LeaveCategory,
};

/// Normalization used for name matching: trim, lowercase, collapse internal
/// whitespace. The credential store's display name and the export's name
/// column often differ only cosmetically, so the display form is never used
/// as the comparison key.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim and collapse internal whitespace, keeping the original case.
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Half-day detection is substring-based on the marker token embedded in the
/// exception code. Kept in one place; the export format conflates the code
/// family with half-day-ness.
pub fn half_day_value(code: &str) -> f64 {
    if HALF_DAY_MARKERS.iter().any(|m| code.contains(m)) {
        0.5
    } else {
        1.0
    }
}

fn derive(record: &AttendanceRecord) -> (f64, f64, u32, u32) {
    match LeaveCategory::of_code(&record.exception_code) {
        Some(LeaveCategory::SickOrPersonal) => (half_day_value(&record.exception_code), 0.0, 0, 0),
        Some(LeaveCategory::Absent) => (0.0, half_day_value(&record.exception_code), 0, 0),
        Some(LeaveCategory::Late) => (0.0, 0.0, 1, 0),
        Some(LeaveCategory::Vacation) => (0.0, 0.0, 0, 1),
        None => (0.0, 0.0, 0, 0),
    }
}

/// Filters the full record set down to one employee and derives the four
/// category values per row plus their totals.
///
/// Empty input or no matching rows are routine "no data for this user"
/// conditions and yield two empty results, never an error. Deterministic and
/// side-effect free.
pub fn classify(
    records: &[AttendanceRecord],
    identity: &str,
) -> (Vec<ClassifiedRecord>, EmployeeSummary) {
    let wanted = normalize_name(identity);
    if wanted.is_empty() {
        return (Vec::new(), EmployeeSummary::default());
    }

    let mut classified = Vec::new();
    let mut summary = EmployeeSummary::default();

    for record in records {
        if normalize_name(&record.employee_name) != wanted {
            continue;
        }

        let department = clean_text(&record.department);
        let cleaned = AttendanceRecord {
            employee_name: clean_text(&record.employee_name),
            department: if department.is_empty() || department == "nan" {
                DEPARTMENT_UNSPECIFIED.to_string()
            } else {
                department
            },
            exception_code: clean_text(&record.exception_code),
            ..record.clone()
        };

        let (sick_or_personal, absent, late, vacation) = derive(&cleaned);

        if summary.employee_name.is_empty() {
            summary.employee_name = cleaned.employee_name.clone();
        }
        summary.sick_or_personal += sick_or_personal;
        summary.absent += absent;
        summary.late += late;
        summary.vacation += vacation;

        classified.push(ClassifiedRecord {
            record: cleaned,
            sick_or_personal,
            absent,
            late,
            vacation,
        });
    }

    (classified, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use strum::IntoEnumIterator;

    fn record(name: &str, date: Option<NaiveDate>, code: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_name: name.to_string(),
            department: "ฝ่ายผลิต".to_string(),
            date,
            check_in: None,
            check_out: None,
            exception_code: code.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn at_most_one_category_is_nonzero_for_every_known_code() {
        let all_codes: Vec<&str> = LeaveCategory::iter()
            .flat_map(|c| c.codes().iter().copied())
            .chain(["", "ทำงาน", "unknown_code"])
            .collect();

        for code in all_codes {
            let (rows, _) = classify(&[record("A B", date(2024, 1, 1), code)], "A B");
            let row = &rows[0];
            let nonzero = [
                row.sick_or_personal > 0.0,
                row.absent > 0.0,
                row.late > 0,
                row.vacation > 0,
            ]
            .iter()
            .filter(|&&b| b)
            .count();
            assert!(nonzero <= 1, "code {code:?} set {nonzero} categories");
        }
    }

    #[test]
    fn half_day_codes_yield_half_a_day() {
        for (code, expected) in [
            ("ลาป่วย", 1.0),
            ("ลากิจ", 1.0),
            ("ลาป่วยครึ่งวัน", 0.5),
            ("ลากิจครึ่งวัน", 0.5),
            ("sick_leave", 1.0),
            ("sick_leave_half", 0.5),
            ("personal_leave_half", 0.5),
        ] {
            let (rows, _) = classify(&[record("A B", date(2024, 1, 1), code)], "A B");
            assert_eq!(rows[0].sick_or_personal, expected, "code {code:?}");
        }

        for (code, expected) in [("ขาด", 1.0), ("ขาดครึ่งวัน", 0.5), ("absent_half", 0.5)] {
            let (rows, _) = classify(&[record("A B", date(2024, 1, 1), code)], "A B");
            assert_eq!(rows[0].absent, expected, "code {code:?}");
        }
    }

    #[test]
    fn name_matching_ignores_case_and_whitespace() {
        let records = [record("John Doe", date(2024, 1, 1), "สาย")];

        for identity in ["  John Doe", "john doe", "John  Doe"] {
            let (rows, summary) = classify(&records, identity);
            assert_eq!(rows.len(), 1, "identity {identity:?}");
            assert_eq!(summary.late, 1);
        }

        let (rows, summary) = classify(&records, "Jane Doe");
        assert!(rows.is_empty());
        assert_eq!(summary, EmployeeSummary::default());
    }

    #[test]
    fn summary_sums_each_category() {
        let records = [
            record("A B", date(2024, 1, 1), "ลาป่วย"),
            record("A B", date(2024, 1, 2), "ลากิจครึ่งวัน"),
            record("A B", date(2024, 1, 3), "ทำงาน"),
            record("A B", date(2024, 1, 4), "ลากิจ"),
        ];
        let (_, summary) = classify(&records, "A B");
        assert_eq!(summary.sick_or_personal, 2.5);
        assert_eq!(summary.absent, 0.0);
        assert_eq!(summary.late, 0);
        assert_eq!(summary.vacation, 0);
    }

    #[test]
    fn empty_input_is_safe() {
        let (rows, summary) = classify(&[], "anyone");
        assert!(rows.is_empty());
        assert_eq!(summary, EmployeeSummary::default());
    }

    #[test]
    fn blank_department_becomes_sentinel() {
        let mut r = record("A B", date(2024, 1, 1), "สาย");
        r.department = "  ".to_string();
        let (rows, _) = classify(&[r], "A B");
        assert_eq!(rows[0].record.department, DEPARTMENT_UNSPECIFIED);
    }

    #[test]
    fn somboon_end_to_end_summary() {
        let records = [
            record("Somboon", date(2024, 1, 5), "sick_leave_half"),
            record("Somboon", date(2024, 1, 10), "late"),
            record("Somboon", date(2024, 1, 15), "vacation"),
        ];
        let (rows, summary) = classify(&records, "Somboon");
        assert_eq!(summary.sick_or_personal, 0.5);
        assert_eq!(summary.absent, 0.0);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.vacation, 1);

        let sick_dates: Vec<_> = rows
            .iter()
            .filter(|r| r.category_value(LeaveCategory::SickOrPersonal) > 0.0)
            .map(|r| crate::attendance::format::thai_date(r.record.date))
            .collect();
        assert_eq!(sick_dates, vec!["05/01/2567".to_string()]);
    }
}
