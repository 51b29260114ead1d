use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use strum_macros::EnumIter;
use utoipa::ToSchema;

/// Sentinel department shown when the source cell is blank.
pub const DEPARTMENT_UNSPECIFIED: &str = "ไม่ระบุ";

/// Substrings that mark a half-day exception code. The biometric export
/// writes Thai codes; the English aliases cover the vendor's other export
/// language.
pub const HALF_DAY_MARKERS: [&str; 2] = ["ครึ่งวัน", "_half"];

const SICK_PERSONAL_CODES: [&str; 8] = [
    "ลาป่วย",
    "ลากิจ",
    "ลาป่วยครึ่งวัน",
    "ลากิจครึ่งวัน",
    "sick_leave",
    "personal_leave",
    "sick_leave_half",
    "personal_leave_half",
];

const ABSENT_CODES: [&str; 4] = ["ขาด", "ขาดครึ่งวัน", "absent", "absent_half"];

const LATE_CODES: [&str; 2] = ["สาย", "late"];

const VACATION_CODES: [&str; 2] = ["พักผ่อน", "vacation"];

/// One row of the attendance export, after parsing.
///
/// `date` is `None` when the source cell was unparseable; the row is kept so
/// the exception still counts toward the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub employee_name: String,
    pub department: String,
    pub date: Option<NaiveDate>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub exception_code: String,
}

/// The four mutually exclusive leave categories derived from the exception
/// code. An unrecognized code falls into none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    SickOrPersonal,
    Absent,
    Late,
    Vacation,
}

impl LeaveCategory {
    /// Display label used by the dashboard, matching the export's locale.
    pub fn label(&self) -> &'static str {
        match self {
            LeaveCategory::SickOrPersonal => "ลาป่วย/ลากิจ",
            LeaveCategory::Absent => "ขาด",
            LeaveCategory::Late => "สาย",
            LeaveCategory::Vacation => "พักผ่อน",
        }
    }

    /// Exception codes belonging to this category, half-day variants included.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            LeaveCategory::SickOrPersonal => &SICK_PERSONAL_CODES,
            LeaveCategory::Absent => &ABSENT_CODES,
            LeaveCategory::Late => &LATE_CODES,
            LeaveCategory::Vacation => &VACATION_CODES,
        }
    }

    /// Resolves a cleaned exception code to its category, if recognized.
    pub fn of_code(code: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        LeaveCategory::iter().find(|c| c.codes().contains(&code))
    }
}

/// An attendance row plus its derived category values. At most one of the
/// four fields is nonzero.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub sick_or_personal: f64,
    pub absent: f64,
    pub late: u32,
    pub vacation: u32,
}

impl ClassifiedRecord {
    pub fn category_value(&self, category: LeaveCategory) -> f64 {
        match category {
            LeaveCategory::SickOrPersonal => self.sick_or_personal,
            LeaveCategory::Absent => self.absent,
            LeaveCategory::Late => f64::from(self.late),
            LeaveCategory::Vacation => f64::from(self.vacation),
        }
    }
}

/// Per-employee totals, recomputed from the full record set on every request
/// and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub employee_name: String,
    pub sick_or_personal: f64,
    pub absent: f64,
    pub late: u32,
    pub vacation: u32,
}

impl EmployeeSummary {
    pub fn category_total(&self, category: LeaveCategory) -> f64 {
        match category {
            LeaveCategory::SickOrPersonal => self.sick_or_personal,
            LeaveCategory::Absent => self.absent,
            LeaveCategory::Late => f64::from(self.late),
            LeaveCategory::Vacation => f64::from(self.vacation),
        }
    }
}
