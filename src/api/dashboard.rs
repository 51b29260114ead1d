use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::warn;
use utoipa::ToSchema;

use crate::attendance::cache;
use crate::attendance::classify::classify;
use crate::attendance::format::{format_time, thai_date};
use crate::auth::extractor::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::attendance::{EmployeeSummary, LeaveCategory};

/// First-to-last date of the whole export, Buddhist-era formatted.
#[derive(Serialize, ToSchema)]
pub struct DateRange {
    #[schema(example = "01/01/2567")]
    pub from: String,
    #[schema(example = "31/01/2567")]
    pub to: String,
}

/// One bar of the comparison chart.
#[derive(Serialize, ToSchema)]
pub struct ChartBar {
    pub category: LeaveCategory,
    #[schema(example = "ลาป่วย/ลากิจ")]
    pub label: String,
    pub value: f64,
}

/// One row inside a category expander.
#[derive(Serialize, ToSchema)]
pub struct DateEntry {
    #[schema(example = "05/01/2567")]
    pub date: String,
    #[schema(example = "08:02")]
    pub check_in: String,
    #[schema(example = "17:01")]
    pub check_out: String,
    #[schema(example = "ลาป่วยครึ่งวัน")]
    pub exception: String,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryDates {
    pub category: LeaveCategory,
    pub label: String,
    pub total: f64,
    pub entries: Vec<DateEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub employee: String,
    /// True when the export holds no rows for this employee.
    pub no_data: bool,
    /// Set when the attendance source itself could not be read; the rest of
    /// the payload is then an empty render, not this employee's data.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "attendance file not found: attendances.csv")]
    pub warning: Option<String>,
    pub data_range: Option<DateRange>,
    pub summary: EmployeeSummary,
    pub chart: Vec<ChartBar>,
    pub categories: Vec<CategoryDates>,
}

/// Attendance summary for the logged-in employee: the four metrics, the chart
/// series, and per-category date lists sorted ascending by date.
//
// utoipa needs a literal path, so this documents the route under
// `config::DEFAULT_API_PREFIX`; an `API_PREFIX` override is not reflected here.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Attendance summary for the logged-in employee", body = DashboardResponse),
        (status = 401, description = "Missing or expired session"),
        (status = 500, description = "Store unreachable")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    auth: AuthUser,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    // An unreadable export is an input-data problem, not a fault: tell the
    // viewer and render an empty dashboard.
    let (records, warning) = match cache::load_cached(&config.attendance_file, &config.columns).await
    {
        Ok(records) => (records, None),
        Err(e) => {
            warn!(error = %e, "Attendance source unavailable, rendering empty dashboard");
            (Arc::new(Vec::new()), Some(e.to_string()))
        }
    };

    // Range over the full export, before the per-employee filter.
    let mut dates = records.iter().filter_map(|r| r.date);
    let data_range = dates.next().map(|first| {
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        DateRange {
            from: thai_date(Some(min)),
            to: thai_date(Some(max)),
        }
    });

    let (mut rows, summary) = classify(&records, &auth.name);
    // Display order is not guaranteed by the source; undated rows go last.
    rows.sort_by_key(|r| (r.record.date.is_none(), r.record.date));

    let chart = LeaveCategory::iter()
        .map(|category| ChartBar {
            category,
            label: category.label().to_string(),
            value: summary.category_total(category),
        })
        .collect();

    let categories = LeaveCategory::iter()
        .map(|category| CategoryDates {
            category,
            label: category.label().to_string(),
            total: summary.category_total(category),
            entries: rows
                .iter()
                .filter(|r| r.category_value(category) > 0.0)
                .map(|r| DateEntry {
                    date: thai_date(r.record.date),
                    check_in: format_time(r.record.check_in, &config.missing_time_token),
                    check_out: format_time(r.record.check_out, &config.missing_time_token),
                    exception: r.record.exception_code.clone(),
                })
                .collect(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(DashboardResponse {
        no_data: rows.is_empty(),
        employee: auth.name,
        warning,
        data_range,
        summary,
        chart,
        categories,
    }))
}
