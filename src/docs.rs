use crate::api::dashboard::{
    CategoryDates, ChartBar, DashboardResponse, DateEntry, DateRange,
};
use crate::auth::flow::AuthStep;
use crate::auth::handlers::{
    ChangePasswordReq, ForgotPasswordReq, LoginReq, SetPasswordReq, StepResponse,
};
use crate::model::attendance::{EmployeeSummary, LeaveCategory};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Attendance Dashboard API",
        version = "1.0.0",
        description = r#"
## HR Attendance Dashboard

Per-employee attendance reporting over the time-clock export.

### 🔹 Key Features
- **Authentication**
  - Phone + password login, first-login password setup, admin-assisted reset
- **Sessions**
  - Opaque bearer tokens, restored across page reloads
- **Dashboard**
  - Leave/absence/lateness/vacation summary, chart series, per-category date lists

### 🔐 Security
Protected endpoints take the session token as a **Bearer** header.

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::set_password,
        crate::auth::handlers::change_password,
        crate::auth::handlers::forgot_password,
        crate::auth::handlers::restore_session,
        crate::auth::handlers::logout,

        crate::api::dashboard::dashboard,
    ),
    components(
        schemas(
            LoginReq,
            SetPasswordReq,
            ChangePasswordReq,
            ForgotPasswordReq,
            StepResponse,
            AuthStep,
            DashboardResponse,
            DateRange,
            ChartBar,
            DateEntry,
            CategoryDates,
            EmployeeSummary,
            LeaveCategory
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, password lifecycle and sessions"),
        (name = "Dashboard", description = "Per-employee attendance summary"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build(),
                ),
            );
        }
    }
}
