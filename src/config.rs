use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

use crate::attendance::loader::ColumnMap;

/// Default mount point of the protected scope. The OpenAPI `path` attributes
/// document this prefix; overriding `API_PREFIX` moves the routes but not the
/// generated docs.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Which backend holds credentials and sessions. The rest of the app only
/// sees the store traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    MySql,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub users_file: PathBuf,
    pub sessions_file: PathBuf,

    pub attendance_file: PathBuf,
    pub columns: ColumnMap,

    /// The single phone number allowed to approve password resets.
    pub admin_phone: String,
    /// Token shown for a missing check-in/check-out time.
    pub missing_time_token: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "file".to_string())
            .to_lowercase()
            .as_str()
        {
            "mysql" => StoreBackend::MySql,
            _ => StoreBackend::File,
        };

        let database_url = match store_backend {
            StoreBackend::MySql => Some(
                env::var("DATABASE_URL").expect("DATABASE_URL must be set for the mysql backend"),
            ),
            StoreBackend::File => env::var("DATABASE_URL").ok(),
        };

        let defaults = ColumnMap::default();
        let columns = ColumnMap {
            name: env::var("COL_NAME").unwrap_or(defaults.name),
            department: env::var("COL_DEPARTMENT").unwrap_or(defaults.department),
            date: env::var("COL_DATE").unwrap_or(defaults.date),
            check_in: env::var("COL_CHECK_IN").unwrap_or(defaults.check_in),
            check_out: env::var("COL_CHECK_OUT").unwrap_or(defaults.check_out),
            exception: env::var("COL_EXCEPTION").unwrap_or(defaults.exception),
        };

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            store_backend,
            database_url,
            users_file: env::var("USERS_FILE")
                .unwrap_or_else(|_| "users.json".to_string())
                .into(),
            sessions_file: env::var("SESSIONS_FILE")
                .unwrap_or_else(|_| "sessions.json".to_string())
                .into(),
            attendance_file: env::var("ATTENDANCE_FILE")
                .unwrap_or_else(|_| "attendances.csv".to_string())
                .into(),
            columns,
            admin_phone: env::var("ADMIN_PHONE").expect("ADMIN_PHONE must be set"),
            missing_time_token: env::var("MISSING_TIME_TOKEN")
                .unwrap_or_else(|_| "00:00".to_string()),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_string()),
        }
    }
}
