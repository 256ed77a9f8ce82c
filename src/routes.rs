//! Screen routes and their paths.

use std::fmt;

/// Attendance list (target of the header back button).
pub const ABSEN_PATH: &str = "/absen";
/// Attendance data list (target after a successful update).
pub const DATA_ABSEN_PATH: &str = "/data-absen";

/// A navigable screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Absen,
    DataAbsen,
    /// `/absensi/{id}/edit`
    EditAbsen(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Absen => ABSEN_PATH.to_string(),
            Route::DataAbsen => DATA_ABSEN_PATH.to_string(),
            Route::EditAbsen(id) => format!("/absensi/{id}/edit"),
        }
    }

    /// Parse a path. Trailing slashes are ignored; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            ABSEN_PATH => return Some(Route::Absen),
            DATA_ABSEN_PATH => return Some(Route::DataAbsen),
            _ => {}
        }

        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["absensi", id, "edit"] if !id.is_empty() => Some(Route::EditAbsen(id.to_string())),
            _ => None,
        }
    }

    /// Record id for the edit route.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Route::EditAbsen(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
