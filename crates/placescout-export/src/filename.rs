//! Default export filename.

use chrono::{Local, NaiveDateTime};

/// `{prefix}_{YYYYMMDD_HHMMSS}.xlsx` for the given moment.
#[must_use]
pub fn default_filename(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

/// [`default_filename`] stamped with the local wall-clock time.
#[must_use]
pub fn default_filename_now(prefix: &str) -> String {
    default_filename(prefix, Local::now().naive_local())
}
