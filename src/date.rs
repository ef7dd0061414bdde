//! Universe date-index decoding.
//!
//! A universe date is an integer day index with epoch such that 2442964
//! corresponds to 1976-07-04.

use chrono::NaiveDate;

pub const EPOCH_INDEX: u32 = 2_442_964;

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1976, 7, 4).expect("epoch date is valid")
}

/// Decode a universe date index into a calendar date.
///
/// Values below [`EPOCH_INDEX`] are not fatal — the caller is expected to
/// raise a [`crate::diagnostic::Diagnostic::DateOutOfRange`] and still use
/// the resulting (possibly pre-epoch) date.
pub fn decode_date(index: u32) -> NaiveDate {
    let delta = index as i64 - EPOCH_INDEX as i64;
    epoch_date() + chrono::Duration::days(delta)
}
