use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

/// Daily issuance hours of the village forecast, in ascending order.
pub const ISSUANCE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Minute of the hour from which the current hour's issuance is assumed published.
pub const PUBLICATION_MINUTE: u32 = 45;

/// The (date, hour) pair of a forecast issuance, as the API expects it in
/// `base_date` / `base_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseTime {
    pub date: NaiveDate,
    pub hour: u32,
}

impl BaseTime {
    /// Resolve the issuance for the host's local wall clock.
    ///
    /// The host is expected to run in the provider's civil timezone; no conversion happens.
    pub fn current() -> Self {
        resolve(Local::now().naive_local())
    }

    /// `base_date` query value, `YYYYMMDD`.
    pub fn date_param(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// `base_time` query value, `HH00`.
    pub fn time_param(&self) -> String {
        format!("{:02}00", self.hour)
    }
}

impl fmt::Display for BaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_param(), self.time_param())
    }
}

/// Latest issuance that is guaranteed to be available at `now`.
///
/// Before minute 45 the issuance due at the top of the current hour may not be
/// published yet, so the lookup is done one hour earlier. Hours 00 and 01 fall
/// back to 23:00 of the previous day.
pub fn resolve(now: NaiveDateTime) -> BaseTime {
    let effective = if now.minute() < PUBLICATION_MINUTE {
        now - Duration::hours(1)
    } else {
        now
    };

    match ISSUANCE_HOURS.iter().rev().find(|&&h| h <= effective.hour()) {
        Some(&hour) => BaseTime { date: effective.date(), hour },
        None => BaseTime {
            date: (effective - Duration::days(1)).date(),
            hour: 23,
        },
    }
}
