//! Timestamp reconciliation between broker-server, UTC and chart display time.
//!
//! Broker statements print times on the trading server's clock (UTC+3). The
//! chart script places markers with Pine's `timestamp(y, m, d, h, mi)`, which
//! is read in the chart's display zone, so each raw time is first brought to
//! true UTC and then shifted into the display frame. All offsets are fixed
//! hour counts; no timezone database or DST rules are involved.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike, Utc};

/// Format of every timestamp in a broker statement.
pub const BROKER_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

pub const DEFAULT_BROKER_UTC_OFFSET_HOURS: i64 = 3;
pub const DEFAULT_DISPLAY_UTC_OFFSET_HOURS: i64 = -6;
/// Empirical correction applied on top of the display offset.
pub const DEFAULT_DISPLAY_CORRECTION_HOURS: i64 = 2;

/// Calendar fields in the chart's display frame. Not a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplayTimestamp {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl DisplayTimestamp {
    /// Render as a Pine `timestamp(...)` call.
    pub fn to_pine(&self) -> String {
        format!(
            "timestamp({}, {}, {}, {}, {})",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockOffsets {
    pub broker_utc_offset_hours: i64,
    pub display_utc_offset_hours: i64,
    pub display_correction_hours: i64,
}

impl Default for ClockOffsets {
    fn default() -> Self {
        Self {
            broker_utc_offset_hours: DEFAULT_BROKER_UTC_OFFSET_HOURS,
            display_utc_offset_hours: DEFAULT_DISPLAY_UTC_OFFSET_HOURS,
            display_correction_hours: DEFAULT_DISPLAY_CORRECTION_HOURS,
        }
    }
}

impl ClockOffsets {
    /// Parse a broker-local `YYYY.MM.DD HH:MM:SS` string and remove the
    /// broker server offset. `None` if the string is malformed.
    pub fn to_true_utc(&self, raw: &str) -> Option<DateTime<Utc>> {
        let local = NaiveDateTime::parse_from_str(raw.trim(), BROKER_TIME_FORMAT).ok()?;
        local
            .and_utc()
            .checked_sub_signed(TimeDelta::try_hours(self.broker_utc_offset_hours)?)
    }

    /// Shift a true UTC instant into the display frame and split it into
    /// calendar fields.
    ///
    /// Only returns `None` within hours of chrono's representable range.
    pub fn to_display(&self, utc: DateTime<Utc>) -> Option<DisplayTimestamp> {
        let shift = TimeDelta::try_hours(self.display_utc_offset_hours + self.display_correction_hours)?;
        let shifted = utc.checked_add_signed(shift)?.naive_utc();
        Some(DisplayTimestamp {
            year: shifted.year(),
            month: shifted.month(),
            day: shifted.day(),
            hour: shifted.hour(),
            minute: shifted.minute(),
        })
    }

    pub fn raw_to_display(&self, raw: &str) -> Option<DisplayTimestamp> {
        self.to_display(self.to_true_utc(raw)?)
    }
}
