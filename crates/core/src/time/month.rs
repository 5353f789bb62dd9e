use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Days between `date` and the last calendar day of its month. The last day
/// of the month yields 0.
pub fn days_remaining_in_month(date: NaiveDate) -> u32 {
    last_day_of_month(date) - date.day()
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };

    // Only unreachable at the far edge of chrono's date range.
    match first_of_next.and_then(|d| d.pred_opt()) {
        Some(last) => last.day(),
        None => date.day(),
    }
}

/// Resolve the report-local calendar date from an instant. The offset is
/// configured in minutes east of UTC (REPORT_UTC_OFFSET_MINUTES, default 0);
/// the rule engine itself only ever sees the resolved date.
pub fn report_date(now_utc: DateTime<Utc>, utc_offset_minutes: i32) -> anyhow::Result<NaiveDate> {
    let offset = chrono::FixedOffset::east_opt(utc_offset_minutes * 60)
        .context("invalid report UTC offset")?;
    Ok(now_utc.with_timezone(&offset).date_naive())
}
