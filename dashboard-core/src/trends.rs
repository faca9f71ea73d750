//! Trailing-window filtering for trend series.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use log::{debug, warn};

use crate::model::TrendSeries;

pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// One aligned sample of a [`TrendSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    /// Parsed label instant; `None` when the label did not parse.
    pub at: Option<NaiveDateTime>,
    pub temperature: f64,
    pub humidity: f64,
}

/// Points selected for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendWindow {
    pub points: Vec<TrendPoint>,
    /// True when nothing fell inside the window and all points were kept.
    pub fell_back: bool,
}

/// Parse a series label into a local wall-clock instant.
///
/// `M/D H:MM` labels carry no year: they are placed in `now`'s year, or the
/// year before when that would put them in the future. Anything else goes
/// through the generic formats.
pub fn parse_label(label: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.contains('/') {
        parse_month_day(label, now)
    } else {
        parse_generic(label)
    }
}

fn parse_month_day(label: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (date_part, time_part) = label.split_once(' ')?;
    let (month, day) = date_part.split_once('/')?;
    let (hour, minute) = time_part.trim().split_once(':')?;

    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;

    let in_year = |year: i32| NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0);

    let this_year = in_year(now.year())?;
    if this_year > now { in_year(now.year() - 1) } else { Some(this_year) }
}

fn parse_generic(label: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const FORMATS: &[&str] =
        &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
    if let Some(dt) = FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(label, f).ok()) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(label, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)
}

/// Keep the points of `series` within `[now - range_days, now]`, oldest first.
///
/// Unparsable labels are dropped. If nothing survives, every point is kept
/// in its original order instead. The series must already be aligned.
pub fn filter_window(series: &TrendSeries, range_days: i64, now: NaiveDateTime) -> TrendWindow {
    let cutoff = now - Duration::days(range_days);
    debug!("filtering {} points to {cutoff} .. {now}", series.len());

    let all_points = || {
        series
            .labels
            .iter()
            .zip(&series.temperature)
            .zip(&series.humidity)
            .map(|((label, &temperature), &humidity)| TrendPoint {
                label: label.clone(),
                at: parse_label(label, now),
                temperature,
                humidity,
            })
    };

    let mut points: Vec<TrendPoint> = all_points()
        .filter(|p| match p.at {
            Some(at) => at >= cutoff && at <= now,
            None => {
                debug!("dropping unparsable trend label '{}'", p.label);
                false
            }
        })
        .collect();

    debug!("kept {} of {} points", points.len(), series.len());

    if points.is_empty() {
        warn!("no trend points within the last {range_days} days, using all available data");
        return TrendWindow { points: all_points().collect(), fell_back: true };
    }

    // Stable, so equal instants keep their series order.
    points.sort_by_key(|p| p.at);
    TrendWindow { points, fell_back: false }
}
