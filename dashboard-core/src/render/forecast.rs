use chrono::NaiveDate;

use crate::{
    icons::icon_for,
    model::ForecastDay,
    render::{html_escape, rounded},
};

pub fn render_forecast(days: &[ForecastDay]) -> String {
    days.iter().map(render_day).collect::<Vec<_>>().join("\n")
}

pub fn render_day(day: &ForecastDay) -> String {
    let precipitation = if day.pop_max > 0.0 {
        format!(
            r#"
    <div class="forecast-pop">🌧 {}% chance</div>"#,
            rounded(day.pop_max)
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="forecast-card">
    <div class="forecast-date">{date}</div>
    <div class="forecast-icon">{icon}</div>
    <div class="forecast-temp">{avg}°F</div>
    <div class="forecast-temp-range">{min}° / {max}°</div>
    <div class="forecast-condition">{condition}</div>
    <div class="forecast-extra">💧 {humidity}% | 💨 {wind} mph</div>{precipitation}
</div>"#,
        date = html_escape(&format_day_label(&day.date)),
        icon = icon_for(&day.condition),
        avg = rounded(day.temp_avg),
        min = rounded(day.temp_min),
        max = rounded(day.temp_max),
        condition = html_escape(&day.condition),
        humidity = rounded(day.humidity_avg),
        wind = rounded(day.wind_speed_avg),
    )
}

/// Short weekday, month and day, e.g. `Fri, Jan 5`.
///
/// Dates that are not ISO `YYYY-MM-DD` (optionally followed by a time) are
/// shown as received.
pub fn format_day_label(date: &str) -> String {
    date.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%a, %b %-d").to_string())
        .unwrap_or_else(|| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(pop_max: f64) -> ForecastDay {
        ForecastDay {
            date: "2024-01-05".to_string(),
            condition: "scattered clouds".to_string(),
            temp_avg: 48.6,
            temp_min: 41.2,
            temp_max: 55.5,
            humidity_avg: 71.4,
            wind_speed_avg: 8.5,
            pop_max,
        }
    }

    #[test]
    fn day_card_rounds_values() {
        let html = render_day(&day(0.0));

        assert!(html.contains(">Fri, Jan 5<"));
        assert!(html.contains("⛅"));
        assert!(html.contains(">49°F<"));
        assert!(html.contains(">41° / 56°<"));
        assert!(html.contains("💧 71% | 💨 9 mph"));
    }

    #[test]
    fn zero_precipitation_chance_is_omitted() {
        assert!(!render_day(&day(0.0)).contains("chance"));
    }

    #[test]
    fn positive_precipitation_chance_is_shown() {
        assert!(render_day(&day(40.0)).contains("🌧 40% chance"));
    }

    #[test]
    fn day_labels() {
        assert_eq!(format_day_label("2024-12-31"), "Tue, Dec 31");
        assert_eq!(format_day_label("2024-02-29T00:00:00"), "Thu, Feb 29");
        assert_eq!(format_day_label("soon"), "soon");
    }

    #[test]
    fn one_card_per_day() {
        let html = render_forecast(&[day(0.0), day(10.0), day(0.0)]);
        assert_eq!(html.matches(r#"<div class="forecast-card">"#).count(), 3);
    }
}
