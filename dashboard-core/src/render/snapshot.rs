use chrono::{DateTime, TimeZone};

use crate::{
    icons::{class_for, icon_for},
    model::WeatherSnapshotRecord,
    page::SelectOption,
    render::{html_escape, rounded},
};

pub const NA: &str = "N/A";

pub fn render_cards(records: &[WeatherSnapshotRecord]) -> String {
    records.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

pub fn render_card(w: &WeatherSnapshotRecord) -> String {
    let class = class_for(&w.condition);
    let class_attr = if class.is_empty() {
        "weather-card".to_string()
    } else {
        format!("weather-card {class}")
    };

    format!(
        r#"<div class="{class_attr}">
    <div class="card-header">
        <div class="card-icon">{icon}</div>
        <div class="city-info">
            <div class="city-name">{city}</div>
            <div class="local-time">{local_time}</div>
        </div>
    </div>
    <div class="temperature-display">
        <div class="temperature">{temperature}°</div>
        <div class="feels-like">Feels like {feels_like}°</div>
        <div class="condition">{condition}</div>
    </div>
    <div class="weather-details">
        <div class="detail-item"><span class="detail-label">Humidity</span><span class="detail-value">{humidity}%</span></div>
        <div class="detail-item"><span class="detail-label">Wind</span><span class="detail-value">{wind} mph</span></div>
    </div>
    <div class="extra-details">
        <div class="detail-item"><span class="detail-label">Pressure</span><span class="detail-value">{pressure}</span></div>
        <div class="detail-item"><span class="detail-label">Visibility</span><span class="detail-value">{visibility}</span></div>
    </div>
</div>"#,
        icon = icon_for(&w.condition),
        city = html_escape(&w.city),
        local_time = html_escape(&w.local_time),
        temperature = rounded(w.temperature),
        feels_like = rounded(w.feels_like_or_temperature()),
        condition = html_escape(&w.condition),
        humidity = w.humidity,
        wind = w.wind_speed,
        pressure = format_pressure(w.pressure),
        visibility = format_visibility(w.visibility),
    )
}

/// Raw pressure reading, or "N/A" when absent. Zero means "not reported".
pub fn format_pressure(pressure: Option<f64>) -> String {
    match pressure {
        Some(p) if p != 0.0 => p.to_string(),
        _ => NA.to_string(),
    }
}

/// Meters to kilometers with one decimal, or "N/A". Ties round up, like the
/// other displayed numbers.
pub fn format_visibility(visibility: Option<f64>) -> String {
    match visibility {
        Some(v) if v != 0.0 => format!("{:.1} km", rounded(v / 100.0) as f64 / 10.0),
        _ => NA.to_string(),
    }
}

/// Dropdown options: the empty prompt first, then one per city in snapshot order.
pub fn city_options(records: &[WeatherSnapshotRecord], prompt: &str) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", prompt))
        .chain(records.iter().map(|r| SelectOption::new(&r.city, &r.city)))
        .collect()
}

/// Refresh stamp in the en-US `toLocaleString` shape, e.g. `1/10/2024, 3:04:05 PM`.
pub fn format_refresh_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
