//! Alerts derived from the current snapshot.

use crate::{
    model::{Insight, InsightKind, WeatherSnapshotRecord},
    render::{html_escape, rounded},
};

const WINDY_MPH: f64 = 20.0;
const HOT_F: f64 = 85.0;
const COLD_F: f64 = 40.0;
const HUMID_PCT: f64 = 80.0;

/// Scan a snapshot and produce the ordered insight list.
///
/// Order is fixed: wind, heat, cold, humidity, then the global average, which
/// is always present for non-empty input. Comparisons use raw values; only the
/// displayed numbers are rounded.
pub fn generate_insights(records: &[WeatherSnapshotRecord]) -> Vec<Insight> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    // Strict comparisons keep the first record on ties.
    let mut hottest = first;
    let mut coldest = first;
    let mut total = 0.0;
    for r in records {
        if r.temperature > hottest.temperature {
            hottest = r;
        }
        if r.temperature < coldest.temperature {
            coldest = r;
        }
        total += r.temperature;
    }
    let max_temp = hottest.temperature;
    let min_temp = coldest.temperature;
    let avg_temp = total / records.len() as f64;

    let mut insights = Vec::new();

    let windy: Vec<_> = records.iter().filter(|r| r.wind_speed > WINDY_MPH).collect();
    if !windy.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Warning,
            icon: "💨",
            title: "Windy Conditions",
            content: format!(
                "{} {} strong winds",
                windy.len(),
                if windy.len() == 1 { "city has" } else { "cities have" }
            ),
            detail: windy
                .iter()
                .map(|r| format!("{}: {} mph", r.city, r.wind_speed))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    if max_temp > HOT_F {
        insights.push(Insight {
            kind: InsightKind::Alert,
            icon: "🔥",
            title: "Heat Advisory",
            content: format!("{} experiencing high temperatures", hottest.city),
            detail: format!("Currently {}°F - Stay hydrated", rounded(max_temp)),
        });
    }

    if min_temp < COLD_F {
        insights.push(Insight {
            kind: InsightKind::Info,
            icon: "❄️",
            title: "Cold Weather",
            content: format!("{} has cold conditions", coldest.city),
            detail: format!("Currently {}°F - Dress warmly", rounded(min_temp)),
        });
    }

    let humid: Vec<_> = records.iter().filter(|r| r.humidity > HUMID_PCT).collect();
    if !humid.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Info,
            icon: "💧",
            title: "High Humidity",
            content: format!(
                "{} {} with humid conditions",
                humid.len(),
                if humid.len() == 1 { "location" } else { "locations" }
            ),
            detail: humid
                .iter()
                .map(|r| format!("{}: {}%", r.city, r.humidity))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    insights.push(Insight {
        kind: InsightKind::Info,
        icon: "🌍",
        title: "Global Average",
        content: "Average temperature across all cities".to_string(),
        detail: format!(
            "{}°F with {}° variation",
            rounded(avg_temp),
            rounded(max_temp - min_temp)
        ),
    });

    insights
}

/// Markup for the insights grid. An empty list renders the "All Clear" card.
pub fn render_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return concat!(
            r#"<div class="insight-card info">"#,
            r#"<div class="insight-icon">✅</div>"#,
            r#"<div class="insight-title">All Clear</div>"#,
            r#"<div class="insight-content">No significant weather events detected</div>"#,
            "</div>"
        )
        .to_string();
    }

    insights
        .iter()
        .map(|i| {
            format!(
                r#"<div class="insight-card {kind}"><div class="insight-icon">{icon}</div><div class="insight-title">{title}</div><div class="insight-content">{content}</div><div class="insight-detail">{detail}</div></div>"#,
                kind = i.kind.as_str(),
                icon = i.icon,
                title = i.title,
                content = html_escape(&i.content),
                detail = html_escape(&i.detail),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
