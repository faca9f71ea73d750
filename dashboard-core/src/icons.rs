//! Condition text to display glyph and CSS category.

const ICONS: &[(&str, &str)] = &[
    ("clear sky", "☀️"),
    ("few clouds", "🌤️"),
    ("scattered clouds", "⛅"),
    ("broken clouds", "☁️"),
    ("overcast clouds", "☁️"),
    ("shower rain", "🌧️"),
    ("rain", "🌧️"),
    ("light rain", "🌦️"),
    ("drizzle", "🌦️"),
    ("thunderstorm", "⛈️"),
    ("snow", "❄️"),
    ("mist", "🌫️"),
    ("fog", "🌫️"),
    ("haze", "🌫️"),
];

const FALLBACK_ICON: &str = "🌡️";

// Checked in order, first match wins.
const CLASSES: &[(&[&str], &str)] = &[
    (&["clear"], "clear-sky"),
    (&["cloud"], "clouds"),
    (&["rain", "drizzle"], "rain"),
    (&["thunder"], "thunderstorm"),
    (&["snow"], "snow"),
    (&["mist", "fog", "haze"], "mist"),
];

/// Glyph for an exact (case-insensitive) condition phrase.
pub fn icon_for(condition: &str) -> &'static str {
    let cond = condition.to_lowercase();
    ICONS
        .iter()
        .find(|(phrase, _)| *phrase == cond)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON)
}

/// CSS category for a condition, by keyword substring. Empty when nothing matches.
pub fn class_for(condition: &str) -> &'static str {
    let cond = condition.to_lowercase();
    CLASSES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| cond.contains(k)))
        .map(|(_, class)| *class)
        .unwrap_or("")
}
