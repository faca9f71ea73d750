//! The dashboard page: named panels, selection controls and the theme.
//!
//! [`Surface`] is what the session writes to. [`HtmlPage`] keeps everything in
//! memory and can serialize itself to a standalone HTML document.

use std::collections::HashMap;

use crate::{
    chart::ChartCanvas,
    model::{Metric, Theme},
    render::{html_escape, placeholder},
};

/// Output regions of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    WeatherCards,
    Insights,
    Forecast,
    LastUpdate,
}

impl Panel {
    pub fn id(&self) -> &'static str {
        match self {
            Panel::WeatherCards => "weatherCards",
            Panel::Insights => "insightsGrid",
            Panel::Forecast => "forecastGrid",
            Panel::LastUpdate => "lastUpdate",
        }
    }
}

/// Input controls; each one has exactly one change handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    CitySelect,
    MetricSelect,
    DateRangeSelect,
    ForecastCitySelect,
    ThemeToggle,
}

impl Control {
    pub fn id(&self) -> &'static str {
        match self {
            Control::CitySelect => "citySelect",
            Control::MetricSelect => "metricSelect",
            Control::DateRangeSelect => "dateRangeSelect",
            Control::ForecastCitySelect => "forecastCitySelect",
            Control::ThemeToggle => "themeToggle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self { value: value.to_string(), label: label.to_string() }
    }
}

pub trait Surface {
    /// Replace a panel's markup.
    fn set_html(&mut self, panel: Panel, html: String);

    fn html(&self, panel: Panel) -> &str;

    /// Replace a select's options. The current value survives only if one of
    /// the new options carries it; otherwise the select falls back to "".
    fn set_options(&mut self, control: Control, options: Vec<SelectOption>);

    fn options(&self, control: Control) -> &[SelectOption];

    /// Current value of a control; empty when nothing is selected.
    fn value(&self, control: Control) -> &str;

    fn set_value(&mut self, control: Control, value: &str);

    fn set_theme(&mut self, theme: Theme);

    fn theme(&self) -> Theme;

    /// Ask the embedded map to reload.
    fn reload_map(&mut self);
}

#[derive(Debug, Clone, Default)]
struct SelectState {
    options: Vec<SelectOption>,
    value: String,
}

/// In-memory page that renders to a static HTML document.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    panels: HashMap<Panel, String>,
    selects: HashMap<Control, SelectState>,
    theme: Theme,
    map_url: Option<String>,
    map_revision: u64,
    canvas: ChartCanvas,
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlPage {
    pub fn new() -> Self {
        let mut page = Self {
            panels: HashMap::new(),
            selects: HashMap::new(),
            theme: Theme::default(),
            map_url: None,
            map_revision: 0,
            canvas: ChartCanvas::default(),
        };

        page.set_html(Panel::WeatherCards, placeholder("Loading weather data"));
        page.set_html(Panel::Forecast, placeholder("Select a city to view forecast"));
        page.set_options(Control::CitySelect, vec![SelectOption::new("", "Select a city")]);
        page.set_options(Control::ForecastCitySelect, vec![SelectOption::new("", "Choose a city")]);
        page.set_options(
            Control::MetricSelect,
            Metric::all()
                .iter()
                .map(|m| SelectOption::new(m.as_str(), metric_label(*m)))
                .collect(),
        );
        page.set_value(Control::MetricSelect, Metric::default().as_str());
        page.set_options(
            Control::DateRangeSelect,
            vec![
                SelectOption::new("1", "Last 24 Hours"),
                SelectOption::new("3", "Last 3 Days"),
                SelectOption::new("7", "Last 7 Days"),
            ],
        );
        page.set_value(Control::DateRangeSelect, "7");
        page
    }

    /// Embed the backend's map page, e.g. `http://host:5000/api/map`.
    pub fn with_map_url(mut self, url: impl Into<String>) -> Self {
        self.map_url = Some(url.into());
        self
    }

    /// Canvas the trend chart is drawn onto; hand it to a chart backend.
    pub fn canvas(&self) -> ChartCanvas {
        self.canvas.clone()
    }

    pub fn map_revision(&self) -> u64 {
        self.map_revision
    }

    /// Serialize the whole page, including the live chart if there is one.
    pub fn to_document(&self) -> String {
        let body_class = if self.theme.is_dark() { r#" class="dark-mode""# } else { "" };
        let theme_icon = if self.theme.is_dark() { "☀️" } else { "🌙" };

        let map = match &self.map_url {
            Some(url) => format!(
                r#"<iframe id="weatherMap" src="{}?v={}" title="Weather map"></iframe>"#,
                html_escape(url),
                self.map_revision
            ),
            None => String::new(),
        };

        let chart = match self.canvas.config() {
            Some(config) => format!(
                r#"<canvas id="weatherChart"></canvas>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<script>new Chart(document.getElementById('weatherChart').getContext('2d'), {config});</script>"#,
                config = config.to_string().replace("</", "<\\/"),
            ),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Weather Dashboard</title>
    <style>{css}</style>
</head>
<body{body_class}>
<header>
    <h1>Weather Dashboard</h1>
    <span id="themeIcon">{theme_icon}</span>
    <span>Last updated: <span id="lastUpdate">{last_update}</span></span>
</header>
<section><h2>Insights</h2><div id="insightsGrid" class="grid">{insights}</div></section>
<section><h2>Current Conditions</h2><div id="weatherCards" class="grid">{cards}</div></section>
<section>
    <h2>Trends</h2>
    {city_select}
    {metric_select}
    {range_select}
    <div class="chart">{chart}</div>
</section>
<section>
    <h2>Forecast</h2>
    {forecast_select}
    <div id="forecastGrid" class="grid">{forecast}</div>
</section>
<section>{map}</section>
</body>
</html>
"#,
            css = INLINE_CSS,
            last_update = self.html(Panel::LastUpdate),
            insights = self.html(Panel::Insights),
            cards = self.html(Panel::WeatherCards),
            city_select = self.render_select(Control::CitySelect),
            metric_select = self.render_select(Control::MetricSelect),
            range_select = self.render_select(Control::DateRangeSelect),
            forecast_select = self.render_select(Control::ForecastCitySelect),
            forecast = self.html(Panel::Forecast),
        )
    }

    fn render_select(&self, control: Control) -> String {
        let value = self.value(control);
        let options: String = self
            .options(control)
            .iter()
            .map(|o| {
                format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    html_escape(&o.value),
                    if o.value == value { " selected" } else { "" },
                    html_escape(&o.label)
                )
            })
            .collect();
        format!(r#"<select id="{}">{options}</select>"#, control.id())
    }
}

impl Surface for HtmlPage {
    fn set_html(&mut self, panel: Panel, html: String) {
        self.panels.insert(panel, html);
    }

    fn html(&self, panel: Panel) -> &str {
        self.panels.get(&panel).map(String::as_str).unwrap_or("")
    }

    fn set_options(&mut self, control: Control, options: Vec<SelectOption>) {
        let state = self.selects.entry(control).or_default();
        if !options.iter().any(|o| o.value == state.value) {
            state.value.clear();
        }
        state.options = options;
    }

    fn options(&self, control: Control) -> &[SelectOption] {
        self.selects.get(&control).map(|s| s.options.as_slice()).unwrap_or(&[])
    }

    fn value(&self, control: Control) -> &str {
        self.selects.get(&control).map(|s| s.value.as_str()).unwrap_or("")
    }

    fn set_value(&mut self, control: Control, value: &str) {
        self.selects.entry(control).or_default().value = value.to_string();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn theme(&self) -> Theme {
        self.theme
    }

    fn reload_map(&mut self) {
        self.map_revision += 1;
    }
}

fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Temp => "Temperature",
        Metric::Humidity => "Humidity",
        Metric::All => "All Metrics",
    }
}

const INLINE_CSS: &str = r#"
:root { --bg: #f5f5f7; --card: #ffffff; --text: #1d1d1f; --muted: #86868b; --accent-blue: #0071e3; }
body.dark-mode { --bg: #000000; --card: #1c1c1e; --text: #f5f5f7; --muted: #a1a1a6; }
body { font-family: Inter, -apple-system, sans-serif; background: var(--bg); color: var(--text); margin: 0; padding: 24px; }
header { display: flex; gap: 16px; align-items: baseline; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
.weather-card, .forecast-card, .insight-card { background: var(--card); border-radius: 16px; padding: 16px; }
.insight-card.warning { border-left: 4px solid #ff9f0a; }
.insight-card.alert { border-left: 4px solid #ff3b30; }
.insight-card.info { border-left: 4px solid var(--accent-blue); }
.temperature { font-size: 2.5em; font-weight: 300; }
.detail-item { display: flex; justify-content: space-between; }
.detail-label, .local-time, .feels-like { color: var(--muted); }
.loading { color: var(--muted); padding: 24px; }
.chart { position: relative; height: 360px; }
iframe { width: 100%; height: 420px; border: 0; border-radius: 16px; }
"#;
