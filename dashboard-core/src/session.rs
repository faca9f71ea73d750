//! Page-session state and the handlers that update it.
//!
//! A [`Session`] owns everything the dashboard mutates: the page surface, the
//! current snapshot, the one live chart and the theme. Handlers are split in
//! two halves so fetches can run concurrently while state changes stay on one
//! task: `request_*`/[`Session::dispatch`] do the synchronous part and return
//! the [`Fetch`] to perform, [`Session::apply`] consumes the finished [`Reply`].

use chrono::{DateTime, Local, NaiveDateTime};
use log::{error, info, warn};

use crate::{
    api::DashboardApi,
    chart::{ChartBackend, ChartInstance, ChartSlot, ChartSpec, Palette},
    error::Result,
    insights::{generate_insights, render_insights},
    model::{
        ApiReply, ForecastDay, ForecastResponse, Insight, Metric, Theme, TrendSeries, WeatherSnapshotRecord,
    },
    page::{Control, Panel, Surface},
    prefs::{PreferenceStore, THEME_KEY},
    render::{
        error_placeholder, forecast::render_forecast, html_escape, placeholder,
        snapshot::{city_options, format_refresh_time, render_cards},
    },
    trends::{DEFAULT_RANGE_DAYS, filter_window},
};

/// A network request a handler wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Snapshot,
    Forecast(String),
    Trends(String),
}

/// The outcome of a [`Fetch`].
#[derive(Debug)]
pub enum Reply {
    Snapshot(Result<ApiReply<Vec<WeatherSnapshotRecord>>>),
    Forecast { city: String, reply: Result<ApiReply<ForecastResponse>> },
    Trends { city: String, reply: Result<ApiReply<TrendSeries>> },
}

/// Perform a fetch. Holds no session state, so any number can be in flight.
pub async fn fetch(api: &dyn DashboardApi, request: Fetch) -> Reply {
    match request {
        Fetch::Snapshot => Reply::Snapshot(api.latest().await),
        Fetch::Forecast(city) => {
            let reply = api.forecast(&city).await;
            Reply::Forecast { city, reply }
        }
        Fetch::Trends(city) => {
            let reply = api.trends(&city).await;
            Reply::Trends { city, reply }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }
}

#[derive(Debug)]
pub struct Session<S, C> {
    surface: S,
    charts: C,
    chart: ChartSlot,
    prefs: Box<dyn PreferenceStore>,
    snapshot: Vec<WeatherSnapshotRecord>,
    insights: Vec<Insight>,
    forecast: Vec<ForecastDay>,
    theme: Theme,
    last_refresh: Option<DateTime<Local>>,
    default_range_days: i64,
    clock: Clock,
}

impl<S: Surface, C: ChartBackend> Session<S, C> {
    pub fn new(surface: S, charts: C, prefs: Box<dyn PreferenceStore>) -> Self {
        Self {
            surface,
            charts,
            chart: ChartSlot::default(),
            prefs,
            snapshot: Vec::new(),
            insights: Vec::new(),
            forecast: Vec::new(),
            theme: Theme::default(),
            last_refresh: None,
            default_range_days: DEFAULT_RANGE_DAYS,
            clock: Clock::System,
        }
    }

    pub fn with_default_range(mut self, days: i64) -> Self {
        self.default_range_days = days;
        self
    }

    /// Pin "now" for trend windows.
    pub fn with_fixed_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Clock::Fixed(now);
        self
    }

    /// Restore the persisted theme and return the initial snapshot fetch.
    pub fn init(&mut self) -> Fetch {
        self.restore_theme();
        info!("dashboard initialized with {} theme", self.theme);
        self.request_snapshot()
    }

    /// Apply the persisted theme, light when unset or unreadable.
    pub fn restore_theme(&mut self) -> Theme {
        self.theme = self
            .prefs
            .get(THEME_KEY)
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();
        self.surface.set_theme(self.theme);
        self.theme
    }

    /// Handle a control event. `value`, when given, becomes the control's new
    /// value before its handler runs.
    pub fn dispatch(&mut self, control: Control, value: Option<&str>) -> Option<Fetch> {
        if let Some(v) = value {
            self.surface.set_value(control, v);
        }

        match control {
            Control::CitySelect => {
                let city = self.surface.value(Control::CitySelect).to_string();
                self.request_trends(&city)
            }
            Control::MetricSelect | Control::DateRangeSelect => {
                let city = self.surface.value(Control::CitySelect);
                (!city.is_empty()).then(|| Fetch::Trends(city.to_string()))
            }
            Control::ForecastCitySelect => {
                let city = self.surface.value(Control::ForecastCitySelect).to_string();
                self.request_forecast(&city)
            }
            Control::ThemeToggle => {
                self.toggle_theme();
                None
            }
        }
    }

    pub fn request_snapshot(&mut self) -> Fetch {
        Fetch::Snapshot
    }

    pub fn request_forecast(&mut self, city: &str) -> Option<Fetch> {
        if city.is_empty() {
            self.forecast.clear();
            self.surface.set_html(Panel::Forecast, placeholder("Select a city to view forecast"));
            return None;
        }
        self.surface.set_html(Panel::Forecast, placeholder("Loading forecast"));
        Some(Fetch::Forecast(city.to_string()))
    }

    pub fn request_trends(&mut self, city: &str) -> Option<Fetch> {
        if city.is_empty() {
            if self.chart.destroy() {
                info!("trend chart cleared");
            }
            return None;
        }
        Some(Fetch::Trends(city.to_string()))
    }

    pub fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Snapshot(reply) => self.apply_snapshot(reply),
            Reply::Forecast { city, reply } => self.apply_forecast(&city, reply),
            Reply::Trends { city, reply } => self.apply_trends(&city, reply),
        }
    }

    /// Fetch and render the latest snapshot.
    pub async fn refresh_snapshot(&mut self, api: &dyn DashboardApi) {
        let request = self.request_snapshot();
        let reply = fetch(api, request).await;
        self.apply(reply);
    }

    pub async fn load_forecast(&mut self, api: &dyn DashboardApi, city: &str) {
        if let Some(request) = self.request_forecast(city) {
            let reply = fetch(api, request).await;
            self.apply(reply);
        }
    }

    pub async fn load_trends(&mut self, api: &dyn DashboardApi, city: &str) {
        if let Some(request) = self.request_trends(city) {
            let reply = fetch(api, request).await;
            self.apply(reply);
        }
    }

    fn apply_snapshot(&mut self, reply: Result<ApiReply<Vec<WeatherSnapshotRecord>>>) {
        let records = match reply {
            Ok(ApiReply::Data(records)) => records,
            Ok(ApiReply::Error(e)) => {
                warn!("backend reported snapshot error: {}", e.error);
                self.surface.set_html(Panel::WeatherCards, error_placeholder(&e.error));
                return;
            }
            Err(e) => {
                error!("Error loading snapshot: {e}");
                self.surface.set_html(Panel::WeatherCards, error_placeholder("Error loading data"));
                return;
            }
        };

        if records.is_empty() {
            self.surface.set_html(Panel::WeatherCards, placeholder("No weather data available"));
            return;
        }

        self.insights = generate_insights(&records);
        self.surface.set_html(Panel::Insights, render_insights(&self.insights));
        self.surface.set_html(Panel::WeatherCards, render_cards(&records));
        self.surface.set_options(Control::CitySelect, city_options(&records, "Select a city"));
        self.surface
            .set_options(Control::ForecastCitySelect, city_options(&records, "Choose a city"));

        let now = Local::now();
        self.surface.set_html(Panel::LastUpdate, html_escape(&format_refresh_time(&now)));
        self.last_refresh = Some(now);
        self.surface.reload_map();

        info!("snapshot refreshed: {} cities, {} insights", records.len(), self.insights.len());
        self.snapshot = records;
    }

    fn apply_forecast(&mut self, city: &str, reply: Result<ApiReply<ForecastResponse>>) {
        self.forecast.clear();
        let html = match reply {
            Ok(ApiReply::Data(forecast)) if forecast.daily.is_empty() => {
                placeholder("No forecast data available")
            }
            Ok(ApiReply::Data(forecast)) => {
                info!("forecast for {city}: {} days", forecast.daily.len());
                let html = render_forecast(&forecast.daily);
                self.forecast = forecast.daily;
                html
            }
            Ok(ApiReply::Error(e)) => {
                warn!("backend reported forecast error for {city}: {}", e.error);
                error_placeholder(&e.error)
            }
            Err(e) => {
                error!("Error loading forecast for {city}: {e}");
                error_placeholder("Error loading forecast")
            }
        };
        self.surface.set_html(Panel::Forecast, html);
    }

    fn apply_trends(&mut self, city: &str, reply: Result<ApiReply<TrendSeries>>) {
        let series = match reply {
            Ok(ApiReply::Data(series)) => series,
            Ok(ApiReply::Error(e)) => {
                // Leaves whatever chart is showing.
                error!("Error loading trends for {city}: {}", e.error);
                return;
            }
            Err(e) => {
                error!("Error loading trends for {city}: {e}");
                self.chart.destroy();
                return;
            }
        };

        info!("raw data received for {city}: {} points", series.len());
        if let Err(e) = series.check_aligned() {
            error!("Error loading trends for {city}: {e}");
            self.chart.destroy();
            return;
        }

        self.chart.destroy();

        let range_days = self.selected_range_days();
        let metric = self.selected_metric();
        let window = filter_window(&series, range_days, self.clock.now());
        info!(
            "{city}: {} of {} points in the last {range_days} days{}",
            window.points.len(),
            series.len(),
            if window.fell_back { " (showing all)" } else { "" }
        );

        let spec = ChartSpec::line(&window.points, metric, self.theme);
        let points = spec.point_count();
        self.chart.replace(&mut self.charts, spec);
        info!("chart created for {city} ({metric}) with {points} data points");
    }

    /// Flip, persist and apply the theme; recolors a live chart.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.surface.set_theme(self.theme);
        if let Err(e) = self.prefs.set(THEME_KEY, self.theme.as_str()) {
            warn!("could not persist theme preference: {e:#}");
        }
        if self.chart.is_live() {
            self.update_chart_theme();
        }
        self.theme
    }

    /// Recolor the live chart for the current theme. Returns false if none is live.
    pub fn update_chart_theme(&mut self) -> bool {
        self.chart.recolor(Palette::for_theme(self.theme))
    }

    fn selected_range_days(&self) -> i64 {
        self.surface
            .value(Control::DateRangeSelect)
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|d| *d > 0)
            .unwrap_or(self.default_range_days)
    }

    fn selected_metric(&self) -> Metric {
        self.surface.value(Control::MetricSelect).parse().unwrap_or_default()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn snapshot(&self) -> &[WeatherSnapshotRecord] {
        &self.snapshot
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    /// Days currently shown in the forecast panel.
    pub fn forecast(&self) -> &[ForecastDay] {
        &self.forecast
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn chart(&self) -> Option<&dyn ChartInstance> {
        self.chart.live()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.prefs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        chart::AxisId,
        model::{BackendError, ForecastResponse},
        page::HtmlPage,
        prefs::MemoryPreferenceStore,
        testing::{FakeApi, RecordingCharts, backend_error, forecast_day, record, series},
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn session() -> (Session<HtmlPage, RecordingCharts>, RecordingCharts) {
        let charts = RecordingCharts::default();
        let session = Session::new(
            HtmlPage::new(),
            charts.clone(),
            Box::new(MemoryPreferenceStore::default()),
        )
        .with_fixed_clock(now());
        (session, charts)
    }

    fn trends_ok(city: &str, labels: &[&str]) -> Reply {
        Reply::Trends { city: city.to_string(), reply: Ok(ApiReply::Data(series(labels))) }
    }

    fn api_with_snapshot(records: Vec<WeatherSnapshotRecord>) -> FakeApi {
        FakeApi { latest: Some(ApiReply::Data(records)), ..FakeApi::default() }
    }

    #[test]
    fn init_restores_persisted_theme() {
        let mut prefs = MemoryPreferenceStore::default();
        prefs.set(THEME_KEY, "dark").unwrap();
        let mut session = Session::new(HtmlPage::new(), RecordingCharts::default(), Box::new(prefs));

        assert_eq!(session.init(), Fetch::Snapshot);
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.surface().theme(), Theme::Dark);
    }

    #[test]
    fn init_defaults_to_light_for_unknown_preference() {
        let mut prefs = MemoryPreferenceStore::default();
        prefs.set(THEME_KEY, "sepia").unwrap();
        let mut session = Session::new(HtmlPage::new(), RecordingCharts::default(), Box::new(prefs));

        assert_eq!(session.restore_theme(), Theme::Light);
        assert_eq!(session.theme(), Theme::Light);
    }

    #[test]
    fn restored_theme_leaves_panels_untouched() {
        let mut prefs = MemoryPreferenceStore::default();
        prefs.set(THEME_KEY, "dark").unwrap();
        let mut session = Session::new(HtmlPage::new(), RecordingCharts::default(), Box::new(prefs));

        assert_eq!(session.restore_theme(), Theme::Dark);
        assert!(session.snapshot().is_empty());
        assert_eq!(session.surface().map_revision(), 0);
        assert_eq!(session.surface().theme(), Theme::Dark);
        assert!(session.surface().html(Panel::WeatherCards).contains("Loading"));
    }

    #[tokio::test]
    async fn snapshot_refresh_renders_every_panel() {
        let (mut session, _) = session();
        let api = api_with_snapshot(vec![
            record("Tokyo", 90.0, "clear sky"),
            record("Oslo", 30.0, "light snow"),
        ]);

        session.refresh_snapshot(&api).await;

        let page = session.surface();
        assert_eq!(session.snapshot().len(), 2);
        assert_eq!(page.html(Panel::WeatherCards).matches("weather-card").count(), 2);
        assert!(page.html(Panel::Insights).contains("Heat Advisory"));
        assert!(page.html(Panel::Insights).contains("Cold Weather"));
        let cities: Vec<_> = page.options(Control::CitySelect).iter().map(|o| o.value.as_str()).collect();
        assert_eq!(cities, ["", "Tokyo", "Oslo"]);
        assert_eq!(page.options(Control::ForecastCitySelect).len(), 3);
        assert!(!page.html(Panel::LastUpdate).is_empty());
        assert_eq!(page.map_revision(), 1);
        assert!(session.last_refresh().is_some());
    }

    #[tokio::test]
    async fn snapshot_error_payload_is_shown_and_state_kept() {
        let (mut session, _) = session();
        session.refresh_snapshot(&api_with_snapshot(vec![record("Paris", 60.0, "mist")])).await;

        let api = FakeApi { latest: Some(backend_error("connection refused")), ..FakeApi::default() };
        session.refresh_snapshot(&api).await;

        assert_eq!(
            session.surface().html(Panel::WeatherCards),
            r#"<div class="loading">⚠️ connection refused</div>"#
        );
        assert_eq!(session.snapshot()[0].city, "Paris");
        assert!(session.surface().html(Panel::Insights).contains("Global Average"));
    }

    #[tokio::test]
    async fn snapshot_transport_failure_shows_generic_error() {
        let (mut session, _) = session();
        session.refresh_snapshot(&FakeApi::default()).await;

        assert!(session.surface().html(Panel::WeatherCards).contains("⚠️ Error loading data"));
        assert!(session.snapshot().is_empty());
        assert_eq!(session.surface().map_revision(), 0);
    }

    #[tokio::test]
    async fn empty_snapshot_shows_no_data() {
        let (mut session, _) = session();
        session.refresh_snapshot(&api_with_snapshot(vec![])).await;

        assert!(session.surface().html(Panel::WeatherCards).contains("No weather data available"));
    }

    #[tokio::test]
    async fn refresh_unselects_vanished_city() {
        let (mut session, _) = session();
        session
            .refresh_snapshot(&api_with_snapshot(vec![
                record("Tokyo", 70.0, "clear sky"),
                record("Paris", 60.0, "mist"),
            ]))
            .await;
        session.surface_mut().set_value(Control::CitySelect, "Paris");
        session.surface_mut().set_value(Control::ForecastCitySelect, "Tokyo");

        session.refresh_snapshot(&api_with_snapshot(vec![record("Tokyo", 71.0, "clear sky")])).await;

        assert_eq!(session.surface().value(Control::CitySelect), "");
        assert_eq!(session.surface().value(Control::ForecastCitySelect), "Tokyo");
        assert_eq!(session.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn forecast_panel_states() {
        let (mut session, _) = session();
        let mut api = FakeApi::default();
        api.forecasts.insert(
            "Tokyo".into(),
            ApiReply::Data(ForecastResponse {
                city: Some("Tokyo".into()),
                daily: vec![forecast_day("2024-01-05", 0.0), forecast_day("2024-01-06", 40.0)],
            }),
        );
        api.forecasts.insert("Lima".into(), ApiReply::Data(ForecastResponse::default()));
        api.forecasts.insert(
            "Atlantis".into(),
            ApiReply::Error(BackendError {
                error: "City coordinates not found for: Atlantis".into(),
                details: None,
            }),
        );

        session.load_forecast(&api, "").await;
        assert!(session.surface().html(Panel::Forecast).contains("Select a city to view forecast"));

        session.load_forecast(&api, "Tokyo").await;
        let html = session.surface().html(Panel::Forecast).to_string();
        assert_eq!(html.matches("forecast-card").count(), 2);
        assert_eq!(session.forecast().len(), 2);
        assert_eq!(html.matches("% chance").count(), 1);
        assert!(html.contains("🌧 40% chance"));
        assert!(html.contains("Fri, Jan 5"));

        session.load_forecast(&api, "Lima").await;
        assert!(session.surface().html(Panel::Forecast).contains("No forecast data available"));

        session.load_forecast(&api, "Atlantis").await;
        assert!(session.surface().html(Panel::Forecast).contains("⚠️ City coordinates not found"));

        session.load_forecast(&api, "Nowhere").await;
        assert!(session.surface().html(Panel::Forecast).contains("⚠️ Error loading forecast"));
        assert!(session.forecast().is_empty());
    }

    #[test]
    fn forecast_request_shows_loading_until_reply() {
        let (mut session, _) = session();

        let request = session.dispatch(Control::ForecastCitySelect, Some("Tokyo"));

        assert_eq!(request, Some(Fetch::Forecast("Tokyo".into())));
        assert!(session.surface().html(Panel::Forecast).contains("Loading forecast"));
    }

    #[tokio::test]
    async fn trends_render_one_chart_with_filtered_points() {
        let (mut session, charts) = session();
        let mut api = FakeApi::default();
        api.trends.insert("Tokyo".into(), ApiReply::Data(series(&["1/6 10:00", "1/5 10:00"])));

        session.load_trends(&api, "Tokyo").await;

        assert_eq!(charts.alive(), 1);
        let chart = session.chart().expect("chart is live");
        assert_eq!(chart.spec().labels, ["1/5 10:00", "1/6 10:00"]);
        // Default metric plots both series.
        assert_eq!(chart.spec().datasets.len(), 2);
        assert_eq!(chart.spec().datasets[0].data, [51.0, 50.0]);
    }

    #[test]
    fn metric_and_range_controls_shape_the_chart() {
        let (mut session, _) = session();
        session.surface_mut().set_value(Control::MetricSelect, "humidity");
        session.surface_mut().set_value(Control::DateRangeSelect, "1");

        session.apply(trends_ok("Tokyo", &["1/5 10:00", "1/9 12:00"]));

        let spec = session.chart().unwrap().spec();
        assert_eq!(spec.labels, ["1/9 12:00"]);
        assert_eq!(spec.datasets.len(), 1);
        assert_eq!(spec.datasets[0].axis, AxisId::Primary);
        assert_eq!(spec.datasets[0].data, [69.0]);
    }

    #[test]
    fn empty_city_destroys_live_chart() {
        let (mut session, charts) = session();
        session.apply(trends_ok("Tokyo", &["1/5 10:00"]));
        assert_eq!(charts.alive(), 1);

        assert_eq!(session.dispatch(Control::CitySelect, Some("")), None);

        assert_eq!(charts.alive(), 0);
        assert!(session.chart().is_none());
    }

    #[test]
    fn backend_error_leaves_chart_untouched() {
        let (mut session, charts) = session();
        session.apply(trends_ok("Tokyo", &["1/5 10:00"]));

        session.apply(Reply::Trends { city: "Paris".into(), reply: Ok(backend_error("db down")) });

        assert_eq!(charts.alive(), 1);
        assert_eq!(session.chart().unwrap().spec().labels, ["1/5 10:00"]);
    }

    #[tokio::test]
    async fn transport_failure_destroys_chart() {
        let (mut session, charts) = session();
        session.apply(trends_ok("Tokyo", &["1/5 10:00"]));

        session.load_trends(&FakeApi::default(), "Paris").await;

        assert_eq!(charts.alive(), 0);
    }

    #[test]
    fn misaligned_series_is_not_charted() {
        let (mut session, charts) = session();
        let mut bad = series(&["1/5 10:00", "1/6 10:00"]);
        bad.humidity.pop();

        session.apply(Reply::Trends { city: "Tokyo".into(), reply: Ok(ApiReply::Data(bad)) });

        assert_eq!(charts.alive(), 0);
        assert!(charts.created().is_empty());
    }

    #[tokio::test]
    async fn only_second_of_two_requests_resolving_leaves_one_chart() {
        let (mut session, charts) = session();
        let mut api = FakeApi::default();
        api.trends.insert("Paris".into(), ApiReply::Data(series(&["1/8 10:00"])));

        let first = session.dispatch(Control::CitySelect, Some("Tokyo"));
        let second = session.dispatch(Control::CitySelect, Some("Paris"));
        assert_eq!(first, Some(Fetch::Trends("Tokyo".into())));

        // The Tokyo request never resolves.
        session.apply(fetch(&api, second.unwrap()).await);

        assert_eq!(charts.alive(), 1);
        assert_eq!(session.chart().unwrap().spec().labels, ["1/8 10:00"]);
    }

    #[test]
    fn later_resolving_reply_wins() {
        let (mut session, charts) = session();
        session.dispatch(Control::CitySelect, Some("Tokyo"));
        session.dispatch(Control::CitySelect, Some("Paris"));

        // Paris resolves first, Tokyo's stale reply lands afterwards.
        session.apply(trends_ok("Paris", &["1/8 10:00"]));
        session.apply(trends_ok("Tokyo", &["1/7 10:00", "1/9 10:00"]));

        assert_eq!(charts.alive(), 1);
        assert_eq!(charts.created().len(), 2);
        assert_eq!(session.chart().unwrap().spec().point_count(), 2);
    }

    #[test]
    fn metric_change_without_city_is_a_no_op() {
        let (mut session, _) = session();

        assert_eq!(session.dispatch(Control::MetricSelect, Some("temp")), None);
        assert_eq!(session.dispatch(Control::DateRangeSelect, Some("3")), None);
        assert_eq!(session.surface().value(Control::MetricSelect), "temp");
    }

    #[test]
    fn metric_change_reloads_selected_city() {
        let (mut session, _) = session();
        session.surface_mut().set_value(Control::CitySelect, "Sydney");

        assert_eq!(
            session.dispatch(Control::MetricSelect, Some("temp")),
            Some(Fetch::Trends("Sydney".into()))
        );
    }

    #[test]
    fn theme_toggle_persists_and_recolors_live_chart() {
        let (mut session, charts) = session();
        session.init();

        assert_eq!(session.dispatch(Control::ThemeToggle, None), None);
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.preferences().get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(charts.recolors(), 0);

        session.apply(trends_ok("Tokyo", &["1/5 10:00"]));
        assert_eq!(session.chart().unwrap().spec().palette, Palette::for_theme(Theme::Dark));

        session.toggle_theme();
        assert_eq!(charts.recolors(), 1);
        assert_eq!(charts.alive(), 1);
        assert_eq!(session.chart().unwrap().spec().palette, Palette::for_theme(Theme::Light));
        assert_eq!(session.surface().theme(), Theme::Light);
    }

    #[test]
    fn update_chart_theme_without_chart_does_nothing() {
        let (mut session, charts) = session();
        assert!(!session.update_chart_theme());
        assert_eq!(charts.recolors(), 0);
    }
}
