use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use dashboard_core::{
    App, ChartJsBackend, Config, Control, ControlEvent, DashboardApi, HtmlPage, HttpBackend,
    Metric, PreferenceStore, Session, Surface, Theme, TomlPreferenceStore,
    prefs::THEME_KEY,
    render::rounded,
};
use inquire::{CustomType, Select, Text};
use log::{info, warn};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

type DashboardSession = Session<HtmlPage, ChartJsBackend>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard client")]
pub struct Cli {
    /// Backend base URL, overriding the configured one.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Write the rendered dashboard page to this file.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// More log output (-v info, -vv debug). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the backend URL and refresh settings.
    Configure,

    /// Load the latest snapshot and print cards and insights.
    Snapshot,

    /// Show the multi-day forecast for a city.
    Forecast {
        city: String,
    },

    /// Chart a city's recent temperature and humidity.
    Trends {
        city: String,

        #[arg(long, default_value = "all", value_parser = ["temp", "humidity", "all"])]
        metric: String,

        /// Trailing window in days.
        #[arg(long)]
        range: Option<u32>,
    },

    /// Show or change the persisted theme: "light", "dark" or "toggle".
    /// Prompts when no choice is given.
    Theme {
        choice: Option<String>,
    },

    /// Keep the dashboard running and read control events from stdin.
    ///
    /// Lines: `city <name>`, `metric <temp|humidity|all>`, `range <days>`,
    /// `forecast <name>`, `theme`, `quit`. Runs until `quit` or Ctrl-C, even
    /// after stdin closes.
    Watch {
        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        forecast_city: Option<String>,
    },

    /// Check that the backend is reachable.
    Health,
}

impl Cli {
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(out) = self.out {
            config.out_path = Some(out);
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Snapshot => snapshot(&config).await,
            Command::Forecast { city } => forecast(&config, &city).await,
            Command::Trends { city, metric, range } => trends(&config, &city, &metric, range).await,
            Command::Theme { choice } => theme(choice.as_deref()),
            Command::Watch { city, forecast_city } => watch(config, city, forecast_city).await,
            Command::Health => health(&config).await,
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    config.base_url = Text::new("Backend URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read backend URL")?;
    HttpBackend::new(&config.base_url, config.request_timeout())
        .context("Backend URL is not usable")?;

    config.refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(config.refresh_interval_secs)
        .prompt()
        .context("Failed to read refresh interval")?;

    config.default_range_days = CustomType::<i64>::new("Default trend range (days):")
        .with_default(config.default_range_days)
        .prompt()
        .context("Failed to read trend range")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Build a session around an HTML page. One-shot commands restore the theme
/// themselves; `watch` leaves startup to the event loop.
fn open_session(config: &Config, api: &HttpBackend) -> Result<DashboardSession> {
    let map_url = api.endpoint(&["api", "map"])?;
    let page = HtmlPage::new().with_map_url(map_url.to_string());
    let charts = ChartJsBackend::new(page.canvas());
    let prefs = TomlPreferenceStore::open(Config::preferences_file_path()?)?;

    Ok(Session::new(page, charts, Box::new(prefs)).with_default_range(config.default_range_days))
}

fn write_page(session: &DashboardSession, out: Option<&Path>) -> Result<()> {
    let Some(path) = out else {
        return Ok(());
    };

    fs::write(path, session.surface().to_document())
        .with_context(|| format!("Failed to write dashboard page: {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

async fn snapshot(config: &Config) -> Result<()> {
    let api = HttpBackend::from_config(config)?;
    let mut session = open_session(config, &api)?;
    session.restore_theme();

    session.refresh_snapshot(&api).await;
    write_page(&session, config.out_path.as_deref())?;

    if session.snapshot().is_empty() {
        bail!("No snapshot data from {} (run with -v for details)", config.base_url);
    }

    for r in session.snapshot() {
        println!(
            "{:<16} {:>4}°F  feels {:>4}°F  {:<20} {:>5}%  {:>6} mph  {}",
            r.city,
            rounded(r.temperature),
            rounded(r.feels_like_or_temperature()),
            r.condition,
            r.humidity,
            r.wind_speed,
            r.local_time,
        );
    }
    println!();
    for i in session.insights() {
        println!("{} {}: {} ({})", i.icon, i.title, i.content, i.detail);
    }
    if let Some(at) = session.last_refresh() {
        println!("\nLast updated {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

async fn forecast(config: &Config, city: &str) -> Result<()> {
    let api = HttpBackend::from_config(config)?;
    let mut session = open_session(config, &api)?;
    session.restore_theme();

    session.load_forecast(&api, city).await;
    write_page(&session, config.out_path.as_deref())?;

    if session.forecast().is_empty() {
        bail!("No forecast available for {city} (run with -v for details)");
    }
    for day in session.forecast() {
        let rain = if day.pop_max > 0.0 {
            format!("  🌧 {}% chance", rounded(day.pop_max))
        } else {
            String::new()
        };
        println!(
            "{:<12} {:>4}°F ({}° / {}°)  {:<18} 💧 {}% | 💨 {} mph{rain}",
            dashboard_core::render::forecast::format_day_label(&day.date),
            rounded(day.temp_avg),
            rounded(day.temp_min),
            rounded(day.temp_max),
            day.condition,
            rounded(day.humidity_avg),
            rounded(day.wind_speed_avg),
        );
    }
    Ok(())
}

async fn trends(config: &Config, city: &str, metric: &str, range: Option<u32>) -> Result<()> {
    let api = HttpBackend::from_config(config)?;
    let mut session = open_session(config, &api)?;
    session.restore_theme();

    session.surface_mut().set_value(Control::MetricSelect, metric);
    if let Some(days) = range {
        session.surface_mut().set_value(Control::DateRangeSelect, &days.to_string());
    }
    session.surface_mut().set_value(Control::CitySelect, city);
    session.load_trends(&api, city).await;
    write_page(&session, config.out_path.as_deref())?;

    let Some(chart) = session.chart() else {
        bail!("No trend data for {city} (run with -v for details)");
    };
    let spec = chart.spec();
    println!(
        "{city}: {} points ({} .. {})",
        spec.point_count(),
        spec.labels.first().map(String::as_str).unwrap_or("-"),
        spec.labels.last().map(String::as_str).unwrap_or("-"),
    );
    for ds in &spec.datasets {
        let min = ds.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ds.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        match ds.data.last() {
            Some(last) => println!(
                "  {:<18} min {:>6.1}  max {:>6.1}  latest {:>6.1}",
                ds.label, min, max, last
            ),
            None => println!("  {:<18} no data", ds.label),
        }
    }
    Ok(())
}

fn theme(choice: Option<&str>) -> Result<()> {
    let mut prefs = TomlPreferenceStore::open(Config::preferences_file_path()?)?;
    let current: Theme = prefs.get(THEME_KEY).and_then(|t| t.parse().ok()).unwrap_or_default();

    let next = match choice {
        Some("toggle") => current.toggled(),
        Some(other) => other.parse::<Theme>()?,
        None => {
            let options = vec![Theme::Light, Theme::Dark];
            let start = options.iter().position(|t| *t == current).unwrap_or(0);
            Select::new("Theme:", options)
                .with_starting_cursor(start)
                .prompt()
                .context("Failed to read theme choice")?
        }
    };

    if next == current {
        println!("Theme: {next}");
    } else {
        prefs.set(THEME_KEY, next.as_str())?;
        println!("Theme: {next} (saved to {})", prefs.path().display());
    }
    Ok(())
}

async fn watch(config: Config, city: Option<String>, forecast_city: Option<String>) -> Result<()> {
    let api = Arc::new(HttpBackend::from_config(&config)?);
    let session = open_session(&config, &api)?;

    if config.out_path.is_none() {
        warn!("no --out path configured; the page will not be written anywhere");
    }

    let (tx, rx) = mpsc::unbounded_channel();
    if let Some(city) = city {
        tx.send(ControlEvent::change(Control::CitySelect, city))?;
    }
    if let Some(city) = forecast_city {
        tx.send(ControlEvent::change(Control::ForecastCitySelect, city))?;
    }
    tokio::spawn(read_events(BufReader::new(tokio::io::stdin()), tx, ctrl_c()));

    let out = config.out_path.clone();
    let app = App::new(session, api, config.refresh_interval());
    app.run(rx, |session| {
        if let Err(e) = write_page(session, out.as_deref()) {
            warn!("{e:#}");
        }
    })
    .await;

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(ControlEvent),
    Quit,
    Skip,
}

fn parse_input(line: &str) -> Result<Input> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let event = match command {
        "" => return Ok(Input::Skip),
        "quit" | "exit" => return Ok(Input::Quit),
        "theme" => ControlEvent::click(Control::ThemeToggle),
        "city" => ControlEvent::change(Control::CitySelect, arg),
        "forecast" => ControlEvent::change(Control::ForecastCitySelect, arg),
        "metric" => {
            let metric: Metric = arg.parse()?;
            ControlEvent::change(Control::MetricSelect, metric.as_str())
        }
        "range" => {
            let days: u32 = arg.parse().map_err(|_| anyhow!("range must be a number of days, got '{arg}'"))?;
            ControlEvent::change(Control::DateRangeSelect, days.to_string())
        }
        other => bail!("unknown command '{other}'"),
    };
    Ok(Input::Event(event))
}

/// Forward parsed lines from `input` until `quit` or `shutdown`. End of input
/// does not stop the dashboard; only `quit` or `shutdown` drop the sender.
async fn read_events<R>(
    input: R,
    tx: mpsc::UnboundedSender<ControlEvent>,
    shutdown: impl Future<Output = ()>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
            line = lines.next_line(), if input_open => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("input closed; running until interrupted");
                input_open = false;
                continue;
            }
            Err(e) => {
                warn!("failed to read input: {e}");
                input_open = false;
                continue;
            }
        };

        match parse_input(&line) {
            Ok(Input::Event(event)) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Ok(Input::Quit) => break,
            Ok(Input::Skip) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn health(config: &Config) -> Result<()> {
    let api = HttpBackend::from_config(config)?;
    let status = api.health().await.context("Backend health check failed")?;

    println!(
        "{}: {} (checked {})",
        config.base_url,
        status.status,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
