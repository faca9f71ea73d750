//! Event loop driving a [`Session`]: control events, the refresh timer and
//! in-flight fetches.

use std::{sync::Arc, time::Duration};

use log::{debug, error, info};
use tokio::{
    sync::mpsc,
    task::JoinSet,
    time::{Instant, MissedTickBehavior, interval_at},
};

use crate::{
    api::DashboardApi,
    chart::ChartBackend,
    page::{Control, Surface},
    session::{Fetch, Reply, Session, fetch},
};

/// A user interaction with one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub control: Control,
    pub value: Option<String>,
}

impl ControlEvent {
    pub fn change(control: Control, value: impl Into<String>) -> Self {
        Self { control, value: Some(value.into()) }
    }

    pub fn click(control: Control) -> Self {
        Self { control, value: None }
    }
}

pub struct App<S, C> {
    session: Session<S, C>,
    api: Arc<dyn DashboardApi>,
    refresh_every: Duration,
}

impl<S: Surface, C: ChartBackend> App<S, C> {
    pub fn new(session: Session<S, C>, api: Arc<dyn DashboardApi>, refresh_every: Duration) -> Self {
        Self { session, api, refresh_every }
    }

    /// Run until `events` closes, then finish in-flight fetches and return the
    /// session. `on_update` runs after every state change.
    ///
    /// Fetches run concurrently; replies are applied one at a time in the
    /// order they complete, so a slow stale reply can overwrite a newer one.
    pub async fn run<F>(mut self, mut events: mpsc::UnboundedReceiver<ControlEvent>, mut on_update: F) -> Session<S, C>
    where
        F: FnMut(&Session<S, C>),
    {
        let mut tasks = JoinSet::new();

        let first = self.session.init();
        on_update(&self.session);
        self.spawn(&mut tasks, first);

        let mut ticker = interval_at(Instant::now() + self.refresh_every, self.refresh_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("refresh timer fired");
                    let request = self.session.request_snapshot();
                    self.spawn(&mut tasks, request);
                }
                event = events.recv() => match event {
                    Some(event) => {
                        debug!("{} changed: {:?}", event.control.id(), event.value);
                        if let Some(request) = self.session.dispatch(event.control, event.value.as_deref()) {
                            self.spawn(&mut tasks, request);
                        }
                        on_update(&self.session);
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next() => self.finish(joined, &mut on_update),
            }
        }

        info!("event stream closed, waiting for {} pending requests", tasks.len());
        while let Some(joined) = tasks.join_next().await {
            self.finish(joined, &mut on_update);
        }

        self.session
    }

    fn spawn(&self, tasks: &mut JoinSet<Reply>, request: Fetch) {
        let api = Arc::clone(&self.api);
        tasks.spawn(async move { fetch(api.as_ref(), request).await });
    }

    fn finish<F>(&mut self, joined: Result<Reply, tokio::task::JoinError>, on_update: &mut F)
    where
        F: FnMut(&Session<S, C>),
    {
        match joined {
            Ok(reply) => {
                self.session.apply(reply);
                on_update(&self.session);
            }
            Err(e) => error!("fetch task failed: {e}"),
        }
    }
}
