//! Replays a scripted profile/navigator session against an in-memory API and
//! prints every view-model output as a JSON line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use backed_feed::config::Config;
use backed_feed::environment::Environment;
use backed_feed::fixture::{FixtureApi, RecordingAnalytics};
use backed_feed::logging;
use backed_feed::models::{RefTag, User};
use backed_feed::navigator::{PanSample, ProjectNavigator};
use backed_feed::profile::ProfileFeed;
use backed_feed::signal::{Property, Signal, Subscription};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "backed-feed", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON fixture with `projects`, `user` and `page_size`.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Default tracing filter, overridden by BACKED_FEED_LOG.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug)]
struct OutputEvent {
    output: &'static str,
    value: Value,
}

/// Forwards view-model outputs to stdout and lets the script wait for them.
struct Recorder {
    tx: UnboundedSender<OutputEvent>,
    rx: UnboundedReceiver<OutputEvent>,
    subscriptions: Vec<Subscription>,
}

impl Recorder {
    fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            tx,
            rx,
            subscriptions: Vec::new(),
        }
    }

    fn watch<T>(&mut self, output: &'static str, signal: &Signal<T>)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let tx = self.tx.clone();
        self.subscriptions.push(signal.observe(move |value: &T| {
            let value = serde_json::to_value(value).unwrap_or_default();
            let _ = tx.send(OutputEvent { output, value });
        }));
    }

    fn print(event: &OutputEvent) {
        println!("{}", json!({ "output": event.output, "value": event.value }));
    }

    /// Print everything already emitted.
    fn drain(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            Self::print(&event);
        }
    }

    /// Print events until one matches `done`.
    async fn wait_for<F>(&mut self, what: &str, mut done: F) -> anyhow::Result<()>
    where
        F: FnMut(&OutputEvent) -> bool,
    {
        loop {
            let event = tokio::time::timeout(SETTLE_TIMEOUT, self.rx.recv())
                .await
                .with_context(|| format!("timed out waiting for {what}"))?;
            let Some(event) = event else {
                bail!("output channel closed while waiting for {what}");
            };
            Self::print(&event);
            if done(&event) {
                return Ok(());
            }
        }
    }

    async fn wait_until_loaded(&mut self) -> anyhow::Result<()> {
        self.wait_for("page load", is_loaded).await
    }
}

fn is_loaded(event: &OutputEvent) -> bool {
    event.output == "is_refreshing" && event.value == Value::Bool(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!(?config, "configuration loaded");

    let api = match &cli.fixture {
        Some(path) => FixtureApi::load(path)
            .with_context(|| format!("failed to load fixture {}", path.display()))?,
        None => FixtureApi::sample(),
    };

    let session: Arc<Property<Option<User>>> = Arc::new(Property::new(None));
    let analytics = Arc::new(RecordingAnalytics::default());
    let env = Environment::new(Arc::new(api), session.clone(), analytics.clone());

    let feed = ProfileFeed::new(&env, &config.feed)?;
    let navigator = ProjectNavigator::new(env.analytics.clone(), &config.navigator);

    let mut recorder = Recorder::new();
    let profile = feed.outputs();
    recorder.watch("user", &profile.user);
    recorder.watch("backed_projects", &profile.backed_projects);
    recorder.watch("is_refreshing", &profile.is_refreshing);
    recorder.watch("show_empty_state", &profile.show_empty_state);
    recorder.watch("go_to_project", &profile.go_to_project);
    recorder.watch("go_to_settings", &profile.go_to_settings);
    recorder.watch("scroll_to_project_item", &profile.scroll_to_project_item);
    recorder.watch("fetch_error", &profile.fetch_errors.map(|e| e.to_string()));

    let nav = navigator.outputs();
    recorder.watch("set_initial_pager_view_controller", &nav.set_initial_pager_view_controller);
    recorder.watch("dismiss_view_controller", &nav.transition.dismiss_view_controller);
    recorder.watch("update_interactive_transition", &nav.transition.update_interactive_transition);
    recorder.watch("cancel_interactive_transition", &nav.transition.cancel_interactive_transition);
    recorder.watch("finish_interactive_transition", &nav.transition.finish_interactive_transition);
    recorder.watch(
        "set_transition_animator_is_in_flight",
        &nav.transition.set_transition_animator_is_in_flight,
    );
    recorder.watch(
        "notify_delegate_transitioned_to_project_index",
        &nav.swipe.notify_delegate_transitioned_to_project_index,
    );
    recorder.watch(
        "set_needs_status_bar_appearance_update",
        &nav.swipe.set_needs_status_bar_appearance_update,
    );

    // First appearance loads the first page and the user.
    feed.view_will_appear(false);
    let (mut loaded, mut user_settled) = (false, false);
    recorder
        .wait_for("first page and user", |e| {
            loaded |= is_loaded(e);
            user_settled |= e.output == "user" || e.output == "fetch_error";
            loaded && user_settled
        })
        .await?;

    // Scroll every row into view until the last page has arrived.
    loop {
        recorder.drain();
        let total = feed.backed_projects().len();
        for row in 0..total {
            feed.will_display_row(row, total);
        }
        if feed.is_refreshing() {
            recorder.wait_until_loaded().await?;
        } else if feed.backed_projects().len() == total {
            break;
        }
    }
    recorder.drain();

    let projects = feed.backed_projects();
    let Some(tapped) = projects.first().cloned() else {
        tracing::info!("no backed projects; stopping after the feed");
        return Ok(());
    };
    let total = projects.len();

    feed.project_tapped(tapped.clone());
    navigator.configure_with(tapped, RefTag::ProfileBacked);
    navigator.view_did_load();
    recorder.drain();

    // Swipe to the next project, then start a swipe and abandon it.
    if let Some(next) = projects.get(1).cloned() {
        navigator.will_transition_to(next, 1);
        navigator.page_transition_completed(true, 0);
        feed.transitioned_to_project(1, total);
    }
    if let Some(next) = projects.get(2).cloned() {
        navigator.will_transition_to(next, 2);
        navigator.page_transition_completed(false, 1);
    }
    recorder.drain();

    // Pull the page down past the top and let go.
    for sample in [
        PanSample::vertical(40.0, -40.0, -80.0, true),
        PanSample::vertical(0.0, 0.0, 60.0, true),
        PanSample::vertical(-60.0, 60.0, 90.0, true),
        PanSample::vertical(-120.0, 120.0, 90.0, true),
        PanSample::vertical(-120.0, 120.0, 40.0, false),
    ] {
        navigator.pan(sample);
    }
    recorder.drain();

    feed.settings_button_tapped();
    feed.refresh();
    recorder.wait_until_loaded().await?;

    println!("{}", json!({ "output": "analytics", "value": analytics.events() }));
    Ok(())
}
