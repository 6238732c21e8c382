//! qsession - replay a recorded transport script through a session
//!
//! Reads JSON-lines transport events, drives a [`Session`] with them, prints
//! every outbound call on stdout and logs session events on stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use futures_util::StreamExt;
use quassel_proto::TransportEvent;
use quassel_session::config::{Config, LogFormat, LoggingConfig};
use quassel_session::storage::MemoryStorage;
use quassel_session::{Session, SessionEvent, metrics};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<String>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            Config::load(&path).with_context(|| format!("failed to load config from {path}"))
        }
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load config from {DEFAULT_CONFIG}")),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = load_config(args.next())?;
    init_tracing(&config.logging);

    let script: PathBuf = match args.next().map(PathBuf::from).or(config.replay.path.clone()) {
        Some(path) => path,
        None => {
            error!("No transport script given");
            anyhow::bail!("usage: qsession [config.toml] [script.jsonl]");
        }
    };

    if config.metrics.enabled {
        metrics::init();
    }

    let storage = Arc::new(MemoryStorage::new());
    let (mut session, channels) = Session::new(config.session.clone(), storage.clone());
    let reader = session.reader();

    let mut outbound = channels.outbound;
    let printer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(call) = outbound.recv().await {
            match serde_json::to_string(&call) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode outbound call"),
            }
            count += 1;
        }
        count
    });

    let mut events = channels.events;
    let event_log = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                SessionEvent::CriticalError { message } => error!(%message, "Critical notice"),
                SessionEvent::PhaseChanged { from, to } => info!(%from, %to, "Phase event"),
                other => info!(event = ?other, "Session event"),
            }
        }
    });

    info!(script = %script.display(), "Replaying transport script");
    let file = tokio::fs::File::open(&script)
        .await
        .with_context(|| format!("failed to open {}", script.display()))?;
    let mut lines = FramedRead::new(file, LinesCodec::new());

    let mut line_no = 0usize;
    while let Some(line) = lines.next().await {
        line_no += 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event: TransportEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed transport event");
                continue;
            }
        };
        let result = match event {
            TransportEvent::Connecting => session.connect(),
            TransportEvent::Established { state } => session.establish(state),
            TransportEvent::Call { call } => session.dispatch_inbound(call),
            TransportEvent::Lost => {
                session.disconnect();
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!(line = line_no, error = %e, "Transport event rejected");
        }
    }

    let snapshot = reader.snapshot();
    drop(session);
    let sent = printer.await.context("outbound printer task failed")?;
    event_log.await.context("event log task failed")?;

    info!(
        phase = %snapshot.phase,
        networks = snapshot.registry.networks().len(),
        identities = snapshot.registry.identities().len(),
        objects = snapshot.registry.object_count(),
        buffers = snapshot.buffers.len(),
        pending_init = snapshot.pending_init,
        pending_backlog = snapshot.pending_backlog,
        stored_messages = storage.len(),
        outbound_calls = sent,
        "Replay finished"
    );

    if config.metrics.enabled {
        eprint!("{}", metrics::gather_metrics());
    }

    Ok(())
}
