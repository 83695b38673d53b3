// # dispatchd - Change Dispatch Daemon
//
// CRITICAL RULES:
// - This is a THIN integration layer ONLY
// - DO NOT add dispatch, ordering or alert logic here
// - All dispatch logic MUST be in dispatch-core
// - Configuration is via environment variables ONLY
//
// The dispatchd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Building the dispatcher from the collaborator registry
// 4. Feeding change notices read from stdin into the dispatcher
//
// ## Configuration
//
// - `DISPATCH_CONFIG_FILE`: JSON dispatcher config file (optional, overrides
//   the two type variables below)
// - `DISPATCH_ALERT_CONSUMER`: Alert consumer type (log, memory)
// - `DISPATCH_OBSERVER_REGISTRY`: Observer registry type (log, memory)
// - `DISPATCH_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Input
//
// One JSON change notice per line on stdin:
//
// ```text
// {"scope":"identity","group":{"parent":0,"managed":[10]},"identity":10}
// {"scope":"group","group":{"parent":0,"managed":[10]}}
// {"scope":"groups","groups":[{"parent":0},{"parent":11}]}
// ```
//
// ## Example
//
// ```bash
// export DISPATCH_ALERT_CONSUMER=memory
// export DISPATCH_LOG_LEVEL=debug
//
// dispatchd < notices.jsonl
// ```

use anyhow::{Context, Result};
use dispatch_core::consumers::{MemoryAlertConsumerFactory, MemoryObserverRegistryFactory};
use dispatch_core::{
    AlertConsumerConfig, ChangeDispatcher, ChangeNotice, CollaboratorRegistry, DispatchConfig,
    MemoryAlertConsumer, MemoryObserverRegistry, ObserverRegistryConfig,
};
use std::env;
use std::io;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DispatchExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DispatchExitCode> for ExitCode {
    fn from(code: DispatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    config_file: Option<String>,
    alert_consumer: String,
    observer_registry: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            config_file: env::var("DISPATCH_CONFIG_FILE").ok(),
            alert_consumer: env::var("DISPATCH_ALERT_CONSUMER")
                .unwrap_or_else(|_| "log".to_string()),
            observer_registry: env::var("DISPATCH_OBSERVER_REGISTRY")
                .unwrap_or_else(|_| "log".to_string()),
            log_level: env::var("DISPATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.alert_consumer.as_str() {
            "log" | "memory" => {}
            other => anyhow::bail!(
                "DISPATCH_ALERT_CONSUMER '{}' is not supported. \
                Supported types: log, memory",
                other
            ),
        }

        match self.observer_registry.as_str() {
            "log" | "memory" => {}
            other => anyhow::bail!(
                "DISPATCH_OBSERVER_REGISTRY '{}' is not supported. \
                Supported types: log, memory",
                other
            ),
        }

        if let Some(ref path) = self.config_file
            && path.is_empty()
        {
            anyhow::bail!("DISPATCH_CONFIG_FILE cannot be empty when set");
        }

        self.tracing_level()?;
        Ok(())
    }

    fn tracing_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DISPATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Build the dispatcher configuration
    fn dispatch_config(&self) -> Result<DispatchConfig> {
        if let Some(ref path) = self.config_file {
            return DispatchConfig::load(path)
                .with_context(|| format!("Failed to load DISPATCH_CONFIG_FILE {}", path));
        }

        let alert_consumer = match self.alert_consumer.as_str() {
            "memory" => AlertConsumerConfig::Memory,
            _ => AlertConsumerConfig::Log,
        };
        let observer_registry = match self.observer_registry.as_str() {
            "memory" => ObserverRegistryConfig::Memory,
            _ => ObserverRegistryConfig::Log,
        };

        Ok(DispatchConfig {
            alert_consumer,
            observer_registry,
        })
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DispatchExitCode::ConfigError.into();
    }

    let log_level = config.tracing_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DispatchExitCode::ConfigError.into();
    }

    info!("Starting dispatchd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DispatchExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => DispatchExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                if e.is::<dispatch_core::Error>() {
                    DispatchExitCode::ConfigError
                } else {
                    DispatchExitCode::RuntimeError
                }
            }
        }
    });

    result.into()
}

/// Running totals for the end-of-run summary
#[derive(Debug, Default)]
struct Totals {
    dispatched: usize,
    failed: usize,
    skipped: usize,
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Memory collaborators are shared so their state can be summarized on exit
    let alerts = MemoryAlertConsumer::new();
    let observers = MemoryObserverRegistry::new();

    let registry = CollaboratorRegistry::with_builtins();
    registry.register_alert_consumer(
        "memory",
        Box::new(MemoryAlertConsumerFactory::sharing(alerts.clone())),
    );
    registry.register_observer_registry(
        "memory",
        Box::new(MemoryObserverRegistryFactory::sharing(observers.clone())),
    );

    let dispatch_config = config.dispatch_config()?;
    info!(
        "Alert consumer: {}, observer registry: {}",
        dispatch_config.alert_consumer.type_name(),
        dispatch_config.observer_registry.type_name()
    );

    let dispatcher = ChangeDispatcher::from_config(&dispatch_config, &registry)?;
    debug!("Dispatcher ready: {:?}", dispatcher);

    let mut totals = Totals::default();
    dispatch_lines(
        &dispatcher,
        BufReader::new(tokio::io::stdin()),
        shutdown_signal(),
        &mut totals,
    )
    .await?;

    info!(
        "Shutting down: {} notice(s) dispatched, {} failed, {} skipped",
        totals.dispatched, totals.failed, totals.skipped
    );
    if dispatch_config.alert_consumer == AlertConsumerConfig::Memory {
        info!("Alert recomputations: {}", alerts.total_updates());
    }
    if dispatch_config.observer_registry == ObserverRegistryConfig::Memory {
        info!("Snapshot deliveries: {}", observers.deliveries());
    }

    Ok(())
}

/// Feed every line of `reader` to the dispatcher until EOF or `shutdown`
///
/// Lines that are not valid UTF-8 are skipped like any other malformed
/// line; only real read failures end the loop with an error.
async fn dispatch_lines<R, S>(
    dispatcher: &ChangeDispatcher,
    reader: R,
    shutdown: S,
    totals: &mut Totals,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = Result<&'static str>>,
{
    let mut lines = LinesStream::new(reader.lines());
    let mut line_no = 0usize;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else {
                    info!("End of input");
                    break;
                };
                line_no += 1;
                match line {
                    Ok(line) => handle_line(dispatcher, line_no, &line, totals),
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                        warn!("Line {}: {}, skipping", line_no, e);
                        totals.skipped += 1;
                    }
                    Err(e) => return Err(e).context("Failed to read stdin"),
                }
            }

            signal = &mut shutdown => {
                let signal = signal?;
                info!("Received shutdown signal: {}", signal);
                break;
            }
        }
    }

    Ok(())
}

/// Parse one input line and hand it to the dispatcher
///
/// A failed notice is reported and the daemon moves on to the next line.
fn handle_line(dispatcher: &ChangeDispatcher, line_no: usize, line: &str, totals: &mut Totals) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let notice: ChangeNotice = match serde_json::from_str(line) {
        Ok(notice) => notice,
        Err(e) => {
            warn!("Line {}: not a change notice: {}", line_no, e);
            totals.skipped += 1;
            return;
        }
    };

    if let Err(e) = notice.validate() {
        warn!("Line {}: {}, skipping", line_no, e);
        totals.skipped += 1;
        return;
    }

    match dispatcher.notify(&notice) {
        Ok(()) => {
            debug!("Line {}: dispatched {} group(s)", line_no, notice.group_count());
            totals.dispatched += 1;
        }
        Err(e) => {
            error!("Line {}: dispatch failed: {}", line_no, e);
            totals.failed += 1;
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
