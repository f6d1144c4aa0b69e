use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde_json::Value;
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink};
use tokio::runtime::{Handle, Runtime};

/// Builder configuring logging and event sinks for quiz generation.
pub struct QuizTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    sinks: Vec<Arc<dyn LogSink>>,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl QuizTelemetryBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
            sinks: Vec::new(),
            event_publisher: None,
        }
    }

    /// Sets the JSON log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Minimum level written to the JSON log file.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Adds an extra sink receiving every record.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Assigns the event publisher.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<QuizTelemetry> {
        let mut sinks = self.sinks;
        if let Some(path) = self.log_path {
            let logger = JsonLogger::new(&path)
                .with_context(|| format!("opening quiz log {}", path.display()))?
                .with_min_level(self.min_level);
            sinks.push(Arc::new(logger));
        }
        let event = self.event_publisher.map(EventHandle::new).transpose()?;
        Ok(QuizTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                sinks,
                event,
            }),
        })
    }
}

/// Telemetry handle shared by the quiz generator and the CLI.
#[derive(Clone)]
pub struct QuizTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for QuizTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizTelemetry")
            .field("module", &self.inner.module)
            .field("sinks", &self.inner.sinks.len())
            .field("events", &self.inner.event.is_some())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    sinks: Vec<Arc<dyn LogSink>>,
    event: Option<EventHandle>,
}

struct EventHandle {
    runtime: Runtime,
    publisher: Arc<dyn EventPublisher>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new().context("starting telemetry runtime")?,
            publisher,
        })
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            handle.spawn(async move {
                if let Err(err) = publisher.publish(record).await {
                    eprintln!("quiz event publish failed: {err:?}");
                }
            });
            Ok(())
        } else {
            self.runtime.block_on(self.publisher.publish(record))
        }
    }
}

impl QuizTelemetry {
    /// Returns a builder for this telemetry helper.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> QuizTelemetryBuilder {
        QuizTelemetryBuilder::new(module)
    }

    /// Logs a structured record to every sink.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if self.inner.sinks.is_empty() {
            return Ok(());
        }
        let record = LogRecord::new(&self.inner.module, level, message).with_metadata(&metadata);
        for sink in &self.inner.sinks {
            sink.write(&record)?;
        }
        Ok(())
    }

    /// Emits an event via the configured bus.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(handle) = &self.inner.event {
            handle.publish(EventRecord::new(
                self.inner.module.clone(),
                event_type,
                payload,
            ))?;
        }
        Ok(())
    }
}
