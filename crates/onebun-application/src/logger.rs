//! Logger capability
//!
//! [`Logger`] is the value bound to the `LoggerService` tag in every module
//! context. It emits `tracing` events carrying the application name and, for
//! child loggers, the owning class name. Subscriber setup is left to the
//! infrastructure crate.

use std::fmt;
use std::sync::Arc;

use onebun_domain::constants::LOGGER_SERVICE_IDENTIFIER;
use onebun_domain::value_objects::config::DEFAULT_APP_NAME;

use crate::class::Class;

/// Structured logger handed to services and controllers
#[derive(Clone, Debug)]
pub struct Logger {
    app: Arc<str>,
    class_name: Option<Arc<str>>,
}

macro_rules! log_event {
    ($level:ident, $logger:expr, $message:expr) => {
        match $logger.class_name.as_deref() {
            Some(class_name) => tracing::$level!(
                app = %$logger.app,
                class_name = %class_name,
                "{}",
                $message
            ),
            None => tracing::$level!(app = %$logger.app, "{}", $message),
        }
    };
}

impl Logger {
    /// Create a root logger for an application
    pub fn new(app: impl Into<Arc<str>>) -> Self {
        Self {
            app: app.into(),
            class_name: None,
        }
    }

    /// Derive a logger scoped to a class
    pub fn child(&self, class_name: &str) -> Self {
        Self {
            app: Arc::clone(&self.app),
            class_name: Some(Arc::from(class_name)),
        }
    }

    /// Application name
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Owning class, for child loggers
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Emit a trace event
    pub fn trace(&self, message: impl fmt::Display) {
        log_event!(trace, self, message);
    }

    /// Emit a debug event
    pub fn debug(&self, message: impl fmt::Display) {
        log_event!(debug, self, message);
    }

    /// Emit an info event
    pub fn info(&self, message: impl fmt::Display) {
        log_event!(info, self, message);
    }

    /// Emit a warning event
    pub fn warn(&self, message: impl fmt::Display) {
        log_event!(warn, self, message);
    }

    /// Emit an error event
    pub fn error(&self, message: impl fmt::Display) {
        log_event!(error, self, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl Class for Logger {
    fn class_name() -> &'static str {
        LOGGER_SERVICE_IDENTIFIER
    }
}
