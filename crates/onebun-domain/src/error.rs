//! Error handling types
//!
//! Composition errors are split in two groups:
//!
//! - **Fatal**: missing decorators, missing logger, cyclic imports and
//!   construction failures. They abort application bootstrap and are returned
//!   as [`Error`] values.
//! - **Soft**: unresolved controller dependencies and plain providers. These
//!   are logged by the composition root and never become an [`Error`] unless
//!   the strict wiring policy is selected.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the OneBun framework
#[derive(Error, Debug)]
pub enum Error {
    /// A class was used in a role its decorators do not declare
    #[error("Class {class} is missing @{decorator} metadata")]
    MissingDecorator {
        /// Name of the offending class
        class: String,
        /// Name of the expected decorator (e.g. `Service`, `Module`)
        decorator: &'static str,
    },

    /// A service or controller was constructed without a logger
    #[error("Logger is required to construct {class}")]
    MissingLogger {
        /// Name of the class being constructed
        class: String,
    },

    /// A module imports itself, directly or transitively
    #[error("Cyclic module import: {}", path.join(" -> "))]
    CyclicImport {
        /// Module names along the cycle, first and last entries are equal
        path: Vec<String>,
    },

    /// A controller constructor declared dependencies that could not be wired
    #[error("Unresolved dependencies for {class}: {}", params.join(", "))]
    UnresolvedDependencies {
        /// Name of the controller
        class: String,
        /// Parameter descriptions that did not match any provider
        params: Vec<String>,
    },

    /// Service lookup by tag or class failed
    #[error("Service not found: {identifier}")]
    ServiceNotFound {
        /// Identifier of the requested tag
        identifier: String,
    },

    /// A constructor returned an error
    #[error("Failed to construct {class}: {message}")]
    Construction {
        /// Name of the class being constructed
        class: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation was attempted in the wrong lifecycle state
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        /// State required by the operation
        expected: String,
        /// State the object was in
        actual: String,
    },

    /// A value could not be converted to the requested type
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// Description of the mismatch
        message: String,
    },

    /// An effect failed or panicked while being run
    #[error("Effect failed: {message}")]
    Effect {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Composition error creation methods
impl Error {
    /// Create a missing decorator error
    pub fn missing_decorator<S: Into<String>>(class: S, decorator: &'static str) -> Self {
        Self::MissingDecorator {
            class: class.into(),
            decorator,
        }
    }

    /// Create a missing logger error
    pub fn missing_logger<S: Into<String>>(class: S) -> Self {
        Self::MissingLogger {
            class: class.into(),
        }
    }

    /// Create a service not found error
    pub fn service_not_found<S: Into<String>>(identifier: S) -> Self {
        Self::ServiceNotFound {
            identifier: identifier.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state<E: ToString, A: ToString>(expected: E, actual: A) -> Self {
        Self::InvalidState {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(message: S) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a construction error
    pub fn construction<C: Into<String>, S: Into<String>>(class: C, message: S) -> Self {
        Self::Construction {
            class: class.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a construction error with source
    pub fn construction_with_source<
        C: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        class: C,
        message: S,
        source: E,
    ) -> Self {
        Self::Construction {
            class: class.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Effect error creation methods
impl Error {
    /// Create an effect error
    pub fn effect<S: Into<String>>(message: S) -> Self {
        Self::Effect {
            message: message.into(),
            source: None,
        }
    }

    /// Create an effect error with source
    ///
    /// Accepts concrete errors as well as already boxed ones.
    pub fn effect_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Effect {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

// Configuration and I/O error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io_with_source(source.to_string(), source)
    }
}
