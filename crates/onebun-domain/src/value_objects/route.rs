//! Route and parameter metadata
//!
//! Records produced by route and parameter decorators on controller handlers.
//! The HTTP dispatcher consumes them; this crate only stores them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method a route handler answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    All,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::All => "ALL",
        };
        f.write_str(name)
    }
}

/// Where a handler parameter is bound from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Path,
    Query,
    Body,
    Header,
    Request,
    Response,
}

/// Named validation hook attached to a parameter
#[derive(Clone, Copy)]
pub struct ParamValidator {
    name: &'static str,
    check: fn(&serde_json::Value) -> Result<(), String>,
}

impl ParamValidator {
    /// Create a validator from a name and a check function
    pub const fn new(name: &'static str, check: fn(&serde_json::Value) -> Result<(), String>) -> Self {
        Self { name, check }
    }

    /// Validator name, used for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the check against a bound value
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), String> {
        (self.check)(value)
    }
}

impl PartialEq for ParamValidator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for ParamValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamValidator").field(&self.name).finish()
    }
}

/// One decorated handler parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMetadata {
    /// Binding source
    pub kind: ParamKind,
    /// Name of the bound field (path segment, query key, header...)
    pub name: String,
    /// Position of the parameter in the handler signature
    pub index: usize,
    /// Whether a missing value is an error
    pub required: bool,
    /// Optional validation hook
    pub validator: Option<ParamValidator>,
}

impl ParamMetadata {
    /// Create a parameter record
    pub fn new(kind: ParamKind, name: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            index,
            required: false,
            validator: None,
        }
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a validator
    pub fn with_validator(mut self, validator: ParamValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// One decorated route handler
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMetadata {
    /// Path relative to the controller base path
    pub path: String,
    /// HTTP method
    pub http_method: HttpMethod,
    /// Name of the handler method on the controller
    pub handler_name: String,
    /// Parameter records, ordered by index once merged
    pub params: Vec<ParamMetadata>,
    /// Middleware names applied to this route, in order
    pub middleware: Vec<String>,
}

impl RouteMetadata {
    /// Create a route record without params or middleware
    pub fn new(http_method: HttpMethod, path: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            http_method,
            handler_name: handler_name.into(),
            params: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Append a middleware name
    pub fn with_middleware(mut self, middleware: impl Into<String>) -> Self {
        self.middleware.push(middleware.into());
        self
    }

    /// Full path of the route under a controller base path
    pub fn full_path(&self, base_path: &str) -> String {
        let base = base_path.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        match (base.is_empty(), path.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{path}"),
            (false, true) => base.to_string(),
            (false, false) => format!("{base}/{path}"),
        }
    }
}
