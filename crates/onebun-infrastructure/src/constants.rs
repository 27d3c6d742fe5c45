//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `onebun_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "onebun.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "onebun";

/// Environment variable prefix for configuration (`ONEBUN__WIRING__POLICY`)
pub const CONFIG_ENV_PREFIX: &str = "ONEBUN__";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable holding an `EnvFilter` directive that overrides the
/// configured level
pub const LOG_FILTER_ENV: &str = "ONEBUN_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "onebun";
