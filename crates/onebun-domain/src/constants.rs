//! Domain layer constants
//!
//! Metadata keys mirror the decorator names so registry dumps stay readable.

// ============================================================================
// METADATA KEYS
// ============================================================================

/// Key under which `@Service` metadata is stored
pub const SERVICE_METADATA_KEY: &str = "onebun:service";

/// Key under which `@Controller` metadata is stored
pub const CONTROLLER_METADATA_KEY: &str = "onebun:controller";

/// Key under which `@Module` metadata is stored
pub const MODULE_METADATA_KEY: &str = "onebun:module";

/// Key under which route records are accumulated
pub const ROUTES_METADATA_KEY: &str = "onebun:routes";

/// Key under which parameter records are accumulated (property = handler)
pub const PARAMS_METADATA_KEY: &str = "onebun:params";

/// Key holding constructor parameter types
pub const DESIGN_PARAMTYPES_KEY: &str = "design:paramtypes";

// ============================================================================
// FRAMEWORK-RESERVED PARAMETERS
// ============================================================================

/// Constructor parameters whose name or type contains one of these fragments
/// are injected positionally by the framework and never resolved from the
/// service map.
pub const RESERVED_PARAM_FRAGMENTS: [&str; 2] = ["logger", "config"];

/// Type names that never identify an injectable class
pub const PRIMITIVE_TYPE_NAMES: [&str; 22] = [
    "Object", "Any", "dyn Any", "()", "bool", "char", "str", "String", "i8", "i16", "i32",
    "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

/// Suffix used to guess a service class name from a parameter identifier
pub const SERVICE_SUFFIX: &str = "Service";

/// Identifier of the logger capability tag
pub const LOGGER_SERVICE_IDENTIFIER: &str = "LoggerService";
