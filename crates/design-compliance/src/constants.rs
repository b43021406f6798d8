//! Agent constants
//!
//! Defaults shared by configuration, scanning and reporting.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "designer-agent.toml";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "DESIGNER_AGENT";

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "DESIGNER_AGENT_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// SCHEDULING CONSTANTS
// ============================================================================

/// Default interval between validation passes (milliseconds)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 30_000;

/// Capacity of the agent event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// SCANNING CONSTANTS
// ============================================================================

/// Directories watched when none are configured
pub const DEFAULT_WATCH_DIRECTORIES: &[&str] =
    &["src/components", "src/modules", "src/design-system"];

/// File extensions validated in watch mode
pub const DEFAULT_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".js", ".css", ".scss"];

/// File extensions validated by the single-shot check
pub const CHECK_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".js"];

/// Base-name globs excluded from scanning
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "*.test.*",
    "*.spec.*",
];

/// Directory name that is never descended into
pub const NODE_MODULES_DIR: &str = "node_modules";

/// Default target of the single-shot check
pub const DEFAULT_CHECK_TARGET: &str = "src/components";

// ============================================================================
// SCORING CONSTANTS
// ============================================================================

/// Score of a file without violations
pub const MAX_SCORE: u8 = 100;

/// Points deducted per error-severity violation
pub const ERROR_PENALTY: u32 = 10;

/// Points deducted per warning-severity violation
pub const WARNING_PENALTY: u32 = 5;

// ============================================================================
// REPORTING CONSTANTS
// ============================================================================

/// Directory that receives JSON and HTML reports
pub const DEFAULT_REPORTS_DIR: &str = "reports/design-compliance";

/// File name prefix of JSON and HTML reports
pub const REPORT_FILE_PREFIX: &str = "design-compliance";

/// Report written by the single-shot check
pub const CHECK_REPORT_FILENAME: &str = "validation-report.json";

/// Number of rules listed under "top violations"
pub const TOP_VIOLATIONS_LIMIT: usize = 10;

/// Number of error violations listed in a compliance snapshot
pub const SNAPSHOT_ERROR_LIMIT: usize = 10;

/// Number of most recent violations considered for snapshot recommendations
pub const SNAPSHOT_RECENT_WINDOW: usize = 20;
