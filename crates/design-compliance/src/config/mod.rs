//! Configuration Module
//!
//! Layered configuration for the agent: defaults, `designer-agent.toml`,
//! `DESIGNER_AGENT_*` environment variables, then command-line overrides.

mod loader;
mod types;

pub use loader::{
    ConfigLoader, ConfigOverrides, parse_interval, parse_watch_list, validate_config,
};
pub use types::{AgentConfig, LoggingConfig};
