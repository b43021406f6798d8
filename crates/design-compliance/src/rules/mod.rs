//! Rule Registry System
//!
//! Provides declarative rule definitions loaded from YAML tables.

pub mod registry;
pub mod yaml_loader;

pub use registry::{Rule, RuleSet, VALUE_GROUP};
pub use yaml_loader::{RuleDefinition, RuleTable};
