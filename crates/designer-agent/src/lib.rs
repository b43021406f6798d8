//! Designer Agent
//!
//! Process facade over `design-compliance`:
//!
//! | Mode | Command | Description |
//! |------|---------|-------------|
//! | **Watch** | `designer-agent [--watch dirs] [--interval ms]` | Validate on a schedule until Ctrl+C |
//! | **Check** | `designer-agent check [DIR] [--report PATH]` | Validate once, exit 1 on errors |

pub mod cli;

pub use cli::{Cli, Command, parse_args, run};
