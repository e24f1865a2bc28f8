//! Command-line front end for QC report layout.
//!
//! - **Arguments** (`cli`): `render`, `profiles` and `profile` subcommands
//! - **Commands** (`commands`): file handling around [`qc_report::render_report`]
//! - **Logging** (`logging`): `tracing-subscriber` setup
//! - **Summary** (`summary`): page tables printed after a render

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
