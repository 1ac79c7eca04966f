//! Diagnostic text output for boards.

mod core;

pub use core::{BoardDump, DumpSettings};
