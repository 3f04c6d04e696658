//! Process records.
//!
//! A process is the legal case submitted for acquisition evaluation. It is
//! built once per request from JSON or YAML and only read afterwards.

mod parser;
mod timestamp;

pub use parser::{Document, Movement, Process, ProcessError};
