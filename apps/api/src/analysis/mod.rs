//! The analysis pipelines: tolerant extraction of structured data from model
//! completions, plus the three orchestrators built on top of it.
//!
//! Each orchestrator is a short linear pipeline: resolve input, call the
//! backend one or more times, extract, fall back per item where the spec of
//! the endpoint allows, return. Backend errors raised before any degradation
//! point abort the request; parse failures never do.

pub mod extract;
pub mod gap;
pub mod handlers;
pub mod prompts;
pub mod skills;
pub mod tasks;
