//! Operator tooling for dlgate.
//!
//! This crate provides:
//! - Runner: drive a loader for one load or symbol-probe request
//! - Report: pass/fail record of a run, as JSON or a human line

#![forbid(unsafe_code)]

pub mod report;
pub mod runner;

pub use report::{LoadReport, Outcome};
pub use runner::{Request, run_load, run_probe};
